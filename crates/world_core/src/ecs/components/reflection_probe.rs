//! Reflection probe component
//!
//! Captures the surroundings into a cube map. Capturing is spread over
//! frames: every `update_interval_frames` ticks, `update_face_count` faces
//! are refreshed.

use crate::ecs::{Component, ComponentBase, ComponentType, EntityId, TickContext, TypedComponent};
use crate::foundation::math::Vec3;
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Number of faces in a cube map
pub const CUBE_FACES: u32 = 6;

/// Environment capture probe
#[derive(Debug)]
pub struct ReflectionProbe {
    base: ComponentBase,
    resolution: u32,
    extents: Vec3,
    update_interval_frames: u32,
    update_face_count: u32,
    plane_near: f32,
    plane_far: f32,
    frames_since_update: u32,
    next_face: u32,
    pending_faces: Vec<u32>,
}

impl TypedComponent for ReflectionProbe {
    const TYPE: ComponentType = ComponentType::ReflectionProbe;

    fn new(entity: EntityId) -> Self {
        let mut probe = Self {
            base: ComponentBase::new(entity),
            resolution: 512,
            extents: Vec3::new(1.0, 1.0, 1.0),
            update_interval_frames: 0,
            update_face_count: CUBE_FACES,
            plane_near: 0.3,
            plane_far: 1000.0,
            frames_since_update: 0,
            next_face: 0,
            pending_faces: Vec::new(),
        };
        probe.base.set_type(Self::TYPE);

        let base = &mut probe.base;
        base.register_attribute("resolution", |p: &Self| p.resolution, |p: &mut Self, v| p.set_resolution(v));
        base.register_attribute("extents", |p: &Self| p.extents, |p: &mut Self, v| p.extents = v);
        base.register_attribute(
            "update_interval_frames",
            |p: &Self| p.update_interval_frames,
            |p: &mut Self, v| p.update_interval_frames = v,
        );
        base.register_attribute(
            "update_face_count",
            |p: &Self| p.update_face_count,
            |p: &mut Self, v| p.set_update_face_count(v),
        );
        base.register_attribute("plane_near", |p: &Self| p.plane_near, |p: &mut Self, v| p.plane_near = v);
        base.register_attribute("plane_far", |p: &Self| p.plane_far, |p: &mut Self, v| p.plane_far = v);

        probe
    }
}

impl ReflectionProbe {
    /// Cube map face resolution in pixels
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Set the face resolution, rounded up to a power of two in `[16, 4096]`
    pub fn set_resolution(&mut self, resolution: u32) {
        self.resolution = resolution.clamp(16, 4096).next_power_of_two();
    }

    /// Half-size of the capture volume
    pub fn extents(&self) -> Vec3 {
        self.extents
    }

    /// Ticks between capture rounds; zero captures every tick
    pub fn update_interval_frames(&self) -> u32 {
        self.update_interval_frames
    }

    /// Set the capture interval
    pub fn set_update_interval_frames(&mut self, frames: u32) {
        self.update_interval_frames = frames;
    }

    /// Faces refreshed per capture round
    pub fn update_face_count(&self) -> u32 {
        self.update_face_count
    }

    /// Set faces per capture round, clamped to `[1, 6]`
    pub fn set_update_face_count(&mut self, count: u32) {
        self.update_face_count = count.clamp(1, CUBE_FACES);
    }

    /// Capture clip planes `(near, far)`
    pub fn clip_planes(&self) -> (f32, f32) {
        (self.plane_near, self.plane_far)
    }

    /// Faces scheduled for capture by the last tick
    pub fn pending_faces(&self) -> &[u32] {
        &self.pending_faces
    }

    fn schedule(&mut self) {
        self.pending_faces.clear();
        if self.frames_since_update < self.update_interval_frames {
            self.frames_since_update += 1;
            return;
        }
        self.frames_since_update = 0;
        for _ in 0..self.update_face_count {
            self.pending_faces.push(self.next_face);
            self.next_face = (self.next_face + 1) % CUBE_FACES;
        }
    }
}

impl Component for ReflectionProbe {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_tick(&mut self, _ctx: &mut TickContext<'_>) {
        self.schedule();
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.deserialize_attributes(source)
    }
}
