//! Transform component
//!
//! Position, rotation and scale of an entity in world space (Y-up,
//! right-handed). Every entity carries exactly one; other components reach
//! it through [`Component::transform`].

use crate::ecs::{Component, ComponentBase, ComponentType, EntityId, TickContext, TypedComponent};
use crate::foundation::math::{Mat4, Quat, Vec3};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Spatial root of an entity
#[derive(Debug)]
pub struct Transform {
    base: ComponentBase,
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    matrix: Mat4,
    dirty: bool,
}

impl TypedComponent for Transform {
    const TYPE: ComponentType = ComponentType::Transform;

    fn new(entity: EntityId) -> Self {
        let mut transform = Self {
            base: ComponentBase::new(entity),
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            matrix: Mat4::identity(),
            dirty: false,
        };
        transform.base.set_type(Self::TYPE);

        let base = &mut transform.base;
        base.register_attribute("position", |t: &Self| t.position, |t: &mut Self, v| t.set_position(v));
        base.register_attribute("rotation", |t: &Self| t.rotation, |t: &mut Self, v| t.set_rotation(v));
        base.register_attribute("scale", |t: &Self| t.scale, |t: &mut Self, v| t.set_scale(v));

        transform
    }
}

impl Transform {
    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set world-space position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// World-space rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Set world-space rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Per-axis scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set per-axis scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Move by `delta` in world space
    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position + delta);
    }

    /// Apply `delta` after the current rotation
    pub fn rotate(&mut self, delta: Quat) {
        self.set_rotation(delta * self.rotation);
    }

    /// Forward direction (-Z rotated)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Up direction (+Y rotated)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// Right direction (+X rotated)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    /// TRS matrix; recomputed on demand when stale
    pub fn matrix(&self) -> Mat4 {
        if self.dirty {
            self.compute_matrix()
        } else {
            self.matrix
        }
    }

    fn compute_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

impl Component for Transform {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_tick(&mut self, _ctx: &mut TickContext<'_>) {
        if self.dirty {
            self.matrix = self.compute_matrix();
            self.dirty = false;
        }
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.deserialize_attributes(source)
    }
}
