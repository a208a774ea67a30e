//! Light component
//!
//! Light parameters are attributes; world-space position and direction are
//! derived from the entity's Transform every tick.

use crate::ecs::{Component, ComponentBase, ComponentType, Entity, EntityId, TickContext, TypedComponent};
use crate::foundation::math::{Vec3, Vec4};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Types of lights supported by the lighting system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum LightType {
    /// Directional light (like sunlight) with parallel rays
    Directional = 0,
    /// Point light that radiates in all directions from a position
    #[default]
    Point = 1,
    /// Spot light that creates a cone of light from a position
    Spot = 2,
}

impl LightType {
    /// Decode a persisted discriminant, defaulting to `Point`
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::Directional,
            2 => Self::Spot,
            _ => Self::Point,
        }
    }
}

/// Light emitter
#[derive(Debug)]
pub struct Light {
    base: ComponentBase,
    light_type: LightType,
    color: Vec4,
    intensity: f32,
    range: f32,
    angle: f32,
    shadows: bool,
    position: Vec3,
    direction: Vec3,
}

impl TypedComponent for Light {
    const TYPE: ComponentType = ComponentType::Light;

    fn new(entity: EntityId) -> Self {
        let mut light = Self {
            base: ComponentBase::new(entity),
            light_type: LightType::default(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            intensity: 1.0,
            range: 10.0,
            angle: 0.5,
            shadows: true,
            position: Vec3::zeros(),
            direction: Vec3::new(0.0, 0.0, -1.0),
        };
        light.base.set_type(Self::TYPE);

        let base = &mut light.base;
        base.register_attribute(
            "light_type",
            |l: &Self| l.light_type as u32,
            |l: &mut Self, v| l.light_type = LightType::from_u32(v),
        );
        base.register_attribute("color", |l: &Self| l.color, |l: &mut Self, v| l.color = v);
        base.register_attribute("intensity", |l: &Self| l.intensity, |l: &mut Self, v| l.set_intensity(v));
        base.register_attribute("range", |l: &Self| l.range, |l: &mut Self, v| l.set_range(v));
        base.register_attribute("angle", |l: &Self| l.angle, |l: &mut Self, v| l.set_angle(v));
        base.register_attribute("shadows", |l: &Self| l.shadows, |l: &mut Self, v| l.shadows = v);

        light
    }
}

impl Light {
    /// Light type
    pub fn light_type(&self) -> LightType {
        self.light_type
    }

    /// Set the light type
    pub fn set_light_type(&mut self, light_type: LightType) {
        self.light_type = light_type;
    }

    /// Linear RGBA color
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Set the color
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    /// Intensity multiplier
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Set intensity; negative values clamp to zero
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    /// Reach of point and spot lights
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Set range; negative values clamp to zero
    pub fn set_range(&mut self, range: f32) {
        self.range = range.max(0.0);
    }

    /// Spot cone half-angle in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the cone half-angle, clamped to `[0, pi/2]`
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
    }

    /// Whether the light casts shadows
    pub fn shadows(&self) -> bool {
        self.shadows
    }

    /// Toggle shadow casting
    pub fn set_shadows(&mut self, shadows: bool) {
        self.shadows = shadows;
    }

    /// World-space position as of the last tick
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space direction as of the last tick
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    fn sync_with_transform(&mut self, entity: &Entity) {
        if let Some(transform) = self.transform(entity) {
            self.position = transform.position();
            self.direction = transform.forward();
        }
    }
}

impl Component for Light {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_initialize(&mut self, entity: &Entity) {
        self.sync_with_transform(entity);
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        self.sync_with_transform(ctx.entity());
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.deserialize_attributes(source)
    }
}
