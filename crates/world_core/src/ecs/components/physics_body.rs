//! Physics body component
//!
//! Describes a rigid body for the physics backend. Only the description is
//! kept here; stepping the simulation happens elsewhere.

use crate::ecs::{Component, ComponentBase, ComponentType, EntityId, TypedComponent};
use crate::foundation::math::Vec3;
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Smallest mass a dynamic body may have
const MIN_DYNAMIC_MASS: f32 = 0.001;

/// How the body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BodyType {
    /// Never moves
    #[default]
    Static = 0,
    /// Driven by forces
    Dynamic = 1,
    /// Moved by gameplay code, pushes dynamic bodies
    Kinematic = 2,
}

impl BodyType {
    /// Decode a persisted discriminant, defaulting to `Static`
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::Dynamic,
            2 => Self::Kinematic,
            _ => Self::Static,
        }
    }
}

/// Rigid body description
#[derive(Debug)]
pub struct PhysicsBody {
    base: ComponentBase,
    body_type: BodyType,
    mass: f32,
    friction: f32,
    friction_rolling: f32,
    restitution: f32,
    use_gravity: bool,
    center_of_mass: Vec3,
    position_lock: Vec3,
    rotation_lock: Vec3,
    in_simulation: bool,
}

impl TypedComponent for PhysicsBody {
    const TYPE: ComponentType = ComponentType::PhysicsBody;

    fn new(entity: EntityId) -> Self {
        let mut body = Self {
            base: ComponentBase::new(entity),
            body_type: BodyType::default(),
            mass: 1.0,
            friction: 0.5,
            friction_rolling: 0.0,
            restitution: 0.0,
            use_gravity: true,
            center_of_mass: Vec3::zeros(),
            position_lock: Vec3::zeros(),
            rotation_lock: Vec3::zeros(),
            in_simulation: false,
        };
        body.base.set_type(Self::TYPE);

        let base = &mut body.base;
        base.register_attribute(
            "body_type",
            |b: &Self| b.body_type as u32,
            |b: &mut Self, v| b.set_body_type(BodyType::from_u32(v)),
        );
        base.register_attribute("mass", |b: &Self| b.mass, |b: &mut Self, v| b.set_mass(v));
        base.register_attribute("friction", |b: &Self| b.friction, |b: &mut Self, v| b.friction = v);
        base.register_attribute("friction_rolling", |b: &Self| b.friction_rolling, |b: &mut Self, v| b.friction_rolling = v);
        base.register_attribute("restitution", |b: &Self| b.restitution, |b: &mut Self, v| b.restitution = v);
        base.register_attribute("use_gravity", |b: &Self| b.use_gravity, |b: &mut Self, v| b.use_gravity = v);
        base.register_attribute("center_of_mass", |b: &Self| b.center_of_mass, |b: &mut Self, v| b.center_of_mass = v);
        base.register_attribute("position_lock", |b: &Self| b.position_lock, |b: &mut Self, v| b.position_lock = v);
        base.register_attribute("rotation_lock", |b: &Self| b.rotation_lock, |b: &mut Self, v| b.rotation_lock = v);

        body
    }
}

impl PhysicsBody {
    /// Body type
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Set the body type, re-validating the mass
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        self.set_mass(self.mass);
    }

    /// Mass in kilograms
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set mass; dynamic bodies keep a small positive minimum
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = match self.body_type {
            BodyType::Dynamic => mass.max(MIN_DYNAMIC_MASS),
            BodyType::Static | BodyType::Kinematic => mass.max(0.0),
        };
    }

    /// Sliding friction
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Bounciness
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Set bounciness
    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = restitution;
    }

    /// Whether gravity applies
    pub fn use_gravity(&self) -> bool {
        self.use_gravity
    }

    /// Toggle gravity
    pub fn set_use_gravity(&mut self, use_gravity: bool) {
        self.use_gravity = use_gravity;
    }

    /// Whether the body is currently handed to the physics backend
    pub fn is_in_simulation(&self) -> bool {
        self.in_simulation
    }
}

impl Component for PhysicsBody {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_start(&mut self) {
        self.in_simulation = self.body_type != BodyType::Static;
    }

    fn on_stop(&mut self) {
        self.in_simulation = false;
    }

    fn on_remove(&mut self) {
        self.in_simulation = false;
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.deserialize_attributes(source)
    }
}
