//! Concrete component types

pub mod audio_listener;
pub mod audio_source;
pub mod camera;
pub mod constraint;
pub mod light;
pub mod physics_body;
pub mod reflection_probe;
pub mod renderable;
pub mod terrain;
pub mod transform;

pub use audio_listener::AudioListener;
pub use audio_source::AudioSource;
pub use camera::{Camera, Projection};
pub use constraint::{Constraint, ConstraintType};
pub use light::{Light, LightType};
pub use physics_body::{BodyType, PhysicsBody};
pub use reflection_probe::ReflectionProbe;
pub use renderable::Renderable;
pub use terrain::Terrain;
pub use transform::Transform;
