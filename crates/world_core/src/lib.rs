//! # World Core
//!
//! Entity/component runtime with attribute reflection and a uniform
//! component lifecycle.
//!
//! ## Features
//!
//! - **Attribute reflection**: every component exposes its persisted fields
//!   as an ordered list of typed getter/setter pairs
//! - **Uniform lifecycle**: initialize, start, tick, stop and remove hooks
//!   dispatched by the owning entity
//! - **Persistence**: in-memory, binary and RON scene adapters driven purely
//!   by the attribute lists
//! - **Editor helpers**: generic inspector and component clipboard
//!
//! ## Quick Start
//!
//! ```rust
//! use world_core::prelude::*;
//!
//! let mut world = World::default();
//! let lamp = world.create_entity("lamp").unwrap();
//! world.entity_mut(lamp).unwrap().add_component::<Light>().unwrap().set_intensity(2.0);
//!
//! world.start();
//! world.tick(1.0 / 60.0);
//!
//! let scene = world.save_scene_ron().unwrap();
//! let mut copy = World::default();
//! copy.load_scene_ron(&scene).unwrap();
//! assert_eq!(copy.entity_count(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod persistence;
pub mod render;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, WorldConfig},
        ecs::{
            components::{
                AudioListener, AudioSource, BodyType, Camera, Constraint, ConstraintType, Light, LightType,
                PhysicsBody, Projection, ReflectionProbe, Renderable, Terrain, Transform,
            },
            AttributeError, AttributeKind, AttributeValue, Component, ComponentClipboard,
            ComponentType, Entity, EntityId, LifecycleState, TypedComponent, World, WorldError,
        },
        foundation::math::{Mat4, Quat, Vec3, Vec4},
        persistence::{
            BinaryReader, BinaryWriter, MemoryStream, PersistenceError, PersistenceSink, PersistenceSource,
            SceneDocument,
        },
        render::GeometryType,
    };
}
