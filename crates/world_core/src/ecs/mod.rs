//! Entity-component runtime
//!
//! Entities own a fixed set of polymorphic components; every component
//! exposes its persisted fields through an attribute registry so that
//! persistence, the inspector and the clipboard can work on any component
//! without knowing its concrete type.

pub mod attribute;
pub mod clipboard;
pub mod component;
pub mod component_type;
pub mod components;
pub mod entity;
pub mod inspector;
pub mod world;

#[cfg(test)]
mod tests;

pub use attribute::{AttributeError, AttributeInfo, AttributeKind, AttributeRegistry, AttributeType, AttributeValue};
pub use clipboard::ComponentClipboard;
pub use component::{AsAny, Component, ComponentBase, LifecycleState, TickContext};
pub use component_type::{construct, ComponentMask, ComponentType, TypedComponent};
pub use entity::Entity;
pub use world::{EntityId, World, WorldError};
