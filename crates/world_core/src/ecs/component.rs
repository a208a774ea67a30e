//! Component trait and shared component state
//!
//! [`Component`] is the polymorphic contract every concrete component type
//! implements. All lifecycle hooks default to no-ops; the generic parts
//! (type tag, enabled flag, owner handle, attribute registry) live in
//! [`ComponentBase`], which each component embeds and exposes through
//! [`Component::base`].
//!
//! Lifecycle, driven by the owning [`Entity`]:
//!
//! ```text
//! Constructed -> Initialized -> { Simulating <-> Stopped } -> Removed
//! ```

use std::any::Any;

use crate::ecs::attribute::{AttributeError, AttributeInfo, AttributeRegistry, AttributeType, AttributeValue};
use crate::ecs::component_type::ComponentType;
use crate::ecs::components::Transform;
use crate::ecs::entity::Entity;
use crate::ecs::world::EntityId;
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Upcasting helpers for downcasting trait objects to concrete components
///
/// Call these on `&dyn Component`, not on `Box<dyn Component>`: the blanket
/// impl also covers the box itself.
pub trait AsAny: Any {
    /// `&self` as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// `&mut self` as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Boxed `self` as `Box<dyn Any>`
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Where a component is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Built and attributes registered, not yet attached
    Constructed,
    /// `on_initialize` ran; the entity is not simulating
    Initialized,
    /// `on_start` ran
    Simulating,
    /// `on_stop` ran after a simulation
    Stopped,
    /// `on_remove` ran; the component is detached
    Removed,
}

impl LifecycleState {
    /// Whether `on_tick` may be dispatched in this state
    ///
    /// `Stopped` is the initialized-but-idle state entered after a
    /// simulation ends, so it ticks just like `Initialized`.
    pub const fn can_tick(self) -> bool {
        matches!(self, Self::Initialized | Self::Simulating | Self::Stopped)
    }

    /// Whether `self -> next` is a legal transition
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Constructed, Self::Initialized)
                | (Self::Initialized | Self::Stopped, Self::Simulating)
                | (Self::Simulating, Self::Stopped)
                | (Self::Constructed | Self::Initialized | Self::Stopped, Self::Removed)
        )
    }
}

/// State shared by every component
#[derive(Debug)]
pub struct ComponentBase {
    ty: ComponentType,
    enabled: bool,
    entity: EntityId,
    state: LifecycleState,
    attributes: AttributeRegistry,
}

impl ComponentBase {
    /// New base owned by `entity`, tag still `Undefined`
    pub fn new(entity: EntityId) -> Self {
        Self {
            ty: ComponentType::Undefined,
            enabled: true,
            entity,
            state: LifecycleState::Constructed,
            attributes: AttributeRegistry::new(),
        }
    }

    /// Component tag
    pub fn component_type(&self) -> ComponentType {
        self.ty
    }

    /// Set the tag; allowed exactly once, during construction
    ///
    /// # Panics
    /// When the tag is already set or `ty` is `Undefined`.
    pub fn set_type(&mut self, ty: ComponentType) {
        assert!(ty != ComponentType::Undefined, "component tag cannot be set to Undefined");
        assert!(
            self.ty == ComponentType::Undefined,
            "component tag already set to {} (tried {ty})",
            self.ty
        );
        self.ty = ty;
    }

    /// Handle of the owning entity
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Whether the component takes part in ticking
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable ticking
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Attribute registry (read-only view)
    pub fn attributes(&self) -> &AttributeRegistry {
        &self.attributes
    }

    /// Register one attribute; see [`AttributeRegistry::register`]
    pub fn register_attribute<C, T>(
        &mut self,
        name: &'static str,
        getter: impl Fn(&C) -> T + 'static,
        setter: impl Fn(&mut C, T) + 'static,
    ) where
        C: Component,
        T: AttributeType,
    {
        self.attributes.register(name, getter, setter);
    }

    pub(crate) fn transition(&mut self, next: LifecycleState) {
        assert!(
            self.state.can_transition_to(next),
            "{} component cannot go from {:?} to {:?}",
            self.ty,
            self.state,
            next
        );
        self.state = next;
    }

    pub(crate) fn seal_attributes(&mut self) {
        self.attributes.seal();
    }
}

/// Per-tick data handed to [`Component::on_tick`]
pub struct TickContext<'a> {
    entity: &'a Entity,
    delta_time: f32,
    deferred: &'a mut Vec<ComponentType>,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(entity: &'a Entity, delta_time: f32, deferred: &'a mut Vec<ComponentType>) -> Self {
        Self { entity, delta_time, deferred }
    }

    /// Owning entity; the ticking component itself is not visible through it
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    /// Seconds since the previous tick
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Request removal of a component once the current tick pass ends
    pub fn defer_remove(&mut self, ty: ComponentType) {
        if !self.deferred.contains(&ty) {
            self.deferred.push(ty);
        }
    }
}

/// The polymorphic component contract
pub trait Component: AsAny {
    /// Shared state
    fn base(&self) -> &ComponentBase;

    /// Shared state, mutable
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// Runs once, right after the component is attached to `entity`
    fn on_initialize(&mut self, _entity: &Entity) {}

    /// Runs every time the simulation starts
    fn on_start(&mut self) {}

    /// Runs every time the simulation stops
    fn on_stop(&mut self) {}

    /// Runs before the component is detached; must release external resources
    fn on_remove(&mut self) {}

    /// Runs every tick
    fn on_tick(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Runs when the entity is being saved
    fn serialize(&self, _sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        Ok(())
    }

    /// Runs when the entity is being loaded
    fn deserialize(&mut self, _source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        Ok(())
    }

    /// Runs after a world load; `remap` turns a handle saved with the scene
    /// into the loaded entity's handle, `None` when it was not in the scene
    fn remap_entities(&mut self, _remap: &dyn Fn(EntityId) -> Option<EntityId>) {}

    /// Component tag
    fn component_type(&self) -> ComponentType {
        self.base().component_type()
    }

    /// Handle of the owning entity
    fn entity(&self) -> EntityId {
        self.base().entity()
    }

    /// Current lifecycle state
    fn state(&self) -> LifecycleState {
        self.base().state()
    }

    /// Whether the component takes part in ticking
    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// Enable or disable ticking
    fn set_enabled(&mut self, enabled: bool) {
        self.base_mut().set_enabled(enabled);
    }

    /// Names and kinds of the registered attributes, in order
    fn attribute_infos(&self) -> Vec<AttributeInfo> {
        self.base().attributes().infos().collect()
    }

    /// Current attribute values, in registration order
    fn attributes(&self) -> Vec<AttributeValue> {
        self.base().attributes().read(self.as_any())
    }

    /// Positional write of every registered attribute
    ///
    /// # Panics
    /// When `values` is shorter than the registry or a value has the wrong
    /// kind for its position.
    fn set_attributes(&mut self, values: &[AttributeValue]) {
        let shared = self.base().attributes().share();
        shared.apply(self.as_any_mut(), values);
    }

    /// Validate `values` for [`Component::set_attributes`] without applying
    fn check_attributes(&self, values: &[AttributeValue]) -> Result<(), AttributeError> {
        self.base().attributes().check(values)
    }

    /// Checked write of a single attribute, for untrusted input
    fn try_set_attribute(&mut self, index: usize, value: AttributeValue) -> Result<(), AttributeError> {
        let shared = self.base().attributes().share();
        shared.try_apply_one(self.as_any_mut(), index, value)
    }

    /// Transform of the owning entity
    ///
    /// `None` when `entity` is not this component's owner or it has no
    /// Transform at hand (e.g. while the Transform itself is being ticked).
    fn transform<'e>(&self, entity: &'e Entity) -> Option<&'e Transform> {
        if entity.id() != self.entity() {
            return None;
        }
        entity.get_component::<Transform>()
    }

    /// Write every attribute to `sink` in registration order
    fn serialize_attributes(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        for value in self.attributes() {
            sink.write(value)?;
        }
        Ok(())
    }

    /// Read one value per registered attribute from `source`
    fn read_attributes(&self, source: &mut dyn PersistenceSource) -> Result<Vec<AttributeValue>, PersistenceError> {
        let kinds = self.base().attributes().kinds();
        let mut values = Vec::with_capacity(kinds.len());
        for kind in kinds {
            values.push(source.read(kind)?);
        }
        Ok(values)
    }

    /// Read every attribute from `source` in registration order and apply
    fn deserialize_attributes(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        let values = self.read_attributes(source)?;
        self.set_attributes(&values);
        Ok(())
    }
}
