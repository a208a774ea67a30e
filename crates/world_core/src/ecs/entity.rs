//! Entity: a named container of components
//!
//! An entity owns at most one component per [`ComponentType`], kept in
//! insertion order, and always owns a [`Transform`]. It drives the lifecycle
//! of its components: initialization on attach, start/stop pairing with the
//! simulation, ticking, and removal on detach or drop.

use std::fmt;

use crate::ecs::component::{Component, LifecycleState, TickContext};
use crate::ecs::component_type::{self, ComponentMask, ComponentType, TypedComponent};
use crate::ecs::components::Transform;
use crate::ecs::world::EntityId;
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

struct ComponentSlot {
    ty: ComponentType,
    // Empty only while the component is being ticked
    component: Option<Box<dyn Component>>,
}

/// A scene object
pub struct Entity {
    id: EntityId,
    name: String,
    active: bool,
    simulating: bool,
    components: Vec<ComponentSlot>,
}

impl Entity {
    /// Create an entity with its Transform attached
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        let mut entity = Self {
            id,
            name: name.into(),
            active: true,
            simulating: false,
            components: Vec::with_capacity(ComponentType::ALL.len()),
        };
        entity.add_component::<Transform>();
        entity
    }

    /// Handle of this entity
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the entity takes part in ticking
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate ticking
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the simulation is running for this entity
    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    /// Attach a new `T`; `None` when one is already attached
    pub fn add_component<T: TypedComponent>(&mut self) -> Option<&mut T> {
        if self.has_component(T::TYPE) {
            log::warn!("Entity '{}' already has a {} component", self.name, T::TYPE);
            return None;
        }
        self.attach(Box::new(T::new(self.id)))?.as_any_mut().downcast_mut::<T>()
    }

    /// Attach a new component by tag; `None` for duplicates and `Undefined`
    pub fn add_component_by_type(&mut self, ty: ComponentType) -> Option<&mut (dyn Component + 'static)> {
        if self.has_component(ty) {
            log::warn!("Entity '{}' already has a {} component", self.name, ty);
            return None;
        }
        let component = component_type::construct(ty, self.id)?;
        self.attach(component)
    }

    /// Existing component of `ty`, or a freshly attached one
    pub fn get_or_add_component_by_type(&mut self, ty: ComponentType) -> Option<&mut (dyn Component + 'static)> {
        if self.has_component(ty) {
            self.get_component_by_type_mut(ty)
        } else {
            self.add_component_by_type(ty)
        }
    }

    fn attach(&mut self, mut component: Box<dyn Component>) -> Option<&mut (dyn Component + 'static)> {
        let ty = component.component_type();
        component.on_initialize(self);

        let base = component.base_mut();
        base.seal_attributes();
        base.transition(LifecycleState::Initialized);

        if self.simulating {
            component.on_start();
            component.base_mut().transition(LifecycleState::Simulating);
        }

        log::debug!("Added {} to entity '{}'", ty, self.name);
        self.components.push(ComponentSlot { ty, component: Some(component) });

        self.components.last_mut()?.component.as_deref_mut()
    }

    /// Detach `T`, running its removal hooks; Transform is refused
    pub fn remove_component<T: TypedComponent>(&mut self) -> Option<Box<T>> {
        let component = self.remove_component_by_type(T::TYPE)?;
        component.into_any().downcast::<T>().ok()
    }

    /// Detach the component of `ty`, running its removal hooks
    ///
    /// Returns ownership of the detached component. Transform is refused.
    pub fn remove_component_by_type(&mut self, ty: ComponentType) -> Option<Box<dyn Component>> {
        if ty == ComponentType::Transform {
            log::warn!("Refusing to remove the Transform of entity '{}'", self.name);
            return None;
        }
        let index = self.components.iter().position(|slot| slot.ty == ty)?;
        let mut component = self.components.remove(index).component?;
        detach(component.as_mut());

        log::debug!("Removed {} from entity '{}'", ty, self.name);
        Some(component)
    }

    /// Whether a component of `ty` is attached
    pub fn has_component(&self, ty: ComponentType) -> bool {
        self.components.iter().any(|slot| slot.ty == ty)
    }

    /// Attached `T`, if any
    pub fn get_component<T: TypedComponent>(&self) -> Option<&T> {
        self.get_component_by_type(T::TYPE)?.as_any().downcast_ref::<T>()
    }

    /// Attached `T`, mutable
    pub fn get_component_mut<T: TypedComponent>(&mut self) -> Option<&mut T> {
        self.get_component_by_type_mut(T::TYPE)?.as_any_mut().downcast_mut::<T>()
    }

    /// Attached component of `ty`, if any
    pub fn get_component_by_type(&self, ty: ComponentType) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|slot| slot.ty == ty)
            .and_then(|slot| slot.component.as_deref())
    }

    /// Attached component of `ty`, mutable
    pub fn get_component_by_type_mut(&mut self, ty: ComponentType) -> Option<&mut (dyn Component + 'static)> {
        self.components
            .iter_mut()
            .find(|slot| slot.ty == ty)
            .and_then(|slot| slot.component.as_deref_mut())
    }

    /// Attached components in insertion order
    pub fn components(&self) -> impl Iterator<Item = &(dyn Component + 'static)> + '_ {
        self.components.iter().filter_map(|slot| slot.component.as_deref())
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Tags of the attached components
    pub fn mask(&self) -> ComponentMask {
        self.components.iter().map(|slot| slot.ty).collect()
    }

    /// The entity's Transform
    ///
    /// `None` only while the Transform itself is being ticked.
    pub fn transform(&self) -> Option<&Transform> {
        self.get_component::<Transform>()
    }

    /// The entity's Transform, mutable
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.get_component_mut::<Transform>()
    }

    /// Start the simulation for every component; no-op when already started
    pub fn start(&mut self) {
        if self.simulating {
            return;
        }
        self.simulating = true;
        for component in self.components.iter_mut().filter_map(|slot| slot.component.as_deref_mut()) {
            component.on_start();
            component.base_mut().transition(LifecycleState::Simulating);
        }
        log::debug!("Entity '{}' started", self.name);
    }

    /// Stop the simulation for every component; no-op when not started
    pub fn stop(&mut self) {
        if !self.simulating {
            return;
        }
        self.simulating = false;
        for component in self.components.iter_mut().filter_map(|slot| slot.component.as_deref_mut()) {
            component.on_stop();
            component.base_mut().transition(LifecycleState::Stopped);
        }
        log::debug!("Entity '{}' stopped", self.name);
    }

    /// Tick every enabled component in insertion order
    ///
    /// Removals requested through [`TickContext::defer_remove`] are applied
    /// once every component has ticked.
    pub fn tick(&mut self, delta_time: f32) {
        if !self.active {
            return;
        }

        let mut deferred = Vec::new();
        for index in 0..self.components.len() {
            let Some(mut component) = self.components[index].component.take() else {
                continue;
            };
            if component.is_enabled() {
                assert!(
                    component.state().can_tick(),
                    "{} component ticked in state {:?}",
                    component.component_type(),
                    component.state()
                );
                let mut ctx = TickContext::new(self, delta_time, &mut deferred);
                component.on_tick(&mut ctx);
            }
            self.components[index].component = Some(component);
        }

        for ty in deferred {
            if self.remove_component_by_type(ty).is_none() {
                log::debug!("Deferred removal of {} on '{}' had nothing to remove", ty, self.name);
            }
        }
    }

    /// Translate entity references held by components after a load
    pub(crate) fn remap_entities(&mut self, remap: &dyn Fn(EntityId) -> Option<EntityId>) {
        for component in self.components.iter_mut().filter_map(|slot| slot.component.as_deref_mut()) {
            component.remap_entities(remap);
        }
    }

    /// Write name, active flag and every component to `sink`
    pub fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        sink.write_string(&self.name)?;
        sink.write_bool(self.active)?;

        sink.write_u32(self.components.len() as u32)?;
        for component in self.components() {
            sink.write_u32(component.component_type().as_u32())?;
            sink.write_bool(component.is_enabled())?;
            component.serialize(sink)?;
        }
        Ok(())
    }

    /// Read what [`Entity::serialize`] wrote, reusing attached components
    pub fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.name = source.read_string()?;
        self.active = source.read_bool()?;

        let count = source.read_u32()?;
        for _ in 0..count {
            let tag = source.read_u32()?;
            let ty = ComponentType::from_u32(tag)
                .filter(|ty| *ty != ComponentType::Undefined)
                .ok_or(PersistenceError::UnknownComponentType(tag))?;
            let enabled = source.read_bool()?;

            let component = self
                .get_or_add_component_by_type(ty)
                .ok_or(PersistenceError::UnknownComponentType(tag))?;
            component.set_enabled(enabled);
            component.deserialize(source)?;
        }
        Ok(())
    }
}

/// Run the removal hooks, stopping first when simulating
fn detach(component: &mut dyn Component) {
    if component.state() == LifecycleState::Simulating {
        component.on_stop();
        component.base_mut().transition(LifecycleState::Stopped);
    }
    component.on_remove();
    component.base_mut().transition(LifecycleState::Removed);
}

impl Drop for Entity {
    fn drop(&mut self) {
        for slot in self.components.iter_mut().rev() {
            if let Some(component) = slot.component.as_deref_mut() {
                detach(component);
            }
        }
        log::debug!("Entity '{}' dropped", self.name);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("active", &self.active)
            .field("simulating", &self.simulating)
            .field("components", &self.components.iter().map(|slot| slot.ty).collect::<Vec<_>>())
            .finish()
    }
}
