//! Lifecycle ordering across entity operations
//!
//! A probe component records every hook it receives so the tests can check
//! the exact sequence the entity dispatches.

use std::cell::RefCell;

use crate::ecs::components::{Camera, Renderable};
use crate::ecs::{
    Component, ComponentBase, ComponentType, Entity, EntityId, LifecycleState, TickContext, TypedComponent, World,
};
use crate::render::{BufferState, GeometryType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Initialize,
    Start,
    Stop,
    Tick,
    Remove,
}

thread_local! {
    static HOOKS: RefCell<Vec<Hook>> = RefCell::new(Vec::new());
}

fn record(hook: Hook) {
    HOOKS.with(|hooks| hooks.borrow_mut().push(hook));
}

fn take_hooks() -> Vec<Hook> {
    HOOKS.with(|hooks| std::mem::take(&mut *hooks.borrow_mut()))
}

#[derive(Debug)]
struct Probe {
    base: ComponentBase,
    remove_on_tick: bool,
    saw_transform: bool,
    saw_itself: bool,
}

impl TypedComponent for Probe {
    const TYPE: ComponentType = ComponentType::AudioListener;

    fn new(entity: EntityId) -> Self {
        let mut probe = Self {
            base: ComponentBase::new(entity),
            remove_on_tick: false,
            saw_transform: false,
            saw_itself: false,
        };
        probe.base.set_type(Self::TYPE);
        probe.base.register_attribute(
            "remove_on_tick",
            |p: &Self| p.remove_on_tick,
            |p: &mut Self, v| p.remove_on_tick = v,
        );
        probe
    }
}

impl Component for Probe {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_initialize(&mut self, _entity: &Entity) {
        record(Hook::Initialize);
    }

    fn on_start(&mut self) {
        record(Hook::Start);
    }

    fn on_stop(&mut self) {
        record(Hook::Stop);
    }

    fn on_remove(&mut self) {
        record(Hook::Remove);
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        record(Hook::Tick);
        self.saw_transform = self.transform(ctx.entity()).is_some();
        self.saw_itself = ctx.entity().get_component::<Probe>().is_some();
        if self.remove_on_tick {
            ctx.defer_remove(Self::TYPE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_sequence() {
        take_hooks();
        let mut entity = Entity::new(EntityId::default(), "probe");
        entity.add_component::<Probe>().unwrap();
        entity.tick(0.016);
        entity.start();
        entity.start();
        entity.tick(0.016);
        entity.stop();
        entity.stop();
        entity.tick(0.016);
        entity.remove_component::<Probe>().unwrap();
        entity.tick(0.016);

        assert_eq!(
            take_hooks(),
            vec![
                Hook::Initialize,
                Hook::Tick,
                Hook::Start,
                Hook::Tick,
                Hook::Stop,
                Hook::Tick,
                Hook::Remove,
            ]
        );
    }

    #[test]
    fn test_added_while_simulating_receives_start() {
        take_hooks();
        let mut entity = Entity::new(EntityId::default(), "probe");
        entity.start();
        entity.add_component::<Probe>().unwrap();
        assert_eq!(take_hooks(), vec![Hook::Initialize, Hook::Start]);
    }

    #[test]
    fn test_removed_while_simulating_stops_first() {
        take_hooks();
        let mut entity = Entity::new(EntityId::default(), "probe");
        entity.add_component::<Probe>().unwrap();
        entity.start();
        let probe = entity.remove_component::<Probe>().unwrap();

        assert_eq!(probe.state(), LifecycleState::Removed);
        assert_eq!(take_hooks(), vec![Hook::Initialize, Hook::Start, Hook::Stop, Hook::Remove]);
    }

    #[test]
    fn test_dropped_entity_removes_components() {
        take_hooks();
        {
            let mut entity = Entity::new(EntityId::default(), "probe");
            entity.add_component::<Probe>().unwrap();
            entity.start();
        }
        assert_eq!(take_hooks(), vec![Hook::Initialize, Hook::Start, Hook::Stop, Hook::Remove]);
    }

    #[test]
    fn test_destroyed_entity_removes_components() {
        take_hooks();
        let mut world = World::default();
        let id = world.create_entity("probe").unwrap();
        world.entity_mut(id).unwrap().add_component::<Probe>().unwrap();
        world.destroy_entity(id).unwrap();
        assert_eq!(take_hooks(), vec![Hook::Initialize, Hook::Remove]);
    }

    #[test]
    fn test_tick_sees_siblings_but_not_itself() {
        let mut entity = Entity::new(EntityId::default(), "probe");
        entity.add_component::<Probe>().unwrap();
        entity.tick(0.016);

        let probe = entity.get_component::<Probe>().unwrap();
        assert!(probe.saw_transform);
        assert!(!probe.saw_itself);
    }

    #[test]
    fn test_deferred_removal_applies_after_tick() {
        take_hooks();
        let mut entity = Entity::new(EntityId::default(), "probe");
        entity.add_component::<Probe>().unwrap().remove_on_tick = true;
        entity.tick(0.016);

        assert!(!entity.has_component(ComponentType::AudioListener));
        assert_eq!(take_hooks(), vec![Hook::Initialize, Hook::Tick, Hook::Remove]);
    }

    #[test]
    fn test_disabled_component_skips_tick() {
        take_hooks();
        let mut entity = Entity::new(EntityId::default(), "probe");
        entity.add_component::<Probe>().unwrap().set_enabled(false);
        entity.tick(0.016);
        assert_eq!(take_hooks(), vec![Hook::Initialize]);
    }

    #[test]
    fn test_inactive_entity_skips_tick() {
        take_hooks();
        let mut entity = Entity::new(EntityId::default(), "probe");
        entity.add_component::<Probe>().unwrap();
        entity.set_active(false);
        entity.tick(0.016);
        assert_eq!(take_hooks(), vec![Hook::Initialize]);
    }

    #[test]
    fn test_camera_add_remove_add() {
        let mut entity = Entity::new(EntityId::default(), "viewer");
        assert!(entity.add_component::<Camera>().is_some());

        let removed = entity.remove_component::<Camera>().unwrap();
        assert_eq!(removed.state(), LifecycleState::Removed);
        assert!(entity.remove_component::<Camera>().is_none());

        let camera = entity.add_component::<Camera>().unwrap();
        assert_eq!(camera.state(), LifecycleState::Initialized);
        assert_eq!(entity.component_count(), 2);
    }

    #[test]
    fn test_renderable_buffer_released_once() {
        let mut entity = Entity::new(EntityId::default(), "mesh");
        entity.add_component::<Renderable>().unwrap().set_geometry(GeometryType::Quad);

        let mut removed = entity.remove_component::<Renderable>().unwrap();
        assert_eq!(removed.vertex_buffer().state(), BufferState::Released);

        // A second removal hook must not release again
        removed.on_remove();
        assert_eq!(removed.vertex_buffer().state(), BufferState::Released);
    }
}
