//! Audio listener component
//!
//! Marks the entity whose Transform acts as the ears of the scene. Has no
//! attributes.

use crate::ecs::{Component, ComponentBase, ComponentType, EntityId, TickContext, TypedComponent};
use crate::foundation::math::Vec3;

/// Scene listener
#[derive(Debug)]
pub struct AudioListener {
    base: ComponentBase,
    position: Vec3,
    forward: Vec3,
}

impl TypedComponent for AudioListener {
    const TYPE: ComponentType = ComponentType::AudioListener;

    fn new(entity: EntityId) -> Self {
        let mut listener = Self {
            base: ComponentBase::new(entity),
            position: Vec3::zeros(),
            forward: Vec3::new(0.0, 0.0, -1.0),
        };
        listener.base.set_type(Self::TYPE);
        listener
    }
}

impl AudioListener {
    /// Listener position as of the last tick
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Listener facing as of the last tick
    pub fn forward(&self) -> Vec3 {
        self.forward
    }
}

impl Component for AudioListener {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(transform) = self.transform(ctx.entity()) {
            self.position = transform.position();
            self.forward = transform.forward();
        }
    }
}
