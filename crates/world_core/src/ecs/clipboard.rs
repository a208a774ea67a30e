//! Component attribute clipboard
//!
//! Copies the attribute values of one component and pastes them onto a
//! component of the same type, on the same or another entity. Works purely
//! through the attribute registry.

use crate::ecs::attribute::{AttributeError, AttributeValue};
use crate::ecs::component_type::ComponentType;
use crate::ecs::entity::Entity;

#[derive(Debug, Clone)]
struct Copied {
    ty: ComponentType,
    values: Vec<AttributeValue>,
}

/// Holds at most one copied component
#[derive(Debug, Clone, Default)]
pub struct ComponentClipboard {
    copied: Option<Copied>,
}

impl ComponentClipboard {
    /// Empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the attributes of `entity`'s component of `ty`
    pub fn copy(&mut self, entity: &Entity, ty: ComponentType) -> Result<(), AttributeError> {
        let component = entity
            .get_component_by_type(ty)
            .ok_or(AttributeError::MissingComponent(ty))?;
        let values = component.attributes();
        log::debug!("Copied {} attributes of {} from '{}'", values.len(), ty, entity.name());
        self.copied = Some(Copied { ty, values });
        Ok(())
    }

    /// Paste onto `entity`, adding the component when it is missing
    ///
    /// Returns `Ok(false)` when the clipboard is empty.
    pub fn paste(&self, entity: &mut Entity) -> Result<bool, AttributeError> {
        let Some(copied) = &self.copied else {
            return Ok(false);
        };

        let name = entity.name().to_owned();
        let component = entity
            .get_or_add_component_by_type(copied.ty)
            .ok_or(AttributeError::MissingComponent(copied.ty))?;
        component.check_attributes(&copied.values)?;
        component.set_attributes(&copied.values);

        log::debug!("Pasted {} attributes onto '{}'", copied.ty, name);
        Ok(true)
    }

    /// Type of the copied component
    pub fn component_type(&self) -> Option<ComponentType> {
        self.copied.as_ref().map(|copied| copied.ty)
    }

    /// Copied values
    pub fn values(&self) -> Option<&[AttributeValue]> {
        self.copied.as_ref().map(|copied| copied.values.as_slice())
    }

    /// Whether nothing has been copied
    pub fn is_empty(&self) -> bool {
        self.copied.is_none()
    }

    /// Forget the copied values
    pub fn clear(&mut self) {
        self.copied = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Light, LightType};
    use crate::ecs::world::EntityId;

    #[test]
    fn test_copy_requires_component() {
        let entity = Entity::new(EntityId::default(), "empty");
        let mut clipboard = ComponentClipboard::new();
        let result = clipboard.copy(&entity, ComponentType::Light);
        assert!(matches!(result, Err(AttributeError::MissingComponent(ComponentType::Light))));
        assert!(clipboard.is_empty());
    }

    #[test]
    fn test_paste_adds_missing_component() {
        let mut source = Entity::new(EntityId::default(), "source");
        let light = source.add_component::<Light>().unwrap();
        light.set_light_type(LightType::Directional);
        light.set_range(42.0);

        let mut clipboard = ComponentClipboard::new();
        clipboard.copy(&source, ComponentType::Light).unwrap();

        let mut target = Entity::new(EntityId::default(), "target");
        assert!(clipboard.paste(&mut target).unwrap());

        let pasted = target.get_component::<Light>().unwrap();
        assert_eq!(pasted.light_type(), LightType::Directional);
        assert_eq!(pasted.range(), 42.0);
    }

    #[test]
    fn test_paste_empty_is_noop() {
        let mut entity = Entity::new(EntityId::default(), "target");
        assert!(!ComponentClipboard::new().paste(&mut entity).unwrap());
        assert_eq!(entity.component_count(), 1);
    }
}
