//! Generic entity inspector
//!
//! Lists every component's attributes by name without knowing any concrete
//! component type, and applies checked single-field edits the way an editor
//! property panel would.

use std::fmt;

use crate::ecs::attribute::{AttributeError, AttributeKind, AttributeValue};
use crate::ecs::component::{Component, LifecycleState};
use crate::ecs::component_type::ComponentType;
use crate::ecs::entity::Entity;
use crate::ecs::world::EntityId;

/// One attribute of a component
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReport {
    /// Attribute name
    pub name: &'static str,
    /// Stored kind
    pub kind: AttributeKind,
    /// Current value
    pub value: AttributeValue,
}

/// One component of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentReport {
    /// Component tag
    pub ty: ComponentType,
    /// Enabled flag
    pub enabled: bool,
    /// Lifecycle state
    pub state: LifecycleState,
    /// Attributes in registration order
    pub fields: Vec<FieldReport>,
}

/// Snapshot of an entity for display
#[derive(Debug, Clone, PartialEq)]
pub struct EntityReport {
    /// Entity handle
    pub id: EntityId,
    /// Entity name
    pub name: String,
    /// Active flag
    pub active: bool,
    /// Components in insertion order
    pub components: Vec<ComponentReport>,
}

/// Describe one component
pub fn inspect_component(component: &dyn Component) -> ComponentReport {
    let fields = component
        .attribute_infos()
        .into_iter()
        .zip(component.attributes())
        .map(|(info, value)| FieldReport { name: info.name, kind: info.kind, value })
        .collect();

    ComponentReport {
        ty: component.component_type(),
        enabled: component.is_enabled(),
        state: component.state(),
        fields,
    }
}

/// Describe `entity` and all of its components
pub fn inspect_entity(entity: &Entity) -> EntityReport {
    EntityReport {
        id: entity.id(),
        name: entity.name().to_owned(),
        active: entity.is_active(),
        components: entity.components().map(|component| inspect_component(component)).collect(),
    }
}

/// Write `value` to attribute `index` of `entity`'s component of `ty`
pub fn edit(entity: &mut Entity, ty: ComponentType, index: usize, value: AttributeValue) -> Result<(), AttributeError> {
    let component = entity
        .get_component_by_type_mut(ty)
        .ok_or(AttributeError::MissingComponent(ty))?;
    component.try_set_attribute(index, value)
}

/// Write `value` to the attribute called `name`
pub fn edit_by_name(
    entity: &mut Entity,
    ty: ComponentType,
    name: &str,
    value: AttributeValue,
) -> Result<(), AttributeError> {
    let component = entity
        .get_component_by_type_mut(ty)
        .ok_or(AttributeError::MissingComponent(ty))?;
    let index = component
        .attribute_infos()
        .iter()
        .position(|info| info.name == name)
        .ok_or_else(|| AttributeError::UnknownAttribute(name.to_owned()))?;
    component.try_set_attribute(index, value)
}

impl fmt::Display for EntityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = if self.active { "" } else { " (inactive)" };
        writeln!(f, "{}{}", self.name, active)?;
        for component in &self.components {
            let enabled = if component.enabled { "" } else { " (disabled)" };
            writeln!(f, "  {} [{:?}]{}", component.ty, component.state, enabled)?;
            for field in &component.fields {
                writeln!(f, "    {:<24} {}", field.name, field.value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Light;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_report_lists_fields_in_order() {
        let mut entity = Entity::new(EntityId::default(), "lamp");
        entity.add_component::<Light>();

        let report = inspect_entity(&entity);
        assert_eq!(report.components.len(), 2);

        let transform = &report.components[0];
        let names: Vec<_> = transform.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["position", "rotation", "scale"]);
        assert_eq!(transform.fields[0].kind, AttributeKind::Vec3);

        let text = report.to_string();
        assert!(text.contains("Light"));
        assert!(text.contains("intensity"));
    }

    #[test]
    fn test_edit_validates_input() {
        let mut entity = Entity::new(EntityId::default(), "lamp");

        edit(&mut entity, ComponentType::Transform, 0, AttributeValue::Vec3(Vec3::new(1.0, 2.0, 3.0))).unwrap();
        assert_eq!(entity.transform().unwrap().position(), Vec3::new(1.0, 2.0, 3.0));

        let wrong_kind = edit(&mut entity, ComponentType::Transform, 0, AttributeValue::F32(1.0));
        assert!(matches!(wrong_kind, Err(AttributeError::KindMismatch { .. })));

        let out_of_range = edit(&mut entity, ComponentType::Transform, 9, AttributeValue::F32(1.0));
        assert!(matches!(out_of_range, Err(AttributeError::IndexOutOfRange { .. })));

        let missing = edit(&mut entity, ComponentType::Camera, 0, AttributeValue::F32(1.0));
        assert!(matches!(missing, Err(AttributeError::MissingComponent(ComponentType::Camera))));
    }

    #[test]
    fn test_edit_by_name() {
        let mut entity = Entity::new(EntityId::default(), "lamp");
        entity.add_component::<Light>();
        edit_by_name(&mut entity, ComponentType::Light, "intensity", AttributeValue::F32(7.5)).unwrap();
        assert_eq!(entity.get_component::<Light>().unwrap().intensity(), 7.5);

        let unknown = edit_by_name(&mut entity, ComponentType::Light, "wattage", AttributeValue::F32(1.0));
        assert_eq!(unknown, Err(AttributeError::UnknownAttribute("wattage".to_owned())));
    }
}
