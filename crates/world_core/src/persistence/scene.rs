//! RON scene documents
//!
//! A human-readable snapshot of a set of entities. Each component record
//! holds exactly what the component's `serialize` hook wrote, captured
//! through a [`MemoryStream`], so the document stays agnostic of component
//! semantics just like the binary stream.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ecs::attribute::AttributeValue;
use crate::ecs::component_type::ComponentType;
use crate::ecs::entity::Entity;
use crate::persistence::{MemoryStream, PersistenceError};

/// One component's persisted payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Component tag
    #[serde(rename = "type")]
    pub ty: ComponentType,
    /// Enabled flag
    pub enabled: bool,
    /// Values written by the component's `serialize` hook
    pub values: Vec<AttributeValue>,
}

/// One entity with its components in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Handle in the saving world, used to remap references on load
    #[serde(default)]
    pub id: u64,
    /// Entity name
    pub name: String,
    /// Active flag
    pub active: bool,
    /// Components in insertion order
    pub components: Vec<ComponentRecord>,
}

impl EntityRecord {
    /// Snapshot `entity`
    pub fn capture(entity: &Entity) -> Result<Self, PersistenceError> {
        let mut components = Vec::with_capacity(entity.component_count());
        for component in entity.components() {
            let mut stream = MemoryStream::new();
            component.serialize(&mut stream)?;
            components.push(ComponentRecord {
                ty: component.component_type(),
                enabled: component.is_enabled(),
                values: stream.into_values(),
            });
        }

        Ok(Self {
            id: entity.id().to_bits(),
            name: entity.name().to_owned(),
            active: entity.is_active(),
            components,
        })
    }

    /// Apply this record to `entity`, adding components it lacks
    pub fn restore(&self, entity: &mut Entity) -> Result<(), PersistenceError> {
        entity.set_name(self.name.clone());
        entity.set_active(self.active);

        for record in &self.components {
            let component = entity
                .get_or_add_component_by_type(record.ty)
                .ok_or(PersistenceError::UnknownComponentType(record.ty.as_u32()))?;
            component.set_enabled(record.enabled);
            let mut stream = MemoryStream::from_values(record.values.clone());
            component.deserialize(&mut stream)?;
        }
        Ok(())
    }
}

/// A RON-encoded scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Entities in creation order
    pub entities: Vec<EntityRecord>,
}

impl SceneDocument {
    /// Encode as pretty RON
    pub fn to_ron_string(&self) -> Result<String, PersistenceError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| PersistenceError::Ron(e.to_string()))
    }

    /// Decode from RON
    pub fn from_ron_str(text: &str) -> Result<Self, PersistenceError> {
        ron::from_str(text).map_err(|e| PersistenceError::Ron(e.to_string()))
    }

    /// Write to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Read from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }
}
