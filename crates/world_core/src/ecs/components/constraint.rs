//! Constraint component
//!
//! Joins this entity's physics body to another entity's body. The other
//! body is referenced by entity handle, persisted through
//! [`EntityId::to_bits`] and remapped when a world is loaded.

use slotmap::Key;

use crate::ecs::attribute::AttributeValue;
use crate::ecs::{Component, ComponentBase, ComponentType, EntityId, TypedComponent};
use crate::foundation::math::{Quat, Vec3};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Joint kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ConstraintType {
    /// Ball joint
    #[default]
    Point = 0,
    /// Single rotation axis
    Hinge = 1,
    /// Single translation axis
    Slider = 2,
    /// Cone-limited swing plus twist
    ConeTwist = 3,
}

impl ConstraintType {
    /// Decode a persisted discriminant, defaulting to `Point`
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::Hinge,
            2 => Self::Slider,
            3 => Self::ConeTwist,
            _ => Self::Point,
        }
    }
}

// Index of `body_other` in the attribute list
const BODY_OTHER: usize = 1;

/// Joint between two bodies
#[derive(Debug)]
pub struct Constraint {
    base: ComponentBase,
    constraint_type: ConstraintType,
    body_other: EntityId,
    position: Vec3,
    rotation: Quat,
    position_other: Vec3,
    rotation_other: Quat,
    low_limit: f32,
    high_limit: f32,
    error_reduction: f32,
}

impl TypedComponent for Constraint {
    const TYPE: ComponentType = ComponentType::Constraint;

    fn new(entity: EntityId) -> Self {
        let mut constraint = Self {
            base: ComponentBase::new(entity),
            constraint_type: ConstraintType::default(),
            body_other: EntityId::null(),
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            position_other: Vec3::zeros(),
            rotation_other: Quat::identity(),
            low_limit: 0.0,
            high_limit: 0.0,
            error_reduction: 0.2,
        };
        constraint.base.set_type(Self::TYPE);

        let base = &mut constraint.base;
        base.register_attribute(
            "constraint_type",
            |c: &Self| c.constraint_type as u32,
            |c: &mut Self, v| c.constraint_type = ConstraintType::from_u32(v),
        );
        base.register_attribute(
            "body_other",
            |c: &Self| c.body_other.to_bits(),
            |c: &mut Self, v| c.set_body_other(Some(EntityId::from_bits(v))),
        );
        base.register_attribute("position", |c: &Self| c.position, |c: &mut Self, v| c.position = v);
        base.register_attribute("rotation", |c: &Self| c.rotation, |c: &mut Self, v| c.rotation = v);
        base.register_attribute("position_other", |c: &Self| c.position_other, |c: &mut Self, v| c.position_other = v);
        base.register_attribute("rotation_other", |c: &Self| c.rotation_other, |c: &mut Self, v| c.rotation_other = v);
        base.register_attribute("low_limit", |c: &Self| c.low_limit, |c: &mut Self, v| c.low_limit = v);
        base.register_attribute("high_limit", |c: &Self| c.high_limit, |c: &mut Self, v| c.high_limit = v);
        base.register_attribute("error_reduction", |c: &Self| c.error_reduction, |c: &mut Self, v| c.error_reduction = v);

        constraint
    }
}

impl Constraint {
    /// Joint kind
    pub fn constraint_type(&self) -> ConstraintType {
        self.constraint_type
    }

    /// Set the joint kind
    pub fn set_constraint_type(&mut self, constraint_type: ConstraintType) {
        self.constraint_type = constraint_type;
    }

    /// Entity whose body is on the other end, if any
    pub fn body_other(&self) -> Option<EntityId> {
        (!self.body_other.is_null()).then_some(self.body_other)
    }

    /// Attach to another entity's body; refuses the owning entity itself
    pub fn set_body_other(&mut self, other: Option<EntityId>) {
        match other.filter(|id| !id.is_null()) {
            Some(id) if id == self.base.entity() => {
                log::warn!("Constraint cannot attach an entity to itself");
            }
            Some(id) => self.body_other = id,
            None => self.body_other = EntityId::null(),
        }
    }

    /// Travel limits `(low, high)` along the joint axis
    pub fn limits(&self) -> (f32, f32) {
        (self.low_limit, self.high_limit)
    }

    /// Set travel limits; swapped when given in the wrong order
    pub fn set_limits(&mut self, low: f32, high: f32) {
        self.low_limit = low.min(high);
        self.high_limit = low.max(high);
    }
}

impl Component for Constraint {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        let values = self.read_attributes(source)?;
        self.set_attributes(&values);
        // Saved handles belong to the saving world until remapped
        if let Some(AttributeValue::U64(bits)) = values.get(BODY_OTHER) {
            self.body_other = EntityId::from_bits(*bits);
        }
        Ok(())
    }

    fn remap_entities(&mut self, remap: &dyn Fn(EntityId) -> Option<EntityId>) {
        if self.body_other.is_null() {
            return;
        }
        self.body_other = remap(self.body_other).unwrap_or_else(|| {
            log::warn!("Constraint target {:?} is not part of the loaded scene", self.body_other);
            EntityId::null()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_body_other_roundtrips_through_attributes() {
        let mut ids: SlotMap<EntityId, ()> = SlotMap::with_key();
        let owner = ids.insert(());
        let other = ids.insert(());

        let mut source = Constraint::new(owner);
        source.set_body_other(Some(other));
        source.set_limits(1.0, -1.0);

        let mut target = Constraint::new(owner);
        target.set_attributes(&source.attributes());
        assert_eq!(target.body_other(), Some(other));
        assert_eq!(target.limits(), (-1.0, 1.0));
    }

    #[test]
    fn test_detached_encodes_as_zero() {
        let constraint = Constraint::new(EntityId::default());
        assert_eq!(constraint.attributes()[1], AttributeValue::U64(0));
    }

    #[test]
    fn test_self_attachment_refused() {
        let mut ids: SlotMap<EntityId, ()> = SlotMap::with_key();
        let owner = ids.insert(());
        let mut constraint = Constraint::new(owner);
        constraint.set_body_other(Some(owner));
        assert_eq!(constraint.body_other(), None);
    }

    #[test]
    fn test_pasted_self_reference_refused() {
        let mut ids: SlotMap<EntityId, ()> = SlotMap::with_key();
        let owner = ids.insert(());
        let other = ids.insert(());

        let mut source = Constraint::new(other);
        source.set_body_other(Some(owner));

        let mut target = Constraint::new(owner);
        target.set_attributes(&source.attributes());
        assert_eq!(target.body_other(), None);
    }

    #[test]
    fn test_remap_translates_or_clears() {
        let mut ids: SlotMap<EntityId, ()> = SlotMap::with_key();
        let owner = ids.insert(());
        let saved = ids.insert(());
        let loaded = ids.insert(());

        let mut constraint = Constraint::new(owner);
        constraint.set_body_other(Some(saved));
        constraint.remap_entities(&|id| (id == saved).then_some(loaded));
        assert_eq!(constraint.body_other(), Some(loaded));

        constraint.remap_entities(&|_| None);
        assert_eq!(constraint.body_other(), None);
    }
}
