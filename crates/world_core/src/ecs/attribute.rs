//! Attribute registry
//!
//! Every component exposes its persisted fields as an ordered list of
//! type-erased (getter, setter) pairs. Generic consumers such as the
//! persistence layer, the inspector and the clipboard only ever see
//! [`AttributeValue`]s, never the concrete component type.
//!
//! The list is positional: [`SharedAttributes::apply`] writes `values[i]`
//! through the `i`-th setter, so source and destination must have been
//! registered in the same order. Components register their attributes in
//! their constructor and the owning entity seals the registry once
//! `on_initialize` has returned.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::ecs::component_type::ComponentType;
use crate::foundation::math::{Quat, Vec3, Vec4};

/// A single attribute value carrying its concrete stored type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    I32(i32),
    /// Unsigned integer, also used for enum discriminants
    U32(u32),
    /// Wide unsigned integer, used for entity references
    U64(u64),
    /// Scalar
    F32(f32),
    /// 3D vector
    Vec3(Vec3),
    /// 4D vector or RGBA color
    Vec4(Vec4),
    /// Rotation
    Quat(Quat),
    /// Text such as asset paths
    String(String),
}

impl AttributeValue {
    /// The kind tag of this value
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Bool(_) => AttributeKind::Bool,
            Self::I32(_) => AttributeKind::I32,
            Self::U32(_) => AttributeKind::U32,
            Self::U64(_) => AttributeKind::U64,
            Self::F32(_) => AttributeKind::F32,
            Self::Vec3(_) => AttributeKind::Vec3,
            Self::Vec4(_) => AttributeKind::Vec4,
            Self::Quat(_) => AttributeKind::Quat,
            Self::String(_) => AttributeKind::String,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v:.3}"),
            Self::Vec3(v) => write!(f, "({:.3}, {:.3}, {:.3})", v.x, v.y, v.z),
            Self::Vec4(v) => write!(f, "({:.3}, {:.3}, {:.3}, {:.3})", v.x, v.y, v.z, v.w),
            Self::Quat(q) => {
                let (roll, pitch, yaw) = q.euler_angles();
                write!(f, "euler({roll:.3}, {pitch:.3}, {yaw:.3})")
            }
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// Kind tag naming each [`AttributeValue`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// [`AttributeValue::Bool`]
    Bool,
    /// [`AttributeValue::I32`]
    I32,
    /// [`AttributeValue::U32`]
    U32,
    /// [`AttributeValue::U64`]
    U64,
    /// [`AttributeValue::F32`]
    F32,
    /// [`AttributeValue::Vec3`]
    Vec3,
    /// [`AttributeValue::Vec4`]
    Vec4,
    /// [`AttributeValue::Quat`]
    Quat,
    /// [`AttributeValue::String`]
    String,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Rust types that can be stored behind an attribute
pub trait AttributeType: Sized + 'static {
    /// Variant used to carry this type
    const KIND: AttributeKind;

    /// Wrap into the variant type
    fn into_value(self) -> AttributeValue;

    /// Checked unwrap; hands the value back on a kind mismatch
    fn from_value(value: AttributeValue) -> Result<Self, AttributeValue>;
}

macro_rules! impl_attribute_type {
    ($ty:ty, $variant:ident) => {
        impl AttributeType for $ty {
            const KIND: AttributeKind = AttributeKind::$variant;

            fn into_value(self) -> AttributeValue {
                AttributeValue::$variant(self)
            }

            fn from_value(value: AttributeValue) -> Result<Self, AttributeValue> {
                match value {
                    AttributeValue::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

impl_attribute_type!(bool, Bool);
impl_attribute_type!(i32, I32);
impl_attribute_type!(u32, U32);
impl_attribute_type!(u64, U64);
impl_attribute_type!(f32, F32);
impl_attribute_type!(Vec3, Vec3);
impl_attribute_type!(Vec4, Vec4);
impl_attribute_type!(Quat, Quat);
impl_attribute_type!(String, String);

/// Name and kind of a registered attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeInfo {
    /// Field name shown by editors
    pub name: &'static str,
    /// Stored kind
    pub kind: AttributeKind,
}

type Getter = Box<dyn Fn(&dyn Any) -> AttributeValue>;
type Setter = Box<dyn Fn(&mut dyn Any, AttributeValue)>;

/// A registered (getter, setter) pair
pub struct Attribute {
    info: AttributeInfo,
    getter: Getter,
    setter: Setter,
}

impl Attribute {
    /// Name and kind
    pub fn info(&self) -> AttributeInfo {
        self.info
    }

    /// Read the current value from `owner`
    pub fn get(&self, owner: &dyn Any) -> AttributeValue {
        (self.getter)(owner)
    }

    /// Write `value` into `owner`
    ///
    /// # Panics
    /// If `value` is not of this attribute's kind or `owner` is not the
    /// component type the attribute was registered for.
    pub fn set(&self, owner: &mut dyn Any, value: AttributeValue) {
        (self.setter)(owner, value);
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute").field("name", &self.info.name).field("kind", &self.info.kind).finish()
    }
}

/// Recoverable attribute errors raised by checked (editor-facing) writes
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    /// Index past the end of the registry
    #[error("attribute index {index} out of range (component has {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Registry length
        len: usize,
    },

    /// Value kind does not match the registered kind
    #[error("attribute `{name}` expects {expected}, got {found}")]
    KindMismatch {
        /// Attribute name
        name: &'static str,
        /// Registered kind
        expected: AttributeKind,
        /// Supplied kind
        found: AttributeKind,
    },

    /// Fewer values than registered attributes
    #[error("expected at least {expected} attribute values, got {found}")]
    CountMismatch {
        /// Registry length
        expected: usize,
        /// Supplied length
        found: usize,
    },

    /// No attribute registered under the requested name
    #[error("no attribute named `{0}`")]
    UnknownAttribute(String),

    /// The entity has no component of the requested type
    #[error("entity has no {0} component")]
    MissingComponent(ComponentType),
}

/// Per-instance ordered attribute registry
#[derive(Debug, Default)]
pub struct AttributeRegistry {
    attributes: Rc<Vec<Attribute>>,
    sealed: bool,
}

impl AttributeRegistry {
    /// Create an empty, unsealed registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (getter, setter) pair for a field of component `C`
    ///
    /// Getter and setter share `T`, so they always agree on the stored type.
    ///
    /// # Panics
    /// When called after the registry was sealed.
    pub fn register<C, T>(
        &mut self,
        name: &'static str,
        getter: impl Fn(&C) -> T + 'static,
        setter: impl Fn(&mut C, T) + 'static,
    ) where
        C: 'static,
        T: AttributeType,
    {
        assert!(
            !self.sealed,
            "attribute `{name}` registered after initialization; attributes must be registered during construction"
        );

        let attribute = Attribute {
            info: AttributeInfo { name, kind: T::KIND },
            getter: Box::new(move |owner: &dyn Any| {
                let component = owner
                    .downcast_ref::<C>()
                    .unwrap_or_else(|| panic!("attribute `{name}` read from a foreign component type"));
                getter(component).into_value()
            }),
            setter: Box::new(move |owner: &mut dyn Any, value: AttributeValue| {
                let component = owner
                    .downcast_mut::<C>()
                    .unwrap_or_else(|| panic!("attribute `{name}` written to a foreign component type"));
                match T::from_value(value) {
                    Ok(inner) => setter(component, inner),
                    Err(found) => panic!(
                        "attribute `{name}` expects {} but received {}",
                        T::KIND,
                        found.kind()
                    ),
                }
            }),
        };

        match Rc::get_mut(&mut self.attributes) {
            Some(attributes) => attributes.push(attribute),
            None => panic!("attribute `{name}` registered while the registry is being applied"),
        }
    }

    /// Freeze the registry; further registration panics
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether the registry has been sealed
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of registered attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when no attributes are registered
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Names and kinds in registration order
    pub fn infos(&self) -> impl Iterator<Item = AttributeInfo> + '_ {
        self.attributes.iter().map(Attribute::info)
    }

    /// Kinds in registration order
    pub fn kinds(&self) -> Vec<AttributeKind> {
        self.infos().map(|info| info.kind).collect()
    }

    /// Snapshot every attribute of `owner` in registration order
    pub fn read(&self, owner: &dyn Any) -> Vec<AttributeValue> {
        self.attributes.iter().map(|attribute| attribute.get(owner)).collect()
    }

    /// Read a single attribute
    pub fn read_at(&self, index: usize, owner: &dyn Any) -> Option<AttributeValue> {
        self.attributes.get(index).map(|attribute| attribute.get(owner))
    }

    /// Handle to the attribute list that does not borrow the owner
    ///
    /// Setters need `&mut` access to the component that owns this registry,
    /// so writes go through a shared handle taken beforehand.
    pub fn share(&self) -> SharedAttributes {
        SharedAttributes(Rc::clone(&self.attributes))
    }

    /// Validate `values` against the registry without applying them
    pub fn check(&self, values: &[AttributeValue]) -> Result<(), AttributeError> {
        if values.len() < self.len() {
            return Err(AttributeError::CountMismatch { expected: self.len(), found: values.len() });
        }
        for (attribute, value) in self.attributes.iter().zip(values) {
            if attribute.info.kind != value.kind() {
                return Err(AttributeError::KindMismatch {
                    name: attribute.info.name,
                    expected: attribute.info.kind,
                    found: value.kind(),
                });
            }
        }
        Ok(())
    }
}

/// Borrow-free handle to a registry's attribute list
#[derive(Debug, Clone)]
pub struct SharedAttributes(Rc<Vec<Attribute>>);

impl SharedAttributes {
    /// Positional write: `attributes[i].set(values[i])` for every registered `i`
    ///
    /// Trailing values beyond the registry length are ignored.
    ///
    /// # Panics
    /// When `values` is shorter than the registry or a value has the wrong
    /// kind. Both are contract violations by the caller.
    pub fn apply(&self, owner: &mut dyn Any, values: &[AttributeValue]) {
        assert!(
            values.len() >= self.0.len(),
            "set_attributes received {} values but the component registers {} attributes",
            values.len(),
            self.0.len()
        );

        for (attribute, value) in self.0.iter().zip(values) {
            attribute.set(owner, value.clone());
        }
    }

    /// Checked single-field write for untrusted input
    pub fn try_apply_one(
        &self,
        owner: &mut dyn Any,
        index: usize,
        value: AttributeValue,
    ) -> Result<(), AttributeError> {
        let attribute = self
            .0
            .get(index)
            .ok_or(AttributeError::IndexOutOfRange { index, len: self.0.len() })?;

        if attribute.info.kind != value.kind() {
            return Err(AttributeError::KindMismatch {
                name: attribute.info.name,
                expected: attribute.info.kind,
                found: value.kind(),
            });
        }

        attribute.set(owner, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Probe {
        speed: f32,
        label: String,
        count: u32,
    }

    fn registry() -> AttributeRegistry {
        let mut registry = AttributeRegistry::new();
        registry.register("speed", |p: &Probe| p.speed, |p: &mut Probe, v| p.speed = v);
        registry.register("label", |p: &Probe| p.label.clone(), |p: &mut Probe, v| p.label = v);
        registry.register("count", |p: &Probe| p.count, |p: &mut Probe, v| p.count = v);
        registry
    }

    #[test]
    fn test_read_in_registration_order() {
        let probe = Probe { speed: 2.5, label: "a".into(), count: 7 };
        let values = registry().read(&probe);
        assert_eq!(
            values,
            vec![
                AttributeValue::F32(2.5),
                AttributeValue::String("a".into()),
                AttributeValue::U32(7),
            ]
        );
    }

    #[test]
    fn test_apply_copies_state() {
        let source = Probe { speed: 4.0, label: "src".into(), count: 3 };
        let mut target = Probe::default();
        let registry = registry();

        let values = registry.read(&source);
        registry.share().apply(&mut target, &values);

        assert_eq!(target.speed, 4.0);
        assert_eq!(target.label, "src");
        assert_eq!(target.count, 3);
    }

    #[test]
    fn test_apply_ignores_trailing_values() {
        let mut target = Probe::default();
        let mut values = registry().read(&Probe { speed: 1.0, label: String::new(), count: 9 });
        values.push(AttributeValue::Bool(true));
        registry().share().apply(&mut target, &values);
        assert_eq!(target.count, 9);
    }

    #[test]
    #[should_panic(expected = "set_attributes received 2 values")]
    fn test_apply_short_list_panics() {
        let mut target = Probe::default();
        let values = vec![AttributeValue::F32(1.0), AttributeValue::String("x".into())];
        registry().share().apply(&mut target, &values);
    }

    #[test]
    #[should_panic(expected = "expects F32 but received Bool")]
    fn test_apply_wrong_kind_panics() {
        let mut target = Probe::default();
        let values = vec![
            AttributeValue::Bool(true),
            AttributeValue::String("x".into()),
            AttributeValue::U32(1),
        ];
        registry().share().apply(&mut target, &values);
    }

    #[test]
    #[should_panic(expected = "registered after initialization")]
    fn test_register_after_seal_panics() {
        let mut registry = registry();
        registry.seal();
        registry.register("late", |p: &Probe| p.count, |p: &mut Probe, v| p.count = v);
    }

    #[test]
    fn test_check_reports_problems() {
        let registry = registry();
        assert_eq!(
            registry.check(&[AttributeValue::F32(1.0)]),
            Err(AttributeError::CountMismatch { expected: 3, found: 1 })
        );
        assert_eq!(
            registry.check(&[
                AttributeValue::F32(1.0),
                AttributeValue::U32(1),
                AttributeValue::U32(1),
            ]),
            Err(AttributeError::KindMismatch {
                name: "label",
                expected: AttributeKind::String,
                found: AttributeKind::U32,
            })
        );
    }

    #[test]
    fn test_try_apply_one() {
        let mut probe = Probe::default();
        let shared = registry().share();

        shared.try_apply_one(&mut probe, 2, AttributeValue::U32(5)).unwrap();
        assert_eq!(probe.count, 5);

        assert_eq!(
            shared.try_apply_one(&mut probe, 3, AttributeValue::U32(5)),
            Err(AttributeError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert!(matches!(
            shared.try_apply_one(&mut probe, 0, AttributeValue::U32(5)),
            Err(AttributeError::KindMismatch { name: "speed", .. })
        ));
        assert_eq!(probe.speed, 0.0);
    }
}
