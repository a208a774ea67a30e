//! Component type registry
//!
//! A closed enumeration of component kinds plus the compile-time mapping
//! from concrete component types to their tag ([`TypedComponent::TYPE`]).
//! Adding a component kind means extending [`ComponentType`], implementing
//! [`TypedComponent`] for the new type and adding a [`construct`] arm.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;
use crate::ecs::components::{
    AudioListener, AudioSource, Camera, Constraint, Light, PhysicsBody, ReflectionProbe,
    Renderable, Terrain, Transform,
};
use crate::ecs::world::EntityId;

/// Stable tag for every component kind
///
/// Discriminants are persisted and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum ComponentType {
    /// Marks the entity as the audio listener
    AudioListener = 0,
    /// Positional sound emitter
    AudioSource = 1,
    /// Viewpoint and projection
    Camera = 2,
    /// Joint between two physics bodies
    Constraint = 3,
    /// Light emitter
    Light = 4,
    /// Mesh + material drawn by the renderer
    Renderable = 5,
    /// Rigid body description
    PhysicsBody = 6,
    /// Position, rotation and scale
    Transform = 7,
    /// Height-field terrain
    Terrain = 8,
    /// Environment capture probe
    ReflectionProbe = 9,
    /// Unset tag; never carried by a constructed component
    #[default]
    Undefined = 10,
}

impl ComponentType {
    /// Every concrete tag, in discriminant order (excludes `Undefined`)
    pub const ALL: [Self; 10] = [
        Self::AudioListener,
        Self::AudioSource,
        Self::Camera,
        Self::Constraint,
        Self::Light,
        Self::Renderable,
        Self::PhysicsBody,
        Self::Transform,
        Self::Terrain,
        Self::ReflectionProbe,
    ];

    /// Persisted discriminant
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Decode a persisted discriminant
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            10 => Some(Self::Undefined),
            v => Self::ALL.get(v as usize).copied(),
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::AudioListener => "AudioListener",
            Self::AudioSource => "AudioSource",
            Self::Camera => "Camera",
            Self::Constraint => "Constraint",
            Self::Light => "Light",
            Self::Renderable => "Renderable",
            Self::PhysicsBody => "PhysicsBody",
            Self::Transform => "Transform",
            Self::Terrain => "Terrain",
            Self::ReflectionProbe => "ReflectionProbe",
            Self::Undefined => "Undefined",
        }
    }

    /// Single-bit mask for this tag (empty for `Undefined`)
    pub const fn mask(self) -> ComponentMask {
        match self {
            Self::Undefined => ComponentMask::empty(),
            other => ComponentMask::from_bits_retain(1 << other.as_u32()),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of component tags, one bit per [`ComponentType`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ComponentMask: u32 {
        /// [`ComponentType::AudioListener`]
        const AUDIO_LISTENER = 1 << 0;
        /// [`ComponentType::AudioSource`]
        const AUDIO_SOURCE = 1 << 1;
        /// [`ComponentType::Camera`]
        const CAMERA = 1 << 2;
        /// [`ComponentType::Constraint`]
        const CONSTRAINT = 1 << 3;
        /// [`ComponentType::Light`]
        const LIGHT = 1 << 4;
        /// [`ComponentType::Renderable`]
        const RENDERABLE = 1 << 5;
        /// [`ComponentType::PhysicsBody`]
        const PHYSICS_BODY = 1 << 6;
        /// [`ComponentType::Transform`]
        const TRANSFORM = 1 << 7;
        /// [`ComponentType::Terrain`]
        const TERRAIN = 1 << 8;
        /// [`ComponentType::ReflectionProbe`]
        const REFLECTION_PROBE = 1 << 9;
    }
}

impl ComponentMask {
    /// Tags contained in the mask, in discriminant order
    pub fn types(self) -> impl Iterator<Item = ComponentType> {
        ComponentType::ALL.into_iter().filter(move |ty| self.contains(ty.mask()))
    }
}

impl FromIterator<ComponentType> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = ComponentType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |mask, ty| mask | ty.mask())
    }
}

/// Compile-time mapping from a concrete component type to its tag
pub trait TypedComponent: Component + Sized {
    /// Tag of this component type
    const TYPE: ComponentType;

    /// Construct the component for `entity`, registering its attributes
    fn new(entity: EntityId) -> Self;
}

/// Construct a component by tag; `None` for [`ComponentType::Undefined`]
pub fn construct(ty: ComponentType, entity: EntityId) -> Option<Box<dyn Component>> {
    let component: Box<dyn Component> = match ty {
        ComponentType::AudioListener => Box::new(AudioListener::new(entity)),
        ComponentType::AudioSource => Box::new(AudioSource::new(entity)),
        ComponentType::Camera => Box::new(Camera::new(entity)),
        ComponentType::Constraint => Box::new(Constraint::new(entity)),
        ComponentType::Light => Box::new(Light::new(entity)),
        ComponentType::Renderable => Box::new(Renderable::new(entity)),
        ComponentType::PhysicsBody => Box::new(PhysicsBody::new(entity)),
        ComponentType::Transform => Box::new(Transform::new(entity)),
        ComponentType::Terrain => Box::new(Terrain::new(entity)),
        ComponentType::ReflectionProbe => Box::new(ReflectionProbe::new(entity)),
        ComponentType::Undefined => return None,
    };
    Some(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_roundtrip() {
        for ty in ComponentType::ALL {
            assert_eq!(ComponentType::from_u32(ty.as_u32()), Some(ty));
        }
        assert_eq!(ComponentType::from_u32(10), Some(ComponentType::Undefined));
        assert_eq!(ComponentType::from_u32(11), None);
    }

    #[test]
    fn test_default_is_undefined() {
        assert_eq!(ComponentType::default(), ComponentType::Undefined);
    }

    #[test]
    fn test_static_mapping_matches_constructed_tag() {
        fn check<T: TypedComponent>() {
            let component = T::new(EntityId::default());
            assert_eq!(component.component_type(), T::TYPE);
        }
        check::<AudioListener>();
        check::<AudioSource>();
        check::<Camera>();
        check::<Constraint>();
        check::<Light>();
        check::<Renderable>();
        check::<PhysicsBody>();
        check::<Transform>();
        check::<Terrain>();
        check::<ReflectionProbe>();
    }

    #[test]
    fn test_construct_by_tag() {
        for ty in ComponentType::ALL {
            let component = construct(ty, EntityId::default()).unwrap();
            assert_eq!(component.component_type(), ty);
        }
        assert!(construct(ComponentType::Undefined, EntityId::default()).is_none());
    }

    #[test]
    fn test_mask_bits_match_named_flags() {
        assert_eq!(ComponentType::Transform.mask(), ComponentMask::TRANSFORM);
        assert_eq!(ComponentType::ReflectionProbe.mask(), ComponentMask::REFLECTION_PROBE);
        assert!(ComponentType::Undefined.mask().is_empty());

        let mask: ComponentMask = [ComponentType::Light, ComponentType::Transform].into_iter().collect();
        assert_eq!(mask.types().collect::<Vec<_>>(), vec![ComponentType::Light, ComponentType::Transform]);
    }
}
