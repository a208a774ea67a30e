//! Terrain component
//!
//! A height-field described by a height-map path and the vertical range the
//! map's values are scaled into.

use crate::ecs::{Component, ComponentBase, ComponentType, EntityId, TypedComponent};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};

/// Height-field terrain
#[derive(Debug)]
pub struct Terrain {
    base: ComponentBase,
    height_map: String,
    min_y: f32,
    max_y: f32,
    vertex_density: u32,
}

impl TypedComponent for Terrain {
    const TYPE: ComponentType = ComponentType::Terrain;

    fn new(entity: EntityId) -> Self {
        let mut terrain = Self {
            base: ComponentBase::new(entity),
            height_map: String::new(),
            min_y: 0.0,
            max_y: 30.0,
            vertex_density: 1,
        };
        terrain.base.set_type(Self::TYPE);

        let base = &mut terrain.base;
        base.register_attribute("height_map", |t: &Self| t.height_map.clone(), |t: &mut Self, v| t.height_map = v);
        base.register_attribute("min_y", |t: &Self| t.min_y, |t: &mut Self, v| t.min_y = v);
        base.register_attribute("max_y", |t: &Self| t.max_y, |t: &mut Self, v| t.max_y = v);
        base.register_attribute(
            "vertex_density",
            |t: &Self| t.vertex_density,
            |t: &mut Self, v| t.set_vertex_density(v),
        );

        terrain
    }
}

impl Terrain {
    /// Path of the height-map image
    pub fn height_map(&self) -> &str {
        &self.height_map
    }

    /// Set the height-map path
    pub fn set_height_map(&mut self, path: impl Into<String>) {
        self.height_map = path.into();
    }

    /// Vertical range `(min_y, max_y)`
    pub fn height_range(&self) -> (f32, f32) {
        (self.min_y, self.max_y)
    }

    /// Set the vertical range; swapped when given in the wrong order
    pub fn set_height_range(&mut self, min_y: f32, max_y: f32) {
        self.min_y = min_y.min(max_y);
        self.max_y = min_y.max(max_y);
    }

    /// Vertices per height-map texel
    pub fn vertex_density(&self) -> u32 {
        self.vertex_density
    }

    /// Set the vertex density; at least one
    pub fn set_vertex_density(&mut self, density: u32) {
        self.vertex_density = density.max(1);
    }

    /// Map a normalized height sample in `[0, 1]` into world units
    pub fn height_at(&self, sample: f32) -> f32 {
        self.min_y + sample.clamp(0.0, 1.0) * (self.max_y - self.min_y)
    }
}

impl Component for Terrain {
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
        self.deserialize_attributes(source)
    }
}
