//! Renderable component
//!
//! Owns the vertex buffer for its geometry: the buffer is created in
//! `on_initialize` and released in `on_remove`, never later.

use crate::ecs::{Component, ComponentBase, ComponentType, Entity, EntityId, LifecycleState, TypedComponent};
use crate::persistence::{PersistenceError, PersistenceSink, PersistenceSource};
use crate::render::{BufferState, GeometryType, Vertex, VertexBuffer};

/// Mesh and material drawn by the renderer
#[derive(Debug)]
pub struct Renderable {
    base: ComponentBase,
    geometry: GeometryType,
    mesh_path: String,
    material_path: String,
    cast_shadows: bool,
    visible: bool,
    vertex_buffer: VertexBuffer,
}

impl TypedComponent for Renderable {
    const TYPE: ComponentType = ComponentType::Renderable;

    fn new(entity: EntityId) -> Self {
        let mut renderable = Self {
            base: ComponentBase::new(entity),
            geometry: GeometryType::default(),
            mesh_path: String::new(),
            material_path: String::new(),
            cast_shadows: true,
            visible: true,
            vertex_buffer: VertexBuffer::new("renderable", false),
        };
        renderable.base.set_type(Self::TYPE);

        let base = &mut renderable.base;
        base.register_attribute(
            "geometry",
            |r: &Self| r.geometry as u32,
            |r: &mut Self, v| r.set_geometry(GeometryType::from_u32(v)),
        );
        base.register_attribute("mesh", |r: &Self| r.mesh_path.clone(), |r: &mut Self, v| r.mesh_path = v);
        base.register_attribute("material", |r: &Self| r.material_path.clone(), |r: &mut Self, v| r.material_path = v);
        base.register_attribute("cast_shadows", |r: &Self| r.cast_shadows, |r: &mut Self, v| r.cast_shadows = v);
        base.register_attribute("visible", |r: &Self| r.visible, |r: &mut Self, v| r.visible = v);

        renderable
    }
}

impl Renderable {
    /// Geometry source
    pub fn geometry(&self) -> GeometryType {
        self.geometry
    }

    /// Switch geometry; rebuilds the buffer once the component is live
    pub fn set_geometry(&mut self, geometry: GeometryType) {
        if self.geometry == geometry {
            return;
        }
        self.geometry = geometry;
        if self.is_live() {
            self.upload_geometry();
        }
    }

    /// Upload caller-provided vertices as `Custom` geometry
    pub fn set_custom_geometry(&mut self, vertices: &[Vertex]) {
        self.geometry = GeometryType::Custom;
        if self.is_live() {
            self.vertex_buffer.create(vertices);
        }
    }

    /// Mesh asset path
    pub fn mesh_path(&self) -> &str {
        &self.mesh_path
    }

    /// Set the mesh asset path
    pub fn set_mesh_path(&mut self, path: impl Into<String>) {
        self.mesh_path = path.into();
    }

    /// Material asset path
    pub fn material_path(&self) -> &str {
        &self.material_path
    }

    /// Set the material asset path
    pub fn set_material_path(&mut self, path: impl Into<String>) {
        self.material_path = path.into();
    }

    /// Whether the mesh casts shadows
    pub fn cast_shadows(&self) -> bool {
        self.cast_shadows
    }

    /// Toggle shadow casting
    pub fn set_cast_shadows(&mut self, cast_shadows: bool) {
        self.cast_shadows = cast_shadows;
    }

    /// Whether the mesh is drawn
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the mesh
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// GPU-side vertex data
    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    fn is_live(&self) -> bool {
        matches!(
            self.base.state(),
            LifecycleState::Initialized | LifecycleState::Simulating | LifecycleState::Stopped
        )
    }

    fn release_buffer(&mut self) {
        if self.vertex_buffer.state() == BufferState::Live {
            self.vertex_buffer.release();
        }
    }

    fn upload_geometry(&mut self) {
        let vertices = self.geometry.vertices();
        if vertices.is_empty() {
            self.release_buffer();
        } else {
            self.vertex_buffer.create(&vertices);
        }
    }
}

impl Component for Renderable {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_initialize(&mut self, _entity: &Entity) {
        self.upload_geometry();
    }

    fn on_remove(&mut self) {
        self.release_buffer();
    }

    fn serialize(&self, sink: &mut dyn PersistenceSink) -> Result<(), PersistenceError> {
        self.serialize_attributes(sink)
    }

    fn deserialize(&mut self, source: &mut dyn PersistenceSource) -> Result<(), PersistenceError> {
        self.deserialize_attributes(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_follows_lifecycle() {
        let mut entity = Entity::new(EntityId::default(), "crate");
        let renderable = entity.add_component::<Renderable>().unwrap();
        assert_eq!(renderable.vertex_buffer().state(), BufferState::Empty);

        renderable.set_geometry(GeometryType::Cube);
        assert_eq!(renderable.vertex_buffer().vertex_count(), 36);

        let removed = entity.remove_component::<Renderable>().unwrap();
        assert_eq!(removed.vertex_buffer().state(), BufferState::Released);
    }

    #[test]
    fn test_geometry_before_attach_is_deferred() {
        let mut renderable = Renderable::new(EntityId::default());
        renderable.set_geometry(GeometryType::Quad);
        assert_eq!(renderable.vertex_buffer().state(), BufferState::Empty);
    }

    #[test]
    fn test_custom_geometry() {
        let mut entity = Entity::new(EntityId::default(), "tri");
        let renderable = entity.add_component::<Renderable>().unwrap();
        renderable.set_custom_geometry(&[Vertex::new([0.0; 3], [0.0, 0.0, 1.0], [0.0; 2]); 3]);
        assert_eq!(renderable.geometry(), GeometryType::Custom);
        assert_eq!(renderable.vertex_buffer().vertex_count(), 3);
    }
}
