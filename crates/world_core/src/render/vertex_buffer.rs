//! Vertex buffer resource
//!
//! Mirrors the lifetime rules of a backend vertex buffer: `create` from a
//! typed vertex slice (stride taken from the vertex type), or
//! `create_dynamic` for a mappable buffer filled later. Re-creating a live
//! buffer releases the old storage first. `release` frees the storage
//! exactly once; later calls are ignored with a warning.

use bytemuck::Pod;

/// Allocation state of a [`VertexBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// Nothing allocated yet
    Empty,
    /// Storage allocated
    Live,
    /// Storage released
    Released,
}

/// CPU-side stand-in for a GPU vertex buffer
#[derive(Debug)]
pub struct VertexBuffer {
    name: String,
    mappable: bool,
    stride: u32,
    vertex_count: u32,
    data: Vec<u8>,
    state: BufferState,
}

impl VertexBuffer {
    /// Unallocated buffer; `mappable` buffers expose their bytes for writing
    pub fn new(name: impl Into<String>, mappable: bool) -> Self {
        Self {
            name: name.into(),
            mappable,
            stride: 0,
            vertex_count: 0,
            data: Vec::new(),
            state: BufferState::Empty,
        }
    }

    /// Upload `vertices`; stride is `size_of::<V>()`
    pub fn create<V: Pod>(&mut self, vertices: &[V]) {
        self.allocate::<V>(vertices.len());
        self.data.extend_from_slice(bytemuck::cast_slice(vertices));
    }

    /// Allocate zeroed storage for `vertex_count` vertices and make it mappable
    pub fn create_dynamic<V: Pod>(&mut self, vertex_count: usize) {
        self.mappable = true;
        self.allocate::<V>(vertex_count);
        self.data.resize(self.size_in_bytes(), 0);
    }

    fn allocate<V: Pod>(&mut self, vertex_count: usize) {
        if self.state == BufferState::Live {
            self.free();
        }
        self.stride = u32::try_from(std::mem::size_of::<V>()).unwrap_or(u32::MAX);
        self.vertex_count = u32::try_from(vertex_count).unwrap_or(u32::MAX);
        self.data = Vec::with_capacity(self.size_in_bytes());
        self.state = BufferState::Live;
        log::trace!(
            "Vertex buffer '{}' created: {} vertices x {} bytes",
            self.name,
            self.vertex_count,
            self.stride
        );
    }

    /// Writable view of a live mappable buffer
    pub fn mapped_data(&mut self) -> Option<&mut [u8]> {
        (self.mappable && self.state == BufferState::Live).then_some(self.data.as_mut_slice())
    }

    /// Byte contents of a live buffer
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Release the storage; returns `false` when there was nothing to release
    pub fn release(&mut self) -> bool {
        match self.state {
            BufferState::Live => {
                self.free();
                true
            }
            BufferState::Released => {
                log::warn!("Vertex buffer '{}' released twice", self.name);
                false
            }
            BufferState::Empty => false,
        }
    }

    fn free(&mut self) {
        log::trace!("Vertex buffer '{}' released ({} bytes)", self.name, self.data.len());
        self.data = Vec::new();
        self.state = BufferState::Released;
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of one vertex in bytes
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Total allocation size
    pub fn size_in_bytes(&self) -> usize {
        self.stride as usize * self.vertex_count as usize
    }

    /// Whether the buffer can be mapped
    pub fn is_mappable(&self) -> bool {
        self.mappable
    }

    /// Allocation state
    pub fn state(&self) -> BufferState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Vertex;

    #[test]
    fn test_create_uses_vertex_stride() {
        let vertices = [Vertex::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2]); 3];
        let mut buffer = VertexBuffer::new("triangle", false);
        buffer.create(&vertices);

        assert_eq!(buffer.stride() as usize, std::mem::size_of::<Vertex>());
        assert_eq!(buffer.vertex_count(), 3);
        assert_eq!(buffer.data().len(), buffer.size_in_bytes());
        assert!(buffer.mapped_data().is_none());
    }

    #[test]
    fn test_dynamic_buffer_is_mappable() {
        let mut buffer = VertexBuffer::new("lines", false);
        buffer.create_dynamic::<[f32; 3]>(8);

        let mapped = buffer.mapped_data().unwrap();
        assert_eq!(mapped.len(), 8 * 12);
        mapped[0] = 7;
        assert_eq!(buffer.data()[0], 7);
    }

    #[test]
    fn test_release_exactly_once() {
        let mut buffer = VertexBuffer::new("once", false);
        assert!(!buffer.release());

        buffer.create(&[1.0f32, 2.0, 3.0]);
        assert!(buffer.release());
        assert_eq!(buffer.state(), BufferState::Released);
        assert!(!buffer.release());
    }

    #[test]
    fn test_recreate_replaces_storage() {
        let mut buffer = VertexBuffer::new("grow", false);
        buffer.create(&[0u32; 4]);
        buffer.create(&[0u64; 2]);
        assert_eq!(buffer.stride(), 8);
        assert_eq!(buffer.vertex_count(), 2);
        assert_eq!(buffer.state(), BufferState::Live);
    }
}
