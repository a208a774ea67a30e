//! GPU resource layer
//!
//! The runtime does not talk to a graphics API. Renderable components hold
//! a [`VertexBuffer`] that records what would be uploaded (stride, count,
//! bytes) and enforces the create / release-exactly-once contract a backend
//! buffer wrapper has.

pub mod geometry;
pub mod vertex_buffer;

pub use geometry::{GeometryType, Vertex};
pub use vertex_buffer::{BufferState, VertexBuffer};
