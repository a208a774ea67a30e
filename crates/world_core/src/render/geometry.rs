//! Built-in vertex layout and primitive geometry

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, normal, texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
    /// Texture coordinate
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Build a vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { position, normal, tex_coord }
    }
}

/// Geometry source of a renderable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum GeometryType {
    /// Geometry supplied from a mesh asset
    #[default]
    Custom = 0,
    /// Unit quad in the XZ plane facing +Y
    Quad = 1,
    /// Unit cube centred on the origin
    Cube = 2,
}

impl GeometryType {
    /// Decode a persisted discriminant, defaulting to `Custom`
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::Quad,
            2 => Self::Cube,
            _ => Self::Custom,
        }
    }

    /// Triangle-list vertices; empty for `Custom`
    pub fn vertices(self) -> Vec<Vertex> {
        match self {
            Self::Custom => Vec::new(),
            Self::Quad => face([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0], 0.0),
            Self::Cube => {
                const AXES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
                    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
                    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
                    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
                    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
                    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
                    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
                ];
                AXES.iter().flat_map(|&(normal, u, v)| face(normal, u, v, 0.5)).collect()
            }
        }
    }
}

/// Two triangles spanning `u` and `v`, offset along `normal`
fn face(normal: [f32; 3], u: [f32; 3], v: [f32; 3], offset: f32) -> Vec<Vertex> {
    let corner = |su: f32, sv: f32| {
        let position = std::array::from_fn(|i| normal[i] * offset + u[i] * su * 0.5 + v[i] * sv * 0.5);
        Vertex::new(position, normal, [(su + 1.0) * 0.5, (1.0 - sv) * 0.5])
    };
    let (a, b, c, d) = (corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0));
    vec![a, b, c, a, c, d]
}
