//! Math utilities and types
//!
//! Thin aliases over nalgebra shared by the components and the attribute
//! value type.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (also used for RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Quaternion components packed as `[x, y, z, w]`
pub fn quat_to_array(q: &Quat) -> [f32; 4] {
    let c = q.coords;
    [c.x, c.y, c.z, c.w]
}

/// Rebuild a unit quaternion from `[x, y, z, w]`, renormalizing
pub fn quat_from_array(a: [f32; 4]) -> Quat {
    Quat::new_normalize(Quaternion::new(a[3], a[0], a[1], a[2]))
}
