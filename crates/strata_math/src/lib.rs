//! Transform mathematics for scene asset documents
//!
//! This crate provides the vector, matrix and rigid-transform types the
//! document model is built on.
//!
//! ## Core Types
//!
//! - [`Vec3`] - vertex positions, normals, translations
//! - [`Vec4`] - convex-hull points/planes and velocity vectors
//! - [`Mat3`] - row-major rotation matrices
//! - [`Mat4`] - raw 4x4 matrices for wrapped collision shapes
//! - [`Transform`] - rotation + translation + uniform scale

mod vec3;
mod vec4;
mod mat3;
pub mod mat4;
mod transform;

pub use vec3::Vec3;
pub use vec4::Vec4;
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use transform::Transform;
