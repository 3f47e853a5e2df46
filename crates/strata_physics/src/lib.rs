//! Collision and rigid-body parameter model
//!
//! Documents describe collision geometry and body dynamics for the target
//! runtime to consume; simulation itself is out of scope for this
//! workspace. This crate holds the plain-data parameter blocks, and the
//! document graph in `strata_core` wires them together with references.

pub mod material;
pub mod body;
pub mod shapes;

// Material
pub use material::ShapeMaterial;

// Body parameters
pub use body::{BodyParams, CollisionFilter, MotionKind, QualityKind};

// Shape parameters
pub use shapes::{
    BoxParams, CapsuleParams, ConvexHullParams, ListParams, TransformParams,
    DEFAULT_CONVEX_RADIUS,
};
