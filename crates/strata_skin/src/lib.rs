//! Reference skeletons and the staged skin workflow
//!
//! Builds on `strata_core`: a [`SkeletonCache`] loads reference skeletons
//! once per engine target, and a [`SkinBinding`] stages bones and weight
//! tables for one shape before committing them to a document in a single
//! validated pass.

pub mod binding;
pub mod cache;
pub mod error;
pub mod skeleton;

pub use binding::SkinBinding;
pub use cache::SkeletonCache;
pub use error::SkinError;
pub use skeleton::{Bone, Skeleton};
