//! Core document model for block-based scene assets
//!
//! Everything in an asset is a block held in one [`Document`] arena and
//! addressed through typed references. The modules here cover the block
//! store itself, the node hierarchy, shape geometry, shaders, extra data,
//! segmentation and collision, plus RON persistence of whole documents.
//!
//! Skeleton handling and the staged skin-binding workflow live in the
//! `strata_skin` crate on top of this one.

pub mod block;
pub mod collision;
pub mod document;
pub mod error;
pub mod extra;
pub mod node;
pub mod report;
pub mod segmentation;
pub mod shader;
pub mod shape;
pub mod skin;
pub mod version;

pub use block::{
    Block, BlockKey, BlockKind, BlockRef, BodyRef, ColShapeRef, ExtraRef, NodeRef, ObjectRef,
    ShaderRef, ShapeRef, SkinRef,
};
pub use collision::{BodyKind, CollisionObject, CollisionObjectFlags, CollisionShape, RigidBody};
pub use document::{Document, ROOT_NODE_NAME};
pub use error::DocumentError;
pub use extra::{ExtraData, ExtraDataKind, FurniturePosition};
pub use node::{Node, NodeFlags};
pub use report::MessageLog;
pub use segmentation::{
    Partition, PartitionFlags, PartitionSlot, Segment, Segmentation, Subsegment,
};
pub use shader::{
    EffectAttributes, LightingAttributes, LightingKind, Shader, ShaderFlags1, ShaderFlags2,
    ShaderQuery, UvTransform,
};
pub use shape::{AlphaBlend, Geometry, Shape, Triangle};
pub use skin::{BoneBinding, SkinInstance, VertexWeight};
pub use version::{EngineTarget, FormatVersion, UnknownTargetError};
