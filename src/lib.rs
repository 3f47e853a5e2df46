//! Strata - versioned block documents for 3D scene assets
//!
//! One facade over the workspace crates: documents and their blocks from
//! `strata_core`, transforms from `strata_math`, collision parameter sets
//! from `strata_physics` and the skeleton/skin workflow from `strata_skin`,
//! plus configuration loading for tools built on top.

pub mod config;

pub use strata_core::{
    AlphaBlend, Block, BlockKind, BlockRef, BodyKind, BodyRef, BoneBinding, ColShapeRef,
    CollisionObject, CollisionObjectFlags, CollisionShape, Document, DocumentError,
    EffectAttributes, EngineTarget, ExtraData, ExtraDataKind, ExtraRef, FormatVersion,
    FurniturePosition, Geometry, LightingAttributes, LightingKind, MessageLog, Node, NodeFlags,
    NodeRef, ObjectRef, Partition, PartitionFlags, PartitionSlot, RigidBody, Segment,
    Segmentation, Shader, ShaderFlags1, ShaderFlags2, ShaderQuery, ShaderRef, Shape, ShapeRef,
    SkinInstance, SkinRef, Subsegment, Triangle, VertexWeight, ROOT_NODE_NAME,
};
pub use strata_math::{Mat3, Mat4, Transform, Vec3, Vec4};
pub use strata_physics::{
    BodyParams, BoxParams, CapsuleParams, CollisionFilter, ConvexHullParams, ListParams,
    MotionKind, QualityKind, ShapeMaterial, TransformParams,
};
pub use strata_skin::{Bone, Skeleton, SkeletonCache, SkinBinding, SkinError};

pub use config::{StrataConfig, ConfigError};
