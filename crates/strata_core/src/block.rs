//! Block table keys and typed references
//!
//! Every entity in a document is one block in a single generational arena.
//! Callers never hold pointers into the table; they hold small typed
//! references the document re-resolves and kind-checks on every lookup.

use serde::{Serialize, Deserialize};
use slotmap::{new_key_type, Key, KeyData};

use crate::collision::{CollisionObject, CollisionShape, RigidBody};
use crate::extra::ExtraData;
use crate::node::Node;
use crate::shader::Shader;
use crate::shape::Shape;
use crate::skin::SkinInstance;

new_key_type! {
    /// Key into a document's block table
    ///
    /// Generational: removing a block bumps its slot version, so a stale
    /// key can never reach a block that later reused the slot.
    pub struct BlockKey;
}

/// One entity in a document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Block {
    Node(Node),
    Shape(Shape),
    Shader(Shader),
    SkinInstance(SkinInstance),
    ExtraData(ExtraData),
    CollisionObject(CollisionObject),
    RigidBody(RigidBody),
    CollisionShape(CollisionShape),
}

impl Block {
    /// Kind discriminator, used in error reporting and enumeration
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Node(_) => BlockKind::Node,
            Block::Shape(_) => BlockKind::Shape,
            Block::Shader(_) => BlockKind::Shader,
            Block::SkinInstance(_) => BlockKind::SkinInstance,
            Block::ExtraData(_) => BlockKind::ExtraData,
            Block::CollisionObject(_) => BlockKind::CollisionObject,
            Block::RigidBody(_) => BlockKind::RigidBody,
            Block::CollisionShape(_) => BlockKind::CollisionShape,
        }
    }
}

/// The closed set of block kinds a document can hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Node,
    Shape,
    Shader,
    SkinInstance,
    ExtraData,
    CollisionObject,
    RigidBody,
    CollisionShape,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BlockKind::Node => "node",
            BlockKind::Shape => "shape",
            BlockKind::Shader => "shader",
            BlockKind::SkinInstance => "skin instance",
            BlockKind::ExtraData => "extra data",
            BlockKind::CollisionObject => "collision object",
            BlockKind::RigidBody => "rigid body",
            BlockKind::CollisionShape => "collision shape",
        };
        write!(f, "{}", name)
    }
}

/// Common surface of the typed reference newtypes.
///
/// A reference promises a block kind; the document enforces the promise at
/// lookup time, so a reference forged from a raw handle can never hand back
/// a block of the wrong kind.
pub trait BlockRef: Copy {
    /// Kind of block this reference type addresses
    const KIND: BlockKind;

    fn key(self) -> BlockKey;
    fn from_key(key: BlockKey) -> Self;

    /// Pack into an opaque 64-bit handle for an external caller
    fn to_raw(self) -> u64 {
        self.key().data().as_ffi()
    }

    /// Rebuild from an opaque handle; the promised kind is re-checked at
    /// the next document lookup
    fn from_raw(raw: u64) -> Self {
        Self::from_key(KeyData::from_ffi(raw).into())
    }

    /// The reserved "no reference" value
    fn null() -> Self {
        Self::from_key(BlockKey::null())
    }

    fn is_null(self) -> bool {
        self.key().is_null()
    }
}

macro_rules! block_ref {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(BlockKey);

        impl BlockRef for $name {
            const KIND: BlockKind = BlockKind::$kind;

            fn key(self) -> BlockKey {
                self.0
            }

            fn from_key(key: BlockKey) -> Self {
                Self(key)
            }
        }
    };
}

block_ref! {
    /// Reference to a scene node; shape blocks also resolve here
    NodeRef => Node
}

block_ref! {
    /// Reference to a geometry-carrying shape
    ShapeRef => Shape
}

block_ref! {
    /// Reference to a shader block
    ShaderRef => Shader
}

block_ref! {
    /// Reference to a skin instance
    SkinRef => SkinInstance
}

block_ref! {
    /// Reference to an extra-data entry
    ExtraRef => ExtraData
}

block_ref! {
    /// Reference to a collision object
    ObjectRef => CollisionObject
}

block_ref! {
    /// Reference to a rigid body
    BodyRef => RigidBody
}

block_ref! {
    /// Reference to a collision shape
    ColShapeRef => CollisionShape
}

impl ShapeRef {
    /// Every shape is also a scene node
    pub fn as_node(self) -> NodeRef {
        NodeRef::from_key(self.key())
    }
}
