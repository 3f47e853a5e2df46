//! Collision blocks: objects, rigid bodies and shape volumes
//!
//! Collision hangs off a node as a three-level chain. The node points at a
//! collision object, the object at a rigid body, the body at a shape
//! volume. Shapes themselves can nest: a transformed shape wraps one child,
//! a list shape holds several, so a chair can be a list of boxes under one
//! body.

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

use strata_physics::{
    BodyParams, BoxParams, CapsuleParams, ConvexHullParams, ListParams, ShapeMaterial,
    TransformParams,
};

use crate::block::{Block, BlockRef, BodyRef, ColShapeRef, NodeRef, ObjectRef};
use crate::document::Document;
use crate::error::DocumentError;

bitflags! {
    /// Flag word on a collision object
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionObjectFlags: u16 {
        const ACTIVE = 1 << 0;
        const NOTIFY = 1 << 2;
        const SET_LOCAL = 1 << 3;
        const DEBUG_DISPLAY = 1 << 4;
        const USE_VELOCITY = 1 << 5;
        const RESET = 1 << 6;
        const SYNC_ON_UPDATE = 1 << 7;
        const ANIM_TARGETED = 1 << 10;
        const DISMEMBERED_LIMB = 1 << 11;
    }
}

impl Default for CollisionObjectFlags {
    fn default() -> Self {
        CollisionObjectFlags::ACTIVE | CollisionObjectFlags::SYNC_ON_UPDATE
    }
}

impl Serialize for CollisionObjectFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CollisionObjectFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(CollisionObjectFlags::from_bits_retain(u16::deserialize(
            deserializer,
        )?))
    }
}

/// Block tying a node to its rigid body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionObject {
    /// The node this object animates with
    pub target: NodeRef,
    pub body: BodyRef,
    pub flags: CollisionObjectFlags,
}

/// Whether a rigid body carries its own transform or rides the node's
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    #[default]
    Plain,
    Transformed,
}

/// Block holding simulation parameters and the shape volume reference
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub kind: BodyKind,
    pub params: BodyParams,
    pub shape: ColShapeRef,
}

/// The closed set of collision shape volumes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CollisionShape {
    Box(BoxParams),
    Capsule(CapsuleParams),
    ConvexHull(ConvexHullParams),
    Transformed {
        params: TransformParams,
        child: ColShapeRef,
    },
    List {
        params: ListParams,
        children: Vec<ColShapeRef>,
    },
}

impl CollisionShape {
    pub fn material(&self) -> ShapeMaterial {
        match self {
            CollisionShape::Box(params) => params.material,
            CollisionShape::Capsule(params) => params.material,
            CollisionShape::ConvexHull(params) => params.material,
            CollisionShape::Transformed { params, .. } => params.material,
            CollisionShape::List { params, .. } => params.material,
        }
    }
}

impl Document {
    pub fn add_box_shape(&mut self, params: BoxParams) -> ColShapeRef {
        ColShapeRef::from_key(self.insert(Block::CollisionShape(CollisionShape::Box(params))))
    }

    pub fn add_capsule_shape(&mut self, params: CapsuleParams) -> ColShapeRef {
        ColShapeRef::from_key(self.insert(Block::CollisionShape(CollisionShape::Capsule(params))))
    }

    pub fn add_convex_hull_shape(&mut self, params: ConvexHullParams) -> ColShapeRef {
        ColShapeRef::from_key(self.insert(Block::CollisionShape(CollisionShape::ConvexHull(
            params,
        ))))
    }

    /// Wrap an existing shape volume in a transform.
    ///
    /// The child must already be in the document.
    pub fn add_transformed_shape(
        &mut self,
        params: TransformParams,
        child: ColShapeRef,
    ) -> Result<ColShapeRef, DocumentError> {
        self.collision_shape(child)?;
        Ok(ColShapeRef::from_key(self.insert(Block::CollisionShape(
            CollisionShape::Transformed { params, child },
        ))))
    }

    /// Group existing shape volumes under a list shape.
    ///
    /// Every child must already be in the document.
    pub fn add_list_shape(
        &mut self,
        params: ListParams,
        children: &[ColShapeRef],
    ) -> Result<ColShapeRef, DocumentError> {
        for &child in children {
            self.collision_shape(child)?;
        }
        Ok(ColShapeRef::from_key(self.insert(Block::CollisionShape(
            CollisionShape::List {
                params,
                children: children.to_vec(),
            },
        ))))
    }

    /// Add a rigid body over an existing shape volume
    pub fn add_rigid_body(
        &mut self,
        kind: BodyKind,
        params: BodyParams,
        shape: ColShapeRef,
    ) -> Result<BodyRef, DocumentError> {
        self.collision_shape(shape)?;
        Ok(BodyRef::from_key(self.insert(Block::RigidBody(RigidBody {
            kind,
            params,
            shape,
        }))))
    }

    /// Attach a collision object to a node, pointing at an existing body.
    ///
    /// Replaces any collision link the node already had; the old object
    /// block stays in the document but is no longer reachable from the
    /// node.
    pub fn attach_collision(
        &mut self,
        node: NodeRef,
        body: BodyRef,
        flags: CollisionObjectFlags,
    ) -> Result<ObjectRef, DocumentError> {
        self.node(node)?;
        self.rigid_body(body)?;
        let object_ref = ObjectRef::from_key(self.insert(Block::CollisionObject(CollisionObject {
            target: node,
            body,
            flags,
        })));
        self.node_mut(node)?.collision = Some(object_ref);
        Ok(object_ref)
    }

    /// The collision object attached to a node, if any
    pub fn node_collision(&self, node: NodeRef) -> Result<Option<&CollisionObject>, DocumentError> {
        match self.node(node)?.collision {
            Some(object_ref) => Ok(Some(self.collision_object(object_ref)?)),
            None => Ok(None),
        }
    }

    /// Box parameters, if the referenced volume is a box
    pub fn box_shape(&self, shape: ColShapeRef) -> Result<Option<&BoxParams>, DocumentError> {
        match self.collision_shape(shape)? {
            CollisionShape::Box(params) => Ok(Some(params)),
            _ => Ok(None),
        }
    }

    /// Capsule parameters, if the referenced volume is a capsule
    pub fn capsule_shape(&self, shape: ColShapeRef) -> Result<Option<&CapsuleParams>, DocumentError> {
        match self.collision_shape(shape)? {
            CollisionShape::Capsule(params) => Ok(Some(params)),
            _ => Ok(None),
        }
    }

    /// Hull parameters, if the referenced volume is a convex hull
    pub fn convex_hull_shape(
        &self,
        shape: ColShapeRef,
    ) -> Result<Option<&ConvexHullParams>, DocumentError> {
        match self.collision_shape(shape)? {
            CollisionShape::ConvexHull(params) => Ok(Some(params)),
            _ => Ok(None),
        }
    }

    /// The wrapped child, if the referenced volume is a transformed shape
    pub fn transformed_child(&self, shape: ColShapeRef) -> Result<Option<ColShapeRef>, DocumentError> {
        match self.collision_shape(shape)? {
            CollisionShape::Transformed { child, .. } => Ok(Some(*child)),
            _ => Ok(None),
        }
    }

    /// The grouped children, if the referenced volume is a list shape
    pub fn list_children(&self, shape: ColShapeRef) -> Result<Option<&[ColShapeRef]>, DocumentError> {
        match self.collision_shape(shape)? {
            CollisionShape::List { children, .. } => Ok(Some(children)),
            _ => Ok(None),
        }
    }
}
