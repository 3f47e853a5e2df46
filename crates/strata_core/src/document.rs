//! The block document: arena, typed access and the scene graph
//!
//! A [`Document`] owns every block in one generational arena and remembers
//! the order blocks were added in, which is the order enumeration and name
//! queries walk. Access goes through typed references; resolving one checks
//! both liveness and block kind, so a stale or forged reference answers
//! with an error instead of the wrong block.
//!
//! Node references are deliberately loose in one direction: a shape is a
//! node with geometry attached, so a [`NodeRef`] aimed at a shape block
//! resolves to the shape's node half. The reverse does not hold.

use std::path::Path;
use std::sync::Arc;

use serde::{Serialize, Deserialize};
use slotmap::SlotMap;
use strata_math::{Transform, Vec3};

use crate::block::{
    Block, BlockKey, BlockKind, BlockRef, BodyRef, ColShapeRef, ExtraRef, NodeRef, ObjectRef,
    ShaderRef, ShapeRef, SkinRef,
};
use crate::collision::{CollisionObject, CollisionShape, RigidBody};
use crate::error::DocumentError;
use crate::extra::ExtraData;
use crate::node::Node;
use crate::report::MessageLog;
use crate::shader::Shader;
use crate::shape::{Geometry, Shape, Triangle};
use crate::skin::SkinInstance;
use crate::version::{EngineTarget, FormatVersion};

/// Name given to the root node of every new document
pub const ROOT_NODE_NAME: &str = "Scene Root";

/// A complete block asset: one arena of blocks plus the scene root
#[derive(Debug, Serialize, Deserialize)]
pub struct Document {
    target: EngineTarget,
    blocks: SlotMap<BlockKey, Block>,
    /// Insertion order; enumeration and name queries follow it
    order: Vec<BlockKey>,
    root: NodeRef,
    #[serde(skip)]
    log: Option<Arc<MessageLog>>,
}

impl Document {
    /// An empty document for the given engine target, holding only the
    /// root node
    pub fn new(target: EngineTarget) -> Self {
        let mut blocks = SlotMap::with_key();
        let root_key = blocks.insert(Block::Node(Node::new(ROOT_NODE_NAME)));
        Self {
            target,
            blocks,
            order: vec![root_key],
            root: NodeRef::from_key(root_key),
            log: None,
        }
    }

    pub fn root(&self) -> NodeRef {
        self.root
    }

    pub fn target(&self) -> EngineTarget {
        self.target
    }

    /// The version triple written into file headers for this target
    pub fn format_version(&self) -> FormatVersion {
        self.target.format_version()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Route rejection messages into a shared log
    pub fn attach_log(&mut self, log: Arc<MessageLog>) {
        self.log = Some(log);
    }

    /// Record a warning in the attached log, if any, and the log facade
    pub fn report(&self, message: String) {
        log::warn!("{}", message);
        if let Some(log) = &self.log {
            log.push(message);
        }
    }

    pub(crate) fn insert(&mut self, block: Block) -> BlockKey {
        let key = self.blocks.insert(block);
        self.order.push(key);
        key
    }

    /// Remove a block, leaving any references to it dangling.
    ///
    /// The root node cannot be removed. Answers whether a block was
    /// actually taken out.
    pub fn remove<R: BlockRef>(&mut self, block: R) -> bool {
        if block.key() == self.root.key() {
            return false;
        }
        if self.blocks.remove(block.key()).is_some() {
            self.order.retain(|&key| key != block.key());
            true
        } else {
            false
        }
    }

    /// Whether a live block sits behind this reference, regardless of kind
    pub fn contains<R: BlockRef>(&self, block: R) -> bool {
        self.blocks.contains_key(block.key())
    }

    /// Blocks in insertion order
    pub fn blocks_in_order(&self) -> impl Iterator<Item = (BlockKey, &Block)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.blocks.get(key).map(|block| (key, block)))
    }

    // ----- typed getters -------------------------------------------------

    /// Resolve a node reference.
    ///
    /// Shape blocks resolve too, answering with their node half.
    pub fn node(&self, node: NodeRef) -> Result<&Node, DocumentError> {
        match self.blocks.get(node.key()) {
            Some(Block::Node(block)) => Ok(block),
            Some(Block::Shape(shape)) => Ok(&shape.node),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::Node,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::Node)),
        }
    }

    pub fn node_mut(&mut self, node: NodeRef) -> Result<&mut Node, DocumentError> {
        match self.blocks.get_mut(node.key()) {
            Some(Block::Node(block)) => Ok(block),
            Some(Block::Shape(shape)) => Ok(&mut shape.node),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::Node,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::Node)),
        }
    }

    pub fn shape(&self, shape: ShapeRef) -> Result<&Shape, DocumentError> {
        match self.blocks.get(shape.key()) {
            Some(Block::Shape(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::Shape,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::Shape)),
        }
    }

    pub fn shape_mut(&mut self, shape: ShapeRef) -> Result<&mut Shape, DocumentError> {
        match self.blocks.get_mut(shape.key()) {
            Some(Block::Shape(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::Shape,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::Shape)),
        }
    }

    pub fn shader(&self, shader: ShaderRef) -> Result<&Shader, DocumentError> {
        match self.blocks.get(shader.key()) {
            Some(Block::Shader(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::Shader,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::Shader)),
        }
    }

    pub fn shader_mut(&mut self, shader: ShaderRef) -> Result<&mut Shader, DocumentError> {
        match self.blocks.get_mut(shader.key()) {
            Some(Block::Shader(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::Shader,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::Shader)),
        }
    }

    pub fn skin_instance(&self, skin: SkinRef) -> Result<&SkinInstance, DocumentError> {
        match self.blocks.get(skin.key()) {
            Some(Block::SkinInstance(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::SkinInstance,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::SkinInstance)),
        }
    }

    pub fn skin_instance_mut(&mut self, skin: SkinRef) -> Result<&mut SkinInstance, DocumentError> {
        match self.blocks.get_mut(skin.key()) {
            Some(Block::SkinInstance(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::SkinInstance,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::SkinInstance)),
        }
    }

    pub fn extra_data(&self, extra: ExtraRef) -> Result<&ExtraData, DocumentError> {
        match self.blocks.get(extra.key()) {
            Some(Block::ExtraData(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::ExtraData,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::ExtraData)),
        }
    }

    pub fn extra_data_mut(&mut self, extra: ExtraRef) -> Result<&mut ExtraData, DocumentError> {
        match self.blocks.get_mut(extra.key()) {
            Some(Block::ExtraData(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::ExtraData,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::ExtraData)),
        }
    }

    pub fn collision_object(&self, object: ObjectRef) -> Result<&CollisionObject, DocumentError> {
        match self.blocks.get(object.key()) {
            Some(Block::CollisionObject(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::CollisionObject,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::CollisionObject)),
        }
    }

    pub fn collision_object_mut(
        &mut self,
        object: ObjectRef,
    ) -> Result<&mut CollisionObject, DocumentError> {
        match self.blocks.get_mut(object.key()) {
            Some(Block::CollisionObject(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::CollisionObject,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::CollisionObject)),
        }
    }

    pub fn rigid_body(&self, body: BodyRef) -> Result<&RigidBody, DocumentError> {
        match self.blocks.get(body.key()) {
            Some(Block::RigidBody(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::RigidBody,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::RigidBody)),
        }
    }

    pub fn rigid_body_mut(&mut self, body: BodyRef) -> Result<&mut RigidBody, DocumentError> {
        match self.blocks.get_mut(body.key()) {
            Some(Block::RigidBody(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::RigidBody,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::RigidBody)),
        }
    }

    pub fn collision_shape(&self, shape: ColShapeRef) -> Result<&CollisionShape, DocumentError> {
        match self.blocks.get(shape.key()) {
            Some(Block::CollisionShape(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::CollisionShape,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::CollisionShape)),
        }
    }

    pub fn collision_shape_mut(
        &mut self,
        shape: ColShapeRef,
    ) -> Result<&mut CollisionShape, DocumentError> {
        match self.blocks.get_mut(shape.key()) {
            Some(Block::CollisionShape(block)) => Ok(block),
            Some(other) => Err(DocumentError::TypeMismatch {
                expected: BlockKind::CollisionShape,
                found: other.kind(),
            }),
            None => Err(DocumentError::UnknownBlock(BlockKind::CollisionShape)),
        }
    }

    // ----- scene graph ---------------------------------------------------

    /// Add a node under a parent, or under the root when `parent` is `None`
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<NodeRef>,
    ) -> Result<NodeRef, DocumentError> {
        let parent = parent.unwrap_or(self.root);
        self.node(parent)?;
        let node = Node::new(name).with_transform(transform).with_parent(parent);
        Ok(NodeRef::from_key(self.insert(Block::Node(node))))
    }

    /// Add a shape under a parent, or under the root when `parent` is
    /// `None`.
    ///
    /// The geometry is validated before anything enters the document.
    pub fn add_shape(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        geometry: Geometry,
        parent: Option<NodeRef>,
    ) -> Result<ShapeRef, DocumentError> {
        geometry.validate()?;
        let parent = parent.unwrap_or(self.root);
        self.node(parent)?;
        let mut shape = Shape::new(name, geometry).with_transform(transform);
        shape.node.parent = Some(parent);
        Ok(ShapeRef::from_key(self.insert(Block::Shape(shape))))
    }

    pub fn parent(&self, node: NodeRef) -> Result<Option<NodeRef>, DocumentError> {
        Ok(self.node(node)?.parent)
    }

    /// Reparent a node; `None` detaches it from the hierarchy.
    ///
    /// Rejected when the move would make the node its own ancestor.
    pub fn set_parent(
        &mut self,
        child: NodeRef,
        parent: Option<NodeRef>,
    ) -> Result<(), DocumentError> {
        self.node(child)?;
        if let Some(parent_ref) = parent {
            let mut visited = vec![child.key()];
            let mut current = Some(parent_ref);
            while let Some(ancestor) = current {
                if visited.contains(&ancestor.key()) {
                    return Err(DocumentError::Structural(format!(
                        "reparenting '{}' would close a cycle",
                        self.node(child)?.name
                    )));
                }
                visited.push(ancestor.key());
                current = self.node(ancestor)?.parent;
            }
        }
        self.node_mut(child)?.parent = parent;
        Ok(())
    }

    pub fn local_transform(&self, node: NodeRef) -> Result<Transform, DocumentError> {
        Ok(self.node(node)?.transform)
    }

    pub fn set_local_transform(
        &mut self,
        node: NodeRef,
        transform: Transform,
    ) -> Result<(), DocumentError> {
        self.node_mut(node)?.transform = transform;
        Ok(())
    }

    pub fn node_name(&self, node: NodeRef) -> Result<&str, DocumentError> {
        Ok(&self.node(node)?.name)
    }

    pub fn set_node_name(
        &mut self,
        node: NodeRef,
        name: impl Into<String>,
    ) -> Result<(), DocumentError> {
        self.node_mut(node)?.name = name.into();
        Ok(())
    }

    /// Compose a node's transform with its ancestry, root first.
    ///
    /// A cycle in the parent chain is a structural error, not a hang.
    pub fn global_transform(&self, node: NodeRef) -> Result<Transform, DocumentError> {
        let mut chain = Vec::new();
        let mut visited = Vec::new();
        let mut current = Some(node);
        while let Some(node_ref) = current {
            if visited.contains(&node_ref.key()) {
                return Err(DocumentError::Structural(format!(
                    "parent cycle through '{}'",
                    self.node(node_ref)?.name
                )));
            }
            visited.push(node_ref.key());
            let block = self.node(node_ref)?;
            chain.push(block.transform);
            current = block.parent;
        }
        let mut global = Transform::identity();
        for local in chain.iter().rev() {
            global = global.compose(local);
        }
        Ok(global)
    }

    /// Direct children of a node, in insertion order
    pub fn children(&self, node: NodeRef) -> Result<Vec<NodeRef>, DocumentError> {
        self.node(node)?;
        Ok(self
            .blocks_in_order()
            .filter_map(|(key, block)| {
                let parent = match block {
                    Block::Node(child) => child.parent,
                    Block::Shape(shape) => shape.node.parent,
                    _ => return None,
                };
                (parent == Some(node)).then(|| NodeRef::from_key(key))
            })
            .collect())
    }

    /// First node block with this name, in insertion order.
    ///
    /// Shapes count; they are nodes with geometry.
    pub fn find_node(&self, name: &str) -> Option<NodeRef> {
        self.blocks_in_order().find_map(|(key, block)| match block {
            Block::Node(node) if node.name == name => Some(NodeRef::from_key(key)),
            Block::Shape(shape) if shape.node.name == name => Some(NodeRef::from_key(key)),
            _ => None,
        })
    }

    /// First shape block with this name, in insertion order
    pub fn find_shape(&self, name: &str) -> Option<ShapeRef> {
        self.blocks_in_order().find_map(|(key, block)| match block {
            Block::Shape(shape) if shape.node.name == name => Some(ShapeRef::from_key(key)),
            _ => None,
        })
    }

    /// Every pure node block, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.blocks_in_order().filter_map(|(key, block)| {
            matches!(block, Block::Node(_)).then(|| NodeRef::from_key(key))
        })
    }

    /// Every shape block, in insertion order
    pub fn shapes(&self) -> impl Iterator<Item = ShapeRef> + '_ {
        self.blocks_in_order().filter_map(|(key, block)| {
            matches!(block, Block::Shape(_)).then(|| ShapeRef::from_key(key))
        })
    }

    /// Names of all node blocks, newline-joined in insertion order
    pub fn node_names(&self) -> String {
        let names: Vec<&str> = self
            .blocks_in_order()
            .filter_map(|(_, block)| match block {
                Block::Node(node) => Some(node.name.as_str()),
                _ => None,
            })
            .collect();
        names.join("\n")
    }

    /// Names of all shape blocks, newline-joined in insertion order
    pub fn shape_names(&self) -> String {
        let names: Vec<&str> = self
            .blocks_in_order()
            .filter_map(|(_, block)| match block {
                Block::Shape(shape) => Some(shape.node.name.as_str()),
                _ => None,
            })
            .collect();
        names.join("\n")
    }

    // ----- buffer queries ------------------------------------------------
    //
    // Each query copies as much as fits, starting at `start`, and answers
    // with the total element count regardless of how much was copied.
    // Callers size a second buffer from the answer.

    pub fn vertices_into(
        &self,
        shape: ShapeRef,
        buffer: &mut [Vec3],
        start: usize,
    ) -> Result<usize, DocumentError> {
        Ok(copy_window(&self.shape(shape)?.geometry.vertices, buffer, start))
    }

    pub fn normals_into(
        &self,
        shape: ShapeRef,
        buffer: &mut [Vec3],
        start: usize,
    ) -> Result<usize, DocumentError> {
        let Some(normals) = &self.shape(shape)?.geometry.normals else {
            return Ok(0);
        };
        Ok(copy_window(normals, buffer, start))
    }

    pub fn uvs_into(
        &self,
        shape: ShapeRef,
        buffer: &mut [[f32; 2]],
        start: usize,
    ) -> Result<usize, DocumentError> {
        let Some(uvs) = &self.shape(shape)?.geometry.uvs else {
            return Ok(0);
        };
        Ok(copy_window(uvs, buffer, start))
    }

    pub fn colors_into(
        &self,
        shape: ShapeRef,
        buffer: &mut [[f32; 4]],
        start: usize,
    ) -> Result<usize, DocumentError> {
        let Some(colors) = &self.shape(shape)?.geometry.colors else {
            return Ok(0);
        };
        Ok(copy_window(colors, buffer, start))
    }

    pub fn triangles_into(
        &self,
        shape: ShapeRef,
        buffer: &mut [Triangle],
        start: usize,
    ) -> Result<usize, DocumentError> {
        Ok(copy_window(&self.shape(shape)?.geometry.triangles, buffer, start))
    }

    /// Raw handles of every shape block, in insertion order
    pub fn shape_refs_into(&self, buffer: &mut [u64], start: usize) -> usize {
        let handles: Vec<u64> = self.shapes().map(|shape| shape.to_raw()).collect();
        copy_window(&handles, buffer, start)
    }

    /// Raw handles of a node's extra-data list, in list order
    pub fn extra_refs_into(
        &self,
        node: Option<NodeRef>,
        buffer: &mut [u64],
        start: usize,
    ) -> Result<usize, DocumentError> {
        let target = node.unwrap_or(self.root);
        let handles: Vec<u64> = self
            .node(target)?
            .extra_data
            .iter()
            .map(|extra| extra.to_raw())
            .collect();
        Ok(copy_window(&handles, buffer, start))
    }

    // ----- persistence ---------------------------------------------------

    pub fn to_ron_string(&self) -> Result<String, DocumentError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, DocumentError> {
        Ok(ron::from_str(text)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let text = self.to_ron_string()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }
}

/// Copy `source[start..]` into `buffer` as far as it fits; answer the
/// total length of `source`
fn copy_window<T: Copy>(source: &[T], buffer: &mut [T], start: usize) -> usize {
    let available = source.len().saturating_sub(start);
    let count = available.min(buffer.len());
    buffer[..count].copy_from_slice(&source[start..start + count]);
    source.len()
}
