//! Scene node type

use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use strata_math::Transform;

use crate::block::{ExtraRef, NodeRef, ObjectRef};

bitflags! {
    /// Behavior flag word stored on every node
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        /// Node and its subtree are not drawn
        const HIDDEN = 1 << 0;
        /// Engine updates this node selectively rather than every frame
        const SELECTIVE_UPDATE = 1 << 1;
        /// Selective update includes the transform
        const SELECTIVE_TRANSFORMS = 1 << 2;
        /// Selective update includes attached controllers
        const SELECTIVE_CONTROLLER = 1 << 3;
        /// The flag word newly created nodes carry
        const DEFAULT = Self::SELECTIVE_UPDATE.bits()
            | Self::SELECTIVE_TRANSFORMS.bits()
            | Self::SELECTIVE_CONTROLLER.bits();
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        NodeFlags::DEFAULT
    }
}

// Flag words travel as raw bits; unknown bits from newer writers are kept.
impl Serialize for NodeFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NodeFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(NodeFlags::from_bits_retain(u32::deserialize(deserializer)?))
    }
}

/// A node in the scene hierarchy.
///
/// Carries a name, a flag word, the local transform to its parent, at most
/// one collision link and an ordered list of extra-data links. Shapes embed
/// a `Node` and add geometry on top.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub flags: NodeFlags,
    /// Transform to the parent's space; the root's is its global transform
    pub transform: Transform,
    pub parent: Option<NodeRef>,
    /// At most one collision object; re-attaching replaces the link
    pub collision: Option<ObjectRef>,
    /// Ordered, heterogeneous metadata entries
    pub extra_data: Vec<ExtraRef>,
}

impl Node {
    /// Create a named node with an identity transform and no parent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: NodeFlags::default(),
            transform: Transform::identity(),
            parent: None,
            collision: None,
            extra_data: Vec::new(),
        }
    }

    /// Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the parent reference
    pub fn with_parent(mut self, parent: NodeRef) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the flag word
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.contains(NodeFlags::HIDDEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_math::Vec3;

    #[test]
    fn test_new_node_defaults() {
        let node = Node::new("Pelvis");
        assert_eq!(node.name, "Pelvis");
        assert_eq!(node.flags, NodeFlags::DEFAULT);
        assert!(node.parent.is_none());
        assert!(node.collision.is_none());
        assert!(node.extra_data.is_empty());
        assert_eq!(node.transform, Transform::identity());
    }

    #[test]
    fn test_default_flags_value() {
        // Selective update bits, hidden clear
        assert_eq!(NodeFlags::DEFAULT.bits(), 14);
        assert!(!Node::new("x").is_hidden());
    }

    #[test]
    fn test_builders() {
        let node = Node::new("Offset")
            .with_transform(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)))
            .with_flags(NodeFlags::HIDDEN | NodeFlags::SELECTIVE_UPDATE);
        assert_eq!(node.transform.translation.y, 1.0);
        assert!(node.is_hidden());
    }

    #[test]
    fn test_flags_serde_round_trip_keeps_unknown_bits() {
        let flags = NodeFlags::from_bits_retain(0x8000_000E);
        let text = ron::to_string(&flags).unwrap();
        let back: NodeFlags = ron::from_str(&text).unwrap();
        assert_eq!(back.bits(), 0x8000_000E);
    }
}
