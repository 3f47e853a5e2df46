//! Extra-data blocks hung off nodes
//!
//! Every node carries an ordered list of extra-data blocks. The list is
//! heterogeneous; retrieval is by kind plus a positional index counted
//! among entries of that kind only, so "the second text entry" stays the
//! second text entry no matter what else is interleaved.

use std::fmt;

use serde::{Serialize, Deserialize};
use strata_math::Vec3;

use crate::block::{Block, BlockRef, ExtraRef, NodeRef};
use crate::document::Document;
use crate::error::DocumentError;

/// One sit/lean/sleep position on a furniture marker
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FurniturePosition {
    pub offset: Vec3,
    pub heading: f32,
    pub animation_type: u16,
    pub entry_points: u16,
}

/// The closed set of extra-data payloads
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ExtraData {
    Text {
        name: String,
        value: String,
    },
    ClothBinary {
        name: String,
        data: Vec<u8>,
    },
    BehaviorGraph {
        name: String,
        file: String,
        controls_base_skeleton: bool,
    },
    InventoryMarker {
        name: String,
        /// Euler rotation in raw marker units, not radians
        rotation: [u16; 3],
        zoom: f32,
    },
    FurnitureMarker {
        name: String,
        positions: Vec<FurniturePosition>,
    },
    Flags {
        name: String,
        value: u32,
    },
}

/// Discriminant of [`ExtraData`], used for positional lookups
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtraDataKind {
    Text,
    ClothBinary,
    BehaviorGraph,
    InventoryMarker,
    FurnitureMarker,
    Flags,
}

impl fmt::Display for ExtraDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtraDataKind::Text => "text",
            ExtraDataKind::ClothBinary => "cloth binary",
            ExtraDataKind::BehaviorGraph => "behavior graph",
            ExtraDataKind::InventoryMarker => "inventory marker",
            ExtraDataKind::FurnitureMarker => "furniture marker",
            ExtraDataKind::Flags => "flags",
        };
        write!(f, "{}", label)
    }
}

impl ExtraData {
    /// Text payload
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        ExtraData::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Integer flag-word payload
    pub fn flags(name: impl Into<String>, value: u32) -> Self {
        ExtraData::Flags {
            name: name.into(),
            value,
        }
    }

    pub fn kind(&self) -> ExtraDataKind {
        match self {
            ExtraData::Text { .. } => ExtraDataKind::Text,
            ExtraData::ClothBinary { .. } => ExtraDataKind::ClothBinary,
            ExtraData::BehaviorGraph { .. } => ExtraDataKind::BehaviorGraph,
            ExtraData::InventoryMarker { .. } => ExtraDataKind::InventoryMarker,
            ExtraData::FurnitureMarker { .. } => ExtraDataKind::FurnitureMarker,
            ExtraData::Flags { .. } => ExtraDataKind::Flags,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ExtraData::Text { name, .. }
            | ExtraData::ClothBinary { name, .. }
            | ExtraData::BehaviorGraph { name, .. }
            | ExtraData::InventoryMarker { name, .. }
            | ExtraData::FurnitureMarker { name, .. }
            | ExtraData::Flags { name, .. } => name,
        }
    }
}

impl Document {
    /// Append an extra-data block to a node's list.
    ///
    /// `None` targets the scene root. Order of appends is the order later
    /// positional lookups see.
    pub fn append_extra_data(
        &mut self,
        node: Option<NodeRef>,
        data: ExtraData,
    ) -> Result<ExtraRef, DocumentError> {
        let target = node.unwrap_or_else(|| self.root());
        self.node(target)?;
        let extra_ref = ExtraRef::from_key(self.insert(Block::ExtraData(data)));
        self.node_mut(target)?.extra_data.push(extra_ref);
        Ok(extra_ref)
    }

    /// References in a node's extra-data list, in list order
    pub fn extra_data_refs(&self, node: Option<NodeRef>) -> Result<&[ExtraRef], DocumentError> {
        let target = node.unwrap_or_else(|| self.root());
        Ok(&self.node(target)?.extra_data)
    }

    /// Number of entries in a node's extra-data list, dangling refs included
    pub fn extra_data_count(&self, node: Option<NodeRef>) -> Result<usize, DocumentError> {
        let target = node.unwrap_or_else(|| self.root());
        Ok(self.node(target)?.extra_data.len())
    }

    /// The `index`-th entry of the given kind on a node, counting only
    /// entries of that kind.
    ///
    /// Dangling references are skipped, not errors; a missing entry answers
    /// `None`.
    pub fn extra_data_by_kind(
        &self,
        node: Option<NodeRef>,
        kind: ExtraDataKind,
        index: usize,
    ) -> Result<Option<&ExtraData>, DocumentError> {
        let target = node.unwrap_or_else(|| self.root());
        let mut seen = 0;
        for &extra_ref in &self.node(target)?.extra_data {
            let Ok(data) = self.extra_data(extra_ref) else {
                continue;
            };
            if data.kind() == kind {
                if seen == index {
                    return Ok(Some(data));
                }
                seen += 1;
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::version::EngineTarget;

    #[test]
    fn test_kind_and_name() {
        let data = ExtraData::flags("BSX", 0x0b);
        assert_eq!(data.kind(), ExtraDataKind::Flags);
        assert_eq!(data.name(), "BSX");
        assert_eq!(
            ExtraData::text("Prn", "WeaponBack").kind(),
            ExtraDataKind::Text
        );
    }

    #[test]
    fn test_positional_lookup_counts_per_kind() {
        let mut doc = Document::new(EngineTarget::V130);
        doc.append_extra_data(None, ExtraData::text("A", "first"))
            .unwrap();
        doc.append_extra_data(None, ExtraData::flags("BSX", 2))
            .unwrap();
        doc.append_extra_data(None, ExtraData::text("B", "second"))
            .unwrap();
        doc.append_extra_data(None, ExtraData::flags("INI", 0))
            .unwrap();
        doc.append_extra_data(None, ExtraData::text("C", "third"))
            .unwrap();

        for (index, expected) in ["A", "B", "C"].iter().enumerate() {
            let data = doc
                .extra_data_by_kind(None, ExtraDataKind::Text, index)
                .unwrap()
                .unwrap_or_else(|| panic!("no text entry at {}", index));
            assert_eq!(data.name(), *expected);
        }
        let bsx = doc
            .extra_data_by_kind(None, ExtraDataKind::Flags, 0)
            .unwrap()
            .unwrap();
        assert_eq!(bsx.name(), "BSX");
        assert!(doc
            .extra_data_by_kind(None, ExtraDataKind::Text, 3)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_append_targets_root_by_default() {
        let mut doc = Document::new(EngineTarget::V100);
        doc.append_extra_data(None, ExtraData::text("Prn", "Bip01"))
            .unwrap();
        assert_eq!(doc.extra_data_count(None).unwrap(), 1);
        let root = doc.root();
        assert_eq!(doc.extra_data_count(Some(root)).unwrap(), 1);
    }

    #[test]
    fn test_dangling_refs_are_skipped() {
        let mut doc = Document::new(EngineTarget::V130);
        let first = doc
            .append_extra_data(None, ExtraData::text("A", "first"))
            .unwrap();
        doc.append_extra_data(None, ExtraData::text("B", "second"))
            .unwrap();
        doc.remove(first);

        let data = doc
            .extra_data_by_kind(None, ExtraDataKind::Text, 0)
            .unwrap()
            .expect("surviving entry should be found at position 0");
        assert_eq!(data.name(), "B");
        // The list itself still holds the dangling slot
        assert_eq!(doc.extra_data_count(None).unwrap(), 2);
    }
}
