//! Mesh segmentation and dismemberment partitions
//!
//! Two triangle-grouping schemes ride along with a shape. Segmentation is
//! two-level (segments holding subsegments) and maps each triangle to a
//! declared id; partitions are a flat slot list mapped by position. Both
//! installs are all-or-nothing: validation runs before the document is
//! touched, and a failed install leaves whatever was there before.

use std::collections::HashSet;

use bitflags::bitflags;
use serde::{Serialize, Deserialize};

use crate::block::ShapeRef;
use crate::document::Document;
use crate::error::DocumentError;

/// One subsegment: its id, the user-facing slot it fills and a material id
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsegment {
    pub id: u32,
    pub user_slot: u32,
    pub material: u32,
}

impl Subsegment {
    pub fn new(id: u32, user_slot: u32, material: u32) -> Self {
        Self {
            id,
            user_slot,
            material,
        }
    }
}

/// One top-level segment and its ordered subsegments
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub subsegments: Vec<Subsegment>,
}

impl Segment {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            subsegments: Vec::new(),
        }
    }

    pub fn with_subsegment(mut self, subsegment: Subsegment) -> Self {
        self.subsegments.push(subsegment);
        self
    }
}

/// Two-level triangle grouping paired with a per-triangle id map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub segments: Vec<Segment>,
    /// Declared segment or subsegment id per shape triangle
    pub triangle_map: Vec<u32>,
    /// Sidecar file the target runtime reads slot mappings from
    pub mapping_file: Option<String>,
}

impl Segmentation {
    /// Every id a triangle may legally map to: segment ids and subsegment ids
    pub fn declared_ids(&self) -> HashSet<u32> {
        let mut ids = HashSet::new();
        for segment in &self.segments {
            ids.insert(segment.id);
            for subsegment in &segment.subsegments {
                ids.insert(subsegment.id);
            }
        }
        ids
    }

    /// Check the triangle map against the declared ids and the shape's
    /// triangle count
    pub fn validate(&self, triangle_count: usize) -> Result<(), DocumentError> {
        if self.triangle_map.len() != triangle_count {
            return Err(DocumentError::Structural(format!(
                "triangle map covers {} triangles, shape has {}",
                self.triangle_map.len(),
                triangle_count
            )));
        }
        let declared = self.declared_ids();
        for (tri, id) in self.triangle_map.iter().enumerate() {
            if !declared.contains(id) {
                return Err(DocumentError::Structural(format!(
                    "triangle {} maps to undeclared segment id {}",
                    tri, id
                )));
            }
        }
        Ok(())
    }
}

bitflags! {
    /// Flags on one dismemberment slot
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PartitionFlags: u16 {
        /// Slot is shown by editing tools
        const EDITOR_VISIBLE = 1 << 0;
        /// Slot begins a new bone set
        const START_BONE_SET = 1 << 8;
    }
}

impl Serialize for PartitionFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PartitionFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(PartitionFlags::from_bits_retain(u16::deserialize(
            deserializer,
        )?))
    }
}

/// One dismemberment slot: flags plus the body-part id it carves out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSlot {
    pub flags: PartitionFlags,
    pub body_part: u16,
}

impl PartitionSlot {
    pub fn new(flags: PartitionFlags, body_part: u16) -> Self {
        Self { flags, body_part }
    }
}

/// Flat triangle grouping paired with a per-triangle slot index map.
///
/// The map is positional: each entry indexes into `slots`, it does not name
/// an id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub slots: Vec<PartitionSlot>,
    pub triangle_map: Vec<u16>,
}

impl Partition {
    /// Check the triangle map against the slot list and the shape's
    /// triangle count
    pub fn validate(&self, triangle_count: usize) -> Result<(), DocumentError> {
        if self.triangle_map.len() != triangle_count {
            return Err(DocumentError::Structural(format!(
                "triangle map covers {} triangles, shape has {}",
                self.triangle_map.len(),
                triangle_count
            )));
        }
        for (tri, index) in self.triangle_map.iter().enumerate() {
            if *index as usize >= self.slots.len() {
                return Err(DocumentError::Structural(format!(
                    "triangle {} maps to partition index {} of {}",
                    tri,
                    index,
                    self.slots.len()
                )));
            }
        }
        Ok(())
    }
}

impl Document {
    /// Install a segmentation on a shape.
    ///
    /// Validation runs first; on failure the shape's existing segmentation
    /// (if any) is left untouched and the rejection is recorded in the
    /// attached message log.
    pub fn set_segmentation(
        &mut self,
        shape: ShapeRef,
        segmentation: Segmentation,
    ) -> Result<(), DocumentError> {
        let triangle_count = self.shape(shape)?.geometry.triangle_count();
        if let Err(err) = segmentation.validate(triangle_count) {
            self.report(format!(
                "segmentation rejected for '{}': {}",
                self.shape(shape)?.name(),
                err
            ));
            return Err(err);
        }
        self.shape_mut(shape)?.segmentation = Some(segmentation);
        Ok(())
    }

    /// The segmentation installed on a shape, if any
    pub fn segmentation(&self, shape: ShapeRef) -> Result<Option<&Segmentation>, DocumentError> {
        Ok(self.shape(shape)?.segmentation.as_ref())
    }

    /// Install a dismemberment partition on a shape.
    ///
    /// The shape must already carry a committed skin instance: partitions
    /// depend on which bones deform which triangles, so they are built only
    /// after bone weights are in the document. Validation is all-or-nothing
    /// like [`Document::set_segmentation`].
    pub fn set_partition(
        &mut self,
        shape: ShapeRef,
        partition: Partition,
    ) -> Result<(), DocumentError> {
        let (triangle_count, skinned) = {
            let shape = self.shape(shape)?;
            (shape.geometry.triangle_count(), shape.is_skinned())
        };
        if !skinned {
            let err = DocumentError::Structural(format!(
                "'{}' has no skin instance; assign bone weights before partitioning",
                self.shape(shape)?.name()
            ));
            self.report(err.to_string());
            return Err(err);
        }
        if let Err(err) = partition.validate(triangle_count) {
            self.report(format!(
                "partition rejected for '{}': {}",
                self.shape(shape)?.name(),
                err
            ));
            return Err(err);
        }
        self.shape_mut(shape)?.partition = Some(partition);
        Ok(())
    }

    /// The partition installed on a shape, if any
    pub fn partition(&self, shape: ShapeRef) -> Result<Option<&Partition>, DocumentError> {
        Ok(self.shape(shape)?.partition.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_segment_setup() -> Segmentation {
        Segmentation {
            segments: vec![
                Segment::new(1)
                    .with_subsegment(Subsegment::new(10, 30, 0))
                    .with_subsegment(Subsegment::new(11, 32, 0)),
                Segment::new(2),
            ],
            triangle_map: vec![10, 11, 2, 10],
            mapping_file: Some("body.ssf".to_string()),
        }
    }

    #[test]
    fn test_declared_ids_cover_both_levels() {
        let ids = two_segment_setup().declared_ids();
        for id in [1, 2, 10, 11] {
            assert!(ids.contains(&id), "missing id {}", id);
        }
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_validate_accepts_declared_ids() {
        assert!(two_segment_setup().validate(4).is_ok());
    }

    #[test]
    fn test_validate_rejects_undeclared_id() {
        let mut seg = two_segment_setup();
        seg.triangle_map[2] = 99;
        let err = seg.validate(4).unwrap_err();
        assert!(matches!(err, DocumentError::Structural(_)));
        assert!(err.to_string().contains("id 99"), "got: {}", err);
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let err = two_segment_setup().validate(7).unwrap_err();
        assert!(err.to_string().contains("covers 4"), "got: {}", err);
    }

    #[test]
    fn test_partition_validate_positional() {
        let partition = Partition {
            slots: vec![
                PartitionSlot::new(PartitionFlags::EDITOR_VISIBLE, 32),
                PartitionSlot::new(PartitionFlags::EDITOR_VISIBLE, 34),
            ],
            triangle_map: vec![0, 1, 1, 0],
        };
        assert!(partition.validate(4).is_ok());

        let mut bad = partition;
        bad.triangle_map[1] = 2;
        let err = bad.validate(4).unwrap_err();
        assert!(err.to_string().contains("index 2 of 2"), "got: {}", err);
    }

    #[test]
    fn test_partition_flags_serde_bits() {
        let flags = PartitionFlags::EDITOR_VISIBLE | PartitionFlags::START_BONE_SET;
        let text = ron::to_string(&flags).unwrap();
        let back: PartitionFlags = ron::from_str(&text).unwrap();
        assert_eq!(back, flags);
        assert_eq!(back.bits(), 257);
    }
}
