//! Reference skeletons and their RON file form
//!
//! A skeleton names the bones a target engine expects and records each
//! bone's bind-pose transform in global space. Bones are listed parents
//! first, so a bone's parent index always points earlier in the list;
//! construction checks that along with name uniqueness, which lets every
//! later lookup stay infallible.

use std::collections::HashMap;
use std::path::Path;

use serde::{Serialize, Deserialize};
use strata_core::EngineTarget;
use strata_math::Transform;

use crate::error::SkinError;

/// One bone: name, parent index and global bind transform
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Parent bone, which must appear earlier in the list
    pub parent: Option<usize>,
    /// Bind-pose transform in global space
    pub bind: Transform,
}

impl Bone {
    pub fn root(name: impl Into<String>, bind: Transform) -> Self {
        Self {
            name: name.into(),
            parent: None,
            bind,
        }
    }

    pub fn child(name: impl Into<String>, parent: usize, bind: Transform) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
            bind,
        }
    }
}

// On-disk form; the name index is rebuilt on load
#[derive(Serialize, Deserialize)]
struct SkeletonFile {
    target: EngineTarget,
    root: String,
    bones: Vec<Bone>,
}

/// A reference skeleton for one engine target
#[derive(Clone, Debug)]
pub struct Skeleton {
    target: EngineTarget,
    root: String,
    bones: Vec<Bone>,
    by_name: HashMap<String, usize>,
}

impl Skeleton {
    /// Build a skeleton, checking bone order, name uniqueness and that the
    /// named root bone exists
    pub fn new(
        target: EngineTarget,
        root: impl Into<String>,
        bones: Vec<Bone>,
    ) -> Result<Self, SkinError> {
        if bones.is_empty() {
            return Err(SkinError::Structural("skeleton has no bones".to_string()));
        }
        let mut by_name = HashMap::with_capacity(bones.len());
        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= index {
                    return Err(SkinError::Structural(format!(
                        "bone '{}' lists a parent at or after itself",
                        bone.name
                    )));
                }
            }
            if by_name.insert(bone.name.clone(), index).is_some() {
                return Err(SkinError::Structural(format!(
                    "duplicate bone name '{}'",
                    bone.name
                )));
            }
        }
        let root = root.into();
        if !by_name.contains_key(&root) {
            return Err(SkinError::Structural(format!(
                "root bone '{}' is not in the bone list",
                root
            )));
        }
        Ok(Self {
            target,
            root,
            bones,
            by_name,
        })
    }

    pub fn from_ron_str(text: &str) -> Result<Self, SkinError> {
        let file: SkeletonFile = ron::from_str(text)?;
        Self::new(file.target, file.root, file.bones)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SkinError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, SkinError> {
        let file = SkeletonFile {
            target: self.target,
            root: self.root.clone(),
            bones: self.bones.clone(),
        };
        Ok(ron::ser::to_string_pretty(
            &file,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn target(&self) -> EngineTarget {
        self.target
    }

    pub fn root_name(&self) -> &str {
        &self.root
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.index_of(name).map(|index| &self.bones[index])
    }

    pub fn bone_at(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// A named bone's global bind transform
    pub fn global_bind(&self, name: &str) -> Option<Transform> {
        self.bone(name).map(|bone| bone.bind)
    }

    /// A bone's bind transform relative to its parent.
    ///
    /// Parentless bones answer their global bind unchanged.
    pub fn local_bind(&self, index: usize) -> Option<Transform> {
        let bone = self.bones.get(index)?;
        Some(match bone.parent {
            Some(parent) => self.bones[parent].bind.inverse().compose(&bone.bind),
            None => bone.bind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_math::Vec3;

    const EPSILON: f32 = 0.0001;

    fn spine_arm() -> Skeleton {
        Skeleton::new(
            EngineTarget::V130,
            "Root",
            vec![
                Bone::root("Root", Transform::identity()),
                Bone::child(
                    "Spine",
                    0,
                    Transform::from_translation(Vec3::new(0.0, 0.0, 60.0)),
                ),
                Bone::child(
                    "Arm",
                    1,
                    Transform::from_translation(Vec3::new(20.0, 0.0, 55.0)),
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_by_name_and_index() {
        let skeleton = spine_arm();
        assert_eq!(skeleton.bone_count(), 3);
        assert!(skeleton.contains("Arm"));
        assert_eq!(skeleton.index_of("Spine"), Some(1));
        assert!(skeleton.bone("Wing").is_none());
        assert_eq!(skeleton.root_name(), "Root");
    }

    #[test]
    fn test_rejects_parent_after_child() {
        let err = Skeleton::new(
            EngineTarget::V130,
            "A",
            vec![
                Bone::child("A", 1, Transform::identity()),
                Bone::root("B", Transform::identity()),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SkinError::Structural(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Skeleton::new(
            EngineTarget::V130,
            "A",
            vec![
                Bone::root("A", Transform::identity()),
                Bone::child("A", 0, Transform::identity()),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"), "got: {}", err);
    }

    #[test]
    fn test_rejects_missing_root() {
        let err = Skeleton::new(
            EngineTarget::V130,
            "Pelvis",
            vec![Bone::root("Root", Transform::identity())],
        )
        .unwrap_err();
        assert!(matches!(err, SkinError::Structural(_)));
    }

    #[test]
    fn test_local_bind_recovers_global() {
        let skeleton = spine_arm();
        let spine_global = skeleton.global_bind("Spine").unwrap();
        let arm_local = skeleton.local_bind(2).unwrap();
        let recovered = spine_global.compose(&arm_local);
        let expected = skeleton.global_bind("Arm").unwrap();
        assert!(
            recovered.approx_eq(&expected, EPSILON),
            "Expected {:?}, got {:?}",
            expected,
            recovered
        );
    }

    #[test]
    fn test_ron_round_trip_preserves_order() {
        let skeleton = spine_arm();
        let text = skeleton.to_ron_string().unwrap();
        let back = Skeleton::from_ron_str(&text).unwrap();
        assert_eq!(back.target(), EngineTarget::V130);
        assert_eq!(back.bone_count(), 3);
        assert_eq!(back.index_of("Arm"), Some(2));
        assert_eq!(
            back.bone("Spine").unwrap().bind.translation,
            Vec3::new(0.0, 0.0, 60.0)
        );
    }
}
