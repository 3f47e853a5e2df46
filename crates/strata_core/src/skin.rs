//! Skin instance blocks and bone-weight reads
//!
//! A skin instance binds a shape to the bone nodes that deform it. Bones
//! are held in influence order; the binding list is index-aligned with the
//! bone list, which [`SkinInstance::validate`] enforces before an instance
//! may enter a document. Higher-level staging and committing of skins is
//! built on top of these blocks elsewhere; this module is the stored form.

use serde::{Serialize, Deserialize};
use strata_math::Transform;

use crate::block::{Block, BlockRef, NodeRef, ShapeRef, SkinRef};
use crate::document::Document;
use crate::error::DocumentError;

/// One vertex influence: vertex index plus weight
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexWeight {
    pub vertex: u16,
    pub weight: f32,
}

impl VertexWeight {
    pub fn new(vertex: u16, weight: f32) -> Self {
        Self { vertex, weight }
    }
}

/// Per-bone data inside a skin instance
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneBinding {
    /// Takes skin-space points into this bone's space
    pub skin_to_bone: Transform,
    pub weights: Vec<VertexWeight>,
}

impl BoneBinding {
    pub fn new(skin_to_bone: Transform, weights: Vec<VertexWeight>) -> Self {
        Self {
            skin_to_bone,
            weights,
        }
    }
}

/// Block binding a shape to its deforming bones
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinInstance {
    /// From the shape's global space into skin space
    pub global_to_skin: Transform,
    /// Bone nodes in influence order
    pub bones: Vec<NodeRef>,
    /// Index-aligned with `bones`
    pub bindings: Vec<BoneBinding>,
}

impl SkinInstance {
    pub fn new(global_to_skin: Transform) -> Self {
        Self {
            global_to_skin,
            bones: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Check that every bone has exactly one binding
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.bones.len() != self.bindings.len() {
            return Err(DocumentError::Structural(format!(
                "skin lists {} bones but {} bindings",
                self.bones.len(),
                self.bindings.len()
            )));
        }
        Ok(())
    }
}

impl Document {
    /// Install a skin instance on a shape.
    ///
    /// The instance is validated first. If the shape already has a skin the
    /// block is replaced in place and the existing reference stays valid;
    /// otherwise a new block is allocated.
    pub fn set_skin_instance(
        &mut self,
        shape: ShapeRef,
        skin: SkinInstance,
    ) -> Result<SkinRef, DocumentError> {
        skin.validate()?;
        if let Some(existing) = self.shape(shape)?.skin {
            *self.skin_instance_mut(existing)? = skin;
            return Ok(existing);
        }
        let skin_ref = SkinRef::from_key(self.insert(Block::SkinInstance(skin)));
        self.shape_mut(shape)?.skin = Some(skin_ref);
        Ok(skin_ref)
    }

    /// The skin instance on a shape, if any
    pub fn shape_skin(&self, shape: ShapeRef) -> Result<Option<&SkinInstance>, DocumentError> {
        match self.shape(shape)?.skin {
            Some(skin_ref) => Ok(Some(self.skin_instance(skin_ref)?)),
            None => Ok(None),
        }
    }

    /// Number of bones deforming a shape, zero when unskinned
    pub fn bone_count(&self, shape: ShapeRef) -> Result<usize, DocumentError> {
        Ok(self
            .shape_skin(shape)?
            .map_or(0, |skin| skin.bones.len()))
    }

    /// Names of a shape's bones, newline-joined in influence order.
    ///
    /// Bone references that no longer resolve are skipped.
    pub fn bone_names(&self, shape: ShapeRef) -> Result<String, DocumentError> {
        let Some(skin) = self.shape_skin(shape)? else {
            return Ok(String::new());
        };
        let names: Vec<&str> = skin
            .bones
            .iter()
            .filter_map(|&bone| self.node(bone).ok())
            .map(|node| node.name.as_str())
            .collect();
        Ok(names.join("\n"))
    }

    /// Influence-order index of a named bone in a shape's skin
    pub fn bone_index(&self, shape: ShapeRef, bone: &str) -> Result<Option<usize>, DocumentError> {
        let Some(skin) = self.shape_skin(shape)? else {
            return Ok(None);
        };
        for (index, &bone_ref) in skin.bones.iter().enumerate() {
            if let Ok(node) = self.node(bone_ref) {
                if node.name == bone {
                    return Ok(Some(index));
                }
            }
        }
        Ok(None)
    }

    /// The weights a named bone applies to a shape's vertices
    pub fn bone_weights(
        &self,
        shape: ShapeRef,
        bone: &str,
    ) -> Result<Option<&[VertexWeight]>, DocumentError> {
        let Some(index) = self.bone_index(shape, bone)? else {
            return Ok(None);
        };
        let skin = self.shape_skin(shape)?;
        Ok(skin.map(|skin| skin.bindings[index].weights.as_slice()))
    }

    /// The skin-to-bone transform recorded for a named bone
    pub fn skin_to_bone(
        &self,
        shape: ShapeRef,
        bone: &str,
    ) -> Result<Option<Transform>, DocumentError> {
        let Some(index) = self.bone_index(shape, bone)? else {
            return Ok(None);
        };
        let skin = self.shape_skin(shape)?;
        Ok(skin.map(|skin| skin.bindings[index].skin_to_bone))
    }

    /// The shape's global-to-skin transform.
    ///
    /// An unskinned shape answers with the inverse of its node's global
    /// transform, which is the transform a skin committed in place would
    /// record.
    pub fn global_to_skin(&self, shape: ShapeRef) -> Result<Transform, DocumentError> {
        if let Some(skin) = self.shape_skin(shape)? {
            return Ok(skin.global_to_skin);
        }
        Ok(self.global_transform(shape.as_node())?.inverse())
    }

    /// Overwrite the recorded global-to-skin transform.
    ///
    /// The shape must already be skinned; there is nowhere to record the
    /// value otherwise.
    pub fn set_global_to_skin(
        &mut self,
        shape: ShapeRef,
        transform: Transform,
    ) -> Result<(), DocumentError> {
        let Some(skin_ref) = self.shape(shape)?.skin else {
            return Err(DocumentError::Structural(format!(
                "'{}' has no skin instance to record a global-to-skin transform on",
                self.shape(shape)?.name()
            )));
        };
        self.skin_instance_mut(skin_ref)?.global_to_skin = transform;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_math::{Mat3, Vec3};

    use crate::shape::{Geometry, Triangle};
    use crate::version::EngineTarget;

    fn quad() -> Geometry {
        Geometry::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)],
        )
    }

    fn skinned_quad(doc: &mut Document) -> ShapeRef {
        let shape = doc
            .add_shape("Quad", Transform::identity(), quad(), None)
            .unwrap();
        let spine = doc
            .add_node("Spine", Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)), None)
            .unwrap();
        let arm = doc
            .add_node("Arm", Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)), None)
            .unwrap();
        let mut skin = SkinInstance::new(Transform::identity());
        skin.bones = vec![spine, arm];
        skin.bindings = vec![
            BoneBinding::new(
                Transform::from_translation(Vec3::new(0.0, -1.0, 0.0)),
                vec![VertexWeight::new(0, 1.0), VertexWeight::new(1, 0.5)],
            ),
            BoneBinding::new(
                Transform::from_translation(Vec3::new(-1.0, 0.0, 0.0)),
                vec![VertexWeight::new(1, 0.5)],
            ),
        ];
        doc.set_skin_instance(shape, skin).unwrap();
        shape
    }

    #[test]
    fn test_validate_requires_alignment() {
        let mut skin = SkinInstance::default();
        skin.bindings.push(BoneBinding::default());
        let err = skin.validate().unwrap_err();
        assert!(matches!(err, DocumentError::Structural(_)));
    }

    #[test]
    fn test_bone_names_join_in_influence_order() {
        let mut doc = Document::new(EngineTarget::V130);
        let shape = skinned_quad(&mut doc);
        assert_eq!(doc.bone_count(shape).unwrap(), 2);
        assert_eq!(doc.bone_names(shape).unwrap(), "Spine\nArm");
        assert_eq!(doc.bone_index(shape, "Arm").unwrap(), Some(1));
        assert_eq!(doc.bone_index(shape, "Leg").unwrap(), None);
    }

    #[test]
    fn test_bone_weights_lookup() {
        let mut doc = Document::new(EngineTarget::V130);
        let shape = skinned_quad(&mut doc);
        let weights = doc.bone_weights(shape, "Spine").unwrap().unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].vertex, 0);
        assert_eq!(weights[0].weight, 1.0);
        assert!(doc.bone_weights(shape, "Leg").unwrap().is_none());
    }

    #[test]
    fn test_skin_to_bone_lookup() {
        let mut doc = Document::new(EngineTarget::V130);
        let shape = skinned_quad(&mut doc);
        let to_bone = doc.skin_to_bone(shape, "Arm").unwrap().unwrap();
        assert_eq!(to_bone.translation, Vec3::new(-1.0, 0.0, 0.0));
        assert!(doc.skin_to_bone(shape, "Leg").unwrap().is_none());
    }

    #[test]
    fn test_global_to_skin_defaults_to_inverse_global() {
        let mut doc = Document::new(EngineTarget::V130);
        let local = Transform {
            rotation: Mat3::rotation_z(std::f32::consts::FRAC_PI_2),
            translation: Vec3::new(3.0, -2.0, 5.0),
            scale: 2.0,
        };
        let shape = doc.add_shape("Loose", local, quad(), None).unwrap();

        let fallback = doc.global_to_skin(shape).unwrap();
        let expected = doc.global_transform(shape.as_node()).unwrap().inverse();
        assert!(
            fallback.approx_eq(&expected, 0.0001),
            "Expected {:?}, got {:?}",
            expected,
            fallback
        );
    }

    #[test]
    fn test_set_global_to_skin_requires_skin() {
        let mut doc = Document::new(EngineTarget::V130);
        let shape = doc
            .add_shape("Loose", Transform::identity(), quad(), None)
            .unwrap();
        let err = doc
            .set_global_to_skin(shape, Transform::identity())
            .unwrap_err();
        assert!(matches!(err, DocumentError::Structural(_)));

        let skinned = skinned_quad(&mut doc);
        let wanted = Transform::from_translation(Vec3::new(0.0, 0.0, -120.0));
        doc.set_global_to_skin(skinned, wanted).unwrap();
        let read = doc.global_to_skin(skinned).unwrap();
        assert_eq!(read.translation, wanted.translation);
    }
}
