//! Staged skin edits, committed to a document in one pass
//!
//! A [`SkinBinding`] is the middle state between an unskinned shape and a
//! committed skin instance. Bones and weight tables accumulate on the
//! binding without touching the document; [`SkinBinding::commit`] then
//! validates everything and writes once. A failed commit leaves the
//! document exactly as it was.
//!
//! Weights are taken as given. Nothing here normalizes per-vertex sums or
//! trims influence counts; the commit reports suspicious tables through
//! the document's message log and writes them anyway.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use strata_core::{BoneBinding, Document, NodeRef, ShapeRef, SkinInstance, SkinRef, VertexWeight};
use strata_math::Transform;

use crate::error::SkinError;
use crate::skeleton::Skeleton;

/// Per-vertex weight sums further than this from 1.0 are reported
const WEIGHT_SUM_TOLERANCE: f32 = 0.01;
/// Influences per vertex beyond this are reported
const MAX_INFLUENCES: usize = 4;

#[derive(Clone, Debug)]
struct StagedBone {
    name: String,
    /// Explicit skin-to-bone transform; derived from the skeleton bind
    /// pose when absent
    skin_to_bone: Option<Transform>,
    /// Explicit parent for a bone the skeleton does not know
    parent: Option<String>,
    weights: Vec<VertexWeight>,
}

/// Staged skin for one shape
pub struct SkinBinding {
    shape: ShapeRef,
    skeleton: Arc<Skeleton>,
    global_to_skin: Transform,
    bones: Vec<StagedBone>,
}

impl SkinBinding {
    /// Begin staging against a shape.
    ///
    /// A shape that already carries a skin instance contributes its bones,
    /// transforms and weights as the starting state; an unskinned shape
    /// starts empty with a global-to-skin derived from its node's global
    /// transform.
    pub fn stage(
        doc: &Document,
        shape: ShapeRef,
        skeleton: Arc<Skeleton>,
    ) -> Result<Self, SkinError> {
        let mut binding = Self {
            shape,
            skeleton,
            global_to_skin: doc.global_to_skin(shape)?,
            bones: Vec::new(),
        };
        if let Some(skin) = doc.shape_skin(shape)? {
            for (bone_ref, bound) in skin.bones.iter().zip(&skin.bindings) {
                let name = doc.node(*bone_ref)?.name.clone();
                binding.bones.push(StagedBone {
                    name,
                    skin_to_bone: Some(bound.skin_to_bone),
                    parent: None,
                    weights: bound.weights.clone(),
                });
            }
        }
        Ok(binding)
    }

    pub fn shape(&self) -> ShapeRef {
        self.shape
    }

    pub fn global_to_skin(&self) -> Transform {
        self.global_to_skin
    }

    pub fn set_global_to_skin(&mut self, transform: Transform) {
        self.global_to_skin = transform;
    }

    /// Stage a bone by name.
    ///
    /// Without an explicit transform the bone must be in the reference
    /// skeleton. An explicit parent must be in the document, in the
    /// skeleton, or staged before this bone. Restaging a name updates it
    /// in place, keeping its position and weights.
    pub fn add_bone(
        &mut self,
        name: &str,
        skin_to_bone: Option<Transform>,
        parent: Option<&str>,
    ) -> Result<(), SkinError> {
        if skin_to_bone.is_none() && !self.skeleton.contains(name) {
            return Err(SkinError::UnknownBone(name.to_string()));
        }
        if let Some(existing) = self.bones.iter_mut().find(|bone| bone.name == name) {
            existing.skin_to_bone = skin_to_bone;
            existing.parent = parent.map(str::to_string);
            return Ok(());
        }
        self.bones.push(StagedBone {
            name: name.to_string(),
            skin_to_bone,
            parent: parent.map(str::to_string),
            weights: Vec::new(),
        });
        Ok(())
    }

    /// Replace the weight table for a bone, staging the bone from the
    /// skeleton first if it was not staged yet
    pub fn set_weights(&mut self, bone: &str, weights: Vec<VertexWeight>) -> Result<(), SkinError> {
        if !self.bones.iter().any(|staged| staged.name == bone) {
            self.add_bone(bone, None, None)?;
        }
        if let Some(staged) = self.bones.iter_mut().find(|staged| staged.name == bone) {
            staged.weights = weights;
        }
        Ok(())
    }

    /// The staged weight table for a bone, in the order it was given
    pub fn weights(&self, bone: &str) -> Option<&[VertexWeight]> {
        self.bones
            .iter()
            .find(|staged| staged.name == bone)
            .map(|staged| staged.weights.as_slice())
    }

    pub fn staged_bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bone_names(&self) -> Vec<&str> {
        self.bones.iter().map(|bone| bone.name.as_str()).collect()
    }

    /// Write the staged skin into the document.
    ///
    /// Everything is validated up front; the document is only touched once
    /// the whole commit is known to succeed. Missing bone nodes are
    /// created, skeleton bones bring their ancestor chain with them, and
    /// the shape's skin instance is written last. Re-committing over an
    /// existing skin replaces it behind the same reference.
    pub fn commit(self, doc: &mut Document) -> Result<SkinRef, SkinError> {
        let vertex_count = doc.shape(self.shape)?.geometry.vertex_count();

        // Validation pass, no document writes
        let mut resolved = Vec::with_capacity(self.bones.len());
        let mut earlier: HashSet<&str> = HashSet::new();
        for bone in &self.bones {
            let skin_to_bone = match bone.skin_to_bone {
                Some(explicit) => explicit,
                None => match self.skeleton.global_bind(&bone.name) {
                    Some(bind) => bind.inverse().compose(&self.global_to_skin.inverse()),
                    None => return Err(SkinError::UnknownBone(bone.name.clone())),
                },
            };
            for weight in &bone.weights {
                if weight.vertex as usize >= vertex_count {
                    return Err(SkinError::Structural(format!(
                        "bone '{}' weights vertex {} but the shape has {} vertices",
                        bone.name, weight.vertex, vertex_count
                    )));
                }
            }
            if let Some(parent) = &bone.parent {
                let resolvable = doc.find_node(parent).is_some()
                    || self.skeleton.contains(parent)
                    || earlier.contains(parent.as_str());
                if !resolvable {
                    return Err(SkinError::Structural(format!(
                        "parent '{}' of bone '{}' is neither staged, in the document nor in the skeleton",
                        parent, bone.name
                    )));
                }
            }
            earlier.insert(bone.name.as_str());
            resolved.push(skin_to_bone);
        }
        self.report_weight_advisories(doc, vertex_count)?;

        // Materialize bone nodes, then write the instance
        let mut bone_refs = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            bone_refs.push(self.materialize_bone(doc, bone)?);
        }
        let mut skin = SkinInstance::new(self.global_to_skin);
        for (staged, (node_ref, skin_to_bone)) in
            self.bones.iter().zip(bone_refs.into_iter().zip(resolved))
        {
            skin.bones.push(node_ref);
            skin.bindings
                .push(BoneBinding::new(skin_to_bone, staged.weights.clone()));
        }
        Ok(doc.set_skin_instance(self.shape, skin)?)
    }

    fn report_weight_advisories(
        &self,
        doc: &Document,
        vertex_count: usize,
    ) -> Result<(), SkinError> {
        let mut sums: HashMap<u16, f32> = HashMap::new();
        let mut influences: HashMap<u16, usize> = HashMap::new();
        for bone in &self.bones {
            for weight in &bone.weights {
                *sums.entry(weight.vertex).or_insert(0.0) += weight.weight;
                *influences.entry(weight.vertex).or_insert(0) += 1;
            }
        }
        // Only vertices somebody weighted count; a partially weighted mesh
        // is reported vertex by vertex, not as a blanket failure
        let shape_name = doc.shape(self.shape)?.name().to_string();
        let off_sum = sums
            .values()
            .filter(|&&sum| (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE)
            .count();
        if off_sum > 0 {
            doc.report(format!(
                "weights on {} of {} vertices of '{}' do not sum to 1",
                off_sum, vertex_count, shape_name
            ));
        }
        let over = influences
            .values()
            .filter(|&&count| count > MAX_INFLUENCES)
            .count();
        if over > 0 {
            doc.report(format!(
                "{} vertices of '{}' have more than {} bone influences",
                over, shape_name, MAX_INFLUENCES
            ));
        }
        Ok(())
    }

    fn materialize_bone(&self, doc: &mut Document, bone: &StagedBone) -> Result<NodeRef, SkinError> {
        if let Some(found) = doc.find_node(&bone.name) {
            return Ok(found);
        }
        if let Some(index) = self.skeleton.index_of(&bone.name) {
            return self.materialize_chain(doc, index);
        }
        let parent_ref = match &bone.parent {
            Some(parent) => match doc.find_node(parent) {
                Some(found) => found,
                None => {
                    let index = self
                        .skeleton
                        .index_of(parent)
                        .ok_or_else(|| SkinError::UnknownBone(parent.clone()))?;
                    self.materialize_chain(doc, index)?
                }
            },
            None => doc.root(),
        };
        let Some(skin_to_bone) = bone.skin_to_bone else {
            return Err(SkinError::UnknownBone(bone.name.clone()));
        };
        let bone_global = self
            .global_to_skin
            .inverse()
            .compose(&skin_to_bone.inverse());
        let parent_global = doc.global_transform(parent_ref)?;
        let local = parent_global.inverse().compose(&bone_global);
        Ok(doc.add_node(&bone.name, local, Some(parent_ref))?)
    }

    /// Create a skeleton bone's node, and its missing ancestors above it,
    /// each placed by the skeleton's bind pose
    fn materialize_chain(&self, doc: &mut Document, index: usize) -> Result<NodeRef, SkinError> {
        let bone = self
            .skeleton
            .bone_at(index)
            .ok_or_else(|| SkinError::Structural(format!("skeleton bone {} out of range", index)))?;
        if let Some(found) = doc.find_node(&bone.name) {
            return Ok(found);
        }
        let parent_ref = match bone.parent {
            Some(parent) => self.materialize_chain(doc, parent)?,
            None => doc.root(),
        };
        let local = self
            .skeleton
            .local_bind(index)
            .ok_or_else(|| SkinError::Structural(format!("skeleton bone {} out of range", index)))?;
        Ok(doc.add_node(&bone.name, local, Some(parent_ref))?)
    }
}
