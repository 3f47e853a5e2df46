//! Shape blocks: scene nodes carrying renderable geometry

use serde::{Serialize, Deserialize};
use strata_math::{Transform, Vec3};

use crate::block::{ShaderRef, SkinRef};
use crate::error::DocumentError;
use crate::node::Node;
use crate::segmentation::{Partition, Segmentation};

/// One triangle as three vertex ordinals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle(pub [u16; 3]);

impl Triangle {
    #[inline]
    pub const fn new(a: u16, b: u16, c: u16) -> Self {
        Self([a, b, c])
    }

    #[inline]
    pub fn indices(self) -> [u16; 3] {
        self.0
    }

    /// Largest vertex ordinal the triangle touches
    #[inline]
    pub fn max_index(self) -> u16 {
        self.0[0].max(self.0[1]).max(self.0[2])
    }
}

/// Vertex and triangle arrays of one shape.
///
/// All per-vertex arrays are indexed by vertex ordinal and must match the
/// vertex count when present; triangles index into the vertex array.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub vertices: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub colors: Option<Vec<[f32; 4]>>,
    pub triangles: Vec<Triangle>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<Triangle>) -> Self {
        Self {
            vertices,
            normals: None,
            uvs: None,
            colors: None,
            triangles,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_colors(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check the parallel-array and index invariants.
    ///
    /// Every optional per-vertex array must match the vertex count, every
    /// triangle must stay inside the vertex array, and the vertex count
    /// must fit the 16-bit ordinals triangles are stored with.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let vertex_count = self.vertices.len();
        if vertex_count > u16::MAX as usize + 1 {
            return Err(DocumentError::Structural(format!(
                "{} vertices exceed 16-bit triangle indexing",
                vertex_count
            )));
        }
        for (label, len) in [
            ("normal", self.normals.as_ref().map(Vec::len)),
            ("UV", self.uvs.as_ref().map(Vec::len)),
            ("color", self.colors.as_ref().map(Vec::len)),
        ] {
            if let Some(len) = len {
                if len != vertex_count {
                    return Err(DocumentError::Structural(format!(
                        "{} {} entries for {} vertices",
                        len, label, vertex_count
                    )));
                }
            }
        }
        for (i, tri) in self.triangles.iter().enumerate() {
            if tri.max_index() as usize >= vertex_count {
                return Err(DocumentError::Structural(format!(
                    "triangle {} references vertex {} of {}",
                    i,
                    tri.max_index(),
                    vertex_count
                )));
            }
        }
        Ok(())
    }
}

/// Alpha blending setup of a shape.
///
/// The low bit of `flags` selects blending; bit 9 selects testing against
/// `threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaBlend {
    pub flags: u16,
    pub threshold: u8,
}

impl AlphaBlend {
    pub fn blend_enabled(&self) -> bool {
        self.flags & 1 != 0
    }

    pub fn test_enabled(&self) -> bool {
        self.flags & (1 << 9) != 0
    }
}

impl Default for AlphaBlend {
    fn default() -> Self {
        // Blend on, source-alpha/inverse-source-alpha, test at 128
        Self {
            flags: 4844,
            threshold: 128,
        }
    }
}

/// A scene node with geometry attached.
///
/// Shader, alpha, skin, segmentation and partition all hang off the shape;
/// the embedded node supplies name, flags, transform and hierarchy links.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shape {
    pub node: Node,
    pub geometry: Geometry,
    pub shader: Option<ShaderRef>,
    pub alpha: Option<AlphaBlend>,
    pub skin: Option<SkinRef>,
    pub segmentation: Option<Segmentation>,
    pub partition: Option<Partition>,
}

impl Shape {
    /// Create a named shape; the geometry should already be validated
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            node: Node::new(name),
            geometry,
            shader: None,
            alpha: None,
            skin: None,
            segmentation: None,
            partition: None,
        }
    }

    /// Set the local transform of the embedded node
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.node.transform = transform;
        self
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn is_skinned(&self) -> bool {
        self.skin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_quad_is_valid() {
        let geometry = quad();
        assert!(geometry.validate().is_ok());
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.triangle_count(), 2);
    }

    #[test]
    fn test_validate_rejects_out_of_range_triangle() {
        let mut geometry = quad();
        geometry.triangles.push(Triangle::new(0, 1, 9));
        let err = geometry.validate().unwrap_err();
        assert!(matches!(err, DocumentError::Structural(_)));
        assert!(err.to_string().contains("triangle 2"));
    }

    #[test]
    fn test_validate_rejects_short_normals() {
        let geometry = quad().with_normals(vec![Vec3::Z; 3]);
        let err = geometry.validate().unwrap_err();
        assert!(err.to_string().contains("normal"));
    }

    #[test]
    fn test_validate_accepts_matching_arrays() {
        let geometry = quad()
            .with_normals(vec![Vec3::Z; 4])
            .with_uvs(vec![[0.0, 0.0]; 4])
            .with_colors(vec![[1.0, 1.0, 1.0, 1.0]; 4]);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_alpha_defaults() {
        let alpha = AlphaBlend::default();
        assert!(alpha.blend_enabled());
        assert_eq!(alpha.threshold, 128);
    }

    #[test]
    fn test_alpha_test_bit() {
        let alpha = AlphaBlend {
            flags: 1 << 9,
            threshold: 64,
        };
        assert!(!alpha.blend_enabled());
        assert!(alpha.test_enabled());
    }

    #[test]
    fn test_shape_wraps_node() {
        let shape = Shape::new("Body", quad());
        assert_eq!(shape.name(), "Body");
        assert!(!shape.is_skinned());
        assert!(shape.shader.is_none());
    }

    #[test]
    fn test_triangle_max_index() {
        assert_eq!(Triangle::new(3, 9, 4).max_index(), 9);
    }
}
