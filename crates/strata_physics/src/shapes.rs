//! Collision shape parameter blocks
//!
//! One parameter struct per shape variant. Each is copied in and out of a
//! document wholesale; composite variants (list, wrapped transform) keep
//! their child links in the document graph, not here.

use serde::{Serialize, Deserialize};
use strata_math::{mat4, Mat4, Vec3, Vec4};

use crate::ShapeMaterial;

/// Convex shell thickness applied by the engine around box/capsule/hull
/// geometry when nothing else is authored.
pub const DEFAULT_CONVEX_RADIUS: f32 = 0.1;

/// Axis-aligned box given by half extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub material: ShapeMaterial,
    pub radius: f32,
    /// Half extent along each axis
    pub dimensions: Vec3,
}

impl BoxParams {
    pub fn new(material: ShapeMaterial, radius: f32, dimensions: Vec3) -> Self {
        Self {
            material,
            radius,
            dimensions,
        }
    }
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            material: ShapeMaterial::NONE,
            radius: DEFAULT_CONVEX_RADIUS,
            dimensions: Vec3::ONE,
        }
    }
}

/// Capsule between two end points, each with its own radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapsuleParams {
    pub material: ShapeMaterial,
    pub radius: f32,
    pub point_a: Vec3,
    pub radius_a: f32,
    pub point_b: Vec3,
    pub radius_b: f32,
}

impl CapsuleParams {
    pub fn new(material: ShapeMaterial, point_a: Vec3, point_b: Vec3, radius: f32) -> Self {
        Self {
            material,
            radius,
            point_a,
            radius_a: radius,
            point_b,
            radius_b: radius,
        }
    }

    /// Distance between the two end points
    pub fn length(&self) -> f32 {
        (self.point_b - self.point_a).length()
    }
}

impl Default for CapsuleParams {
    fn default() -> Self {
        Self::new(
            ShapeMaterial::NONE,
            Vec3::ZERO,
            Vec3::Y,
            DEFAULT_CONVEX_RADIUS,
        )
    }
}

/// Convex hull as a point cloud plus bounding planes.
///
/// Hull points keep `w` at zero; plane normals store the plane offset in
/// `w`. The two lists are independent in length.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvexHullParams {
    pub material: ShapeMaterial,
    pub radius: f32,
    pub vertices: Vec<Vec4>,
    pub normals: Vec<Vec4>,
}

impl ConvexHullParams {
    pub fn new(material: ShapeMaterial, radius: f32) -> Self {
        Self {
            material,
            radius,
            vertices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Build the vertex list from plain points
    pub fn with_points(mut self, points: &[Vec3]) -> Self {
        self.vertices = points.iter().map(|p| Vec4::from_vec3(*p, 0.0)).collect();
        self
    }
}

/// Parameters of a shape that wraps one child shape in an extra 4x4
/// transform. The child link lives in the document graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    pub material: ShapeMaterial,
    pub radius: f32,
    pub transform: Mat4,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            material: ShapeMaterial::NONE,
            radius: DEFAULT_CONVEX_RADIUS,
            transform: mat4::IDENTITY,
        }
    }
}

/// Parameters of a shape that aggregates an ordered list of children.
/// The child links live in the document graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    pub material: ShapeMaterial,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_defaults() {
        let b = BoxParams::default();
        assert_eq!(b.radius, DEFAULT_CONVEX_RADIUS);
        assert_eq!(b.dimensions, Vec3::ONE);
    }

    #[test]
    fn test_box_new() {
        let b = BoxParams::new(ShapeMaterial::new(3), 0.1, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.material.id(), 3);
        assert_eq!(b.dimensions.z, 3.0);
    }

    #[test]
    fn test_capsule_length() {
        let c = CapsuleParams::new(
            ShapeMaterial::NONE,
            Vec3::ZERO,
            Vec3::new(0.0, 3.0, 4.0),
            0.5,
        );
        assert_eq!(c.length(), 5.0);
        assert_eq!(c.radius_a, 0.5);
        assert_eq!(c.radius_b, 0.5);
    }

    #[test]
    fn test_hull_with_points_pads_w() {
        let hull = ConvexHullParams::new(ShapeMaterial::new(1), 0.05)
            .with_points(&[Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(hull.vertices.len(), 3);
        assert!(hull.vertices.iter().all(|v| v.w == 0.0));
        assert!(hull.normals.is_empty());
    }

    #[test]
    fn test_transform_defaults_to_identity() {
        let t = TransformParams::default();
        assert_eq!(t.transform, mat4::IDENTITY);
    }
}
