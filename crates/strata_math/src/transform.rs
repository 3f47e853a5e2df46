//! Rigid transform type
//!
//! The transform layout every block in a document uses: a 3x3 rotation, a
//! translation and a single uniform scale. Node-to-parent transforms, bone
//! bind poses and all skin transforms share this representation.

use serde::{Serialize, Deserialize};

use crate::{Mat3, Vec3};

/// Rotation + translation + uniform scale.
///
/// Points are transformed scale-first: `rotation * (p * scale) + translation`.
/// The rotation part is expected to stay orthonormal and the scale nonzero;
/// `inverse` relies on both.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: Mat3,
    pub translation: Vec3,
    pub scale: f32,
}

impl Transform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            rotation: Mat3::IDENTITY,
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Pure translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Pure rotation
    pub fn from_rotation(rotation: Mat3) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// Apply to a point: scale, then rotate, then translate
    #[inline]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.rotate(p * self.scale) + self.translation
    }

    /// Compose two transforms: the result applies `other` first, then `self`.
    ///
    /// A node's global transform is `parent_global.compose(&local)`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation.mul(&other.rotation),
            translation: self.transform_point(other.translation),
            scale: self.scale * other.scale,
        }
    }

    /// Invert the transform.
    ///
    /// Valid only while the rotation is orthonormal and the scale nonzero;
    /// a zero scale produces non-finite components rather than panicking.
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.transpose();
        let inv_scale = 1.0 / self.scale;
        Self {
            rotation: inv_rotation,
            translation: inv_rotation.rotate(-self.translation) * inv_scale,
            scale: inv_scale,
        }
    }

    /// Component-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rotation.approx_eq(&other.rotation, epsilon)
            && (self.translation - other.translation).length() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_is_default() {
        let t = Transform::default();
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.transform_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_transform_point_order() {
        // Scale first, then rotate, then translate
        let t = Transform {
            rotation: Mat3::rotation_z(std::f32::consts::FRAC_PI_2),
            translation: Vec3::new(10.0, 0.0, 0.0),
            scale: 2.0,
        };
        let p = t.transform_point(Vec3::X);
        assert!(
            vec_approx_eq(p, Vec3::new(10.0, 2.0, 0.0)),
            "Expected (10, 2, 0), got {:?}",
            p
        );
    }

    #[test]
    fn test_compose_matches_sequential_application() {
        let a = Transform {
            rotation: Mat3::rotation_y(0.4),
            translation: Vec3::new(1.0, 2.0, 3.0),
            scale: 1.5,
        };
        let b = Transform {
            rotation: Mat3::rotation_x(-0.9),
            translation: Vec3::new(-2.0, 0.5, 0.0),
            scale: 0.5,
        };
        let p = Vec3::new(0.7, -1.3, 2.2);

        let composed = a.compose(&b);
        let sequential = a.transform_point(b.transform_point(p));
        assert!(
            vec_approx_eq(composed.transform_point(p), sequential),
            "Composed {:?} vs sequential {:?}",
            composed.transform_point(p),
            sequential
        );
    }

    #[test]
    fn test_inverse_round_trip() {
        let t = Transform {
            rotation: Mat3::rotation_z(1.1),
            translation: Vec3::new(4.0, -1.0, 2.0),
            scale: 3.0,
        };
        let p = Vec3::new(-0.5, 6.0, 1.0);
        let round_trip = t.inverse().transform_point(t.transform_point(p));
        assert!(vec_approx_eq(round_trip, p), "Expected {:?}, got {:?}", p, round_trip);
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let t = Transform {
            rotation: Mat3::rotation_x(0.6),
            translation: Vec3::new(1.0, 1.0, 1.0),
            scale: 0.25,
        };
        let ident = t.compose(&t.inverse());
        assert!(ident.approx_eq(&Transform::identity(), EPSILON));
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = Transform::identity();
        let mut b = Transform::identity();
        b.translation.x = EPSILON / 2.0;
        assert!(a.approx_eq(&b, EPSILON));
        b.translation.x = 1.0;
        assert!(!a.approx_eq(&b, EPSILON));
    }
}
