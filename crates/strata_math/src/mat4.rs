//! 4x4 matrix utilities
//!
//! Wrapped collision shapes carry a full 4x4 transform rather than the
//! rotation/translation/scale split used by scene nodes, so a small raw
//! matrix toolkit lives here.

use crate::{Transform, Vec3};

/// 4x4 matrix type (row-major, translation in the last column)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Multiply two 4x4 matrices: result = a * b
///
/// Applies `b` first, then `a`, when transforming points.
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for (k, b_row) in b.iter().enumerate() {
                result[i][j] += a[i][k] * b_row[j];
            }
        }
    }

    result
}

/// Transpose a matrix
pub fn transpose(m: Mat4) -> Mat4 {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}

/// Transform a point (w = 1) by an affine 4x4 matrix
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
    )
}

/// Expand a rigid transform into a 4x4 matrix
pub fn from_transform(t: &Transform) -> Mat4 {
    let mut m = IDENTITY;
    for r in 0..3 {
        for c in 0..3 {
            m[r][c] = t.rotation.rows[r][c] * t.scale;
        }
    }
    m[0][3] = t.translation.x;
    m[1][3] = t.translation.y;
    m[2][3] = t.translation.z;
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mat3;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON && (a.z - b.z).abs() < EPSILON
    }

    fn mat_approx_eq(a: Mat4, b: Mat4) -> bool {
        for i in 0..4 {
            for j in 0..4 {
                if (a[i][j] - b[i][j]).abs() >= EPSILON {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_identity_transform_point() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(transform_point(IDENTITY, p), p));
    }

    #[test]
    fn test_mul_identity() {
        let t = from_transform(&Transform {
            rotation: Mat3::rotation_z(0.5),
            translation: Vec3::new(1.0, 0.0, 0.0),
            scale: 1.0,
        });
        assert!(mat_approx_eq(mul(IDENTITY, t), t));
        assert!(mat_approx_eq(mul(t, IDENTITY), t));
    }

    #[test]
    fn test_from_transform_matches_transform_point() {
        let t = Transform {
            rotation: Mat3::rotation_y(0.9),
            translation: Vec3::new(-2.0, 3.0, 0.5),
            scale: 2.0,
        };
        let m = from_transform(&t);
        let p = Vec3::new(0.3, -1.0, 4.0);
        assert!(
            vec_approx_eq(transform_point(m, p), t.transform_point(p)),
            "Matrix and transform disagree: {:?} vs {:?}",
            transform_point(m, p),
            t.transform_point(p)
        );
    }

    #[test]
    fn test_mul_applies_right_first() {
        let shift = from_transform(&Transform::from_translation(Vec3::X));
        let quarter = from_transform(&Transform {
            rotation: Mat3::rotation_z(std::f32::consts::FRAC_PI_2),
            translation: Vec3::ZERO,
            scale: 1.0,
        });
        // Shift then rotate: (1,0,0) -> (2,0,0) -> (0,2,0)
        let m = mul(quarter, shift);
        let result = transform_point(m, Vec3::X);
        assert!(
            vec_approx_eq(result, Vec3::new(0.0, 2.0, 0.0)),
            "Expected (0, 2, 0), got {:?}",
            result
        );
    }

    #[test]
    fn test_transpose() {
        let mut m = IDENTITY;
        m[0][3] = 5.0;
        assert_eq!(transpose(m)[3][0], 5.0);
    }
}
