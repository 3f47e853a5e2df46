//! 3×3 rotation matrix type

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use crate::Vec3;

/// Row-major 3×3 matrix.
///
/// Node and bone rotations are stored as plain rotation matrices. The
/// inverse of a proper rotation is its transpose; anything that composes
/// or inverts transforms relies on the rotation part staying orthonormal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Build from row arrays
    #[inline]
    pub const fn new(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Build from three row vectors
    #[inline]
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self::new([r0.to_array(), r1.to_array(), r2.to_array()])
    }

    /// Rotation about the X axis by `angle` radians
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Rotation about the Y axis by `angle` radians
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Rotation about the Z axis by `angle` radians
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Row `i` as a vector
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::from(self.rows[i])
    }

    /// Column `i` as a vector
    #[inline]
    pub fn column(&self, i: usize) -> Vec3 {
        Vec3::new(self.rows[0][i], self.rows[1][i], self.rows[2][i])
    }

    /// Transpose; for a proper rotation this is also the inverse
    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in self.rows.iter().enumerate() {
            for (c, v) in row.iter().enumerate() {
                out[c][r] = *v;
            }
        }
        Self::new(out)
    }

    /// Apply the rotation to a vector
    #[inline]
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }

    /// Matrix product; `self` is applied after `other` when rotating
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = self.row(r).dot(other.column(c));
            }
        }
        Self::new(out)
    }

    pub fn determinant(&self) -> f32 {
        self.row(0).dot(self.row(1).cross(self.row(2)))
    }

    /// True when the matrix is orthonormal with determinant +1, within `epsilon`
    pub fn is_rotation(&self, epsilon: f32) -> bool {
        let should_be_identity = self.mul(&self.transpose());
        should_be_identity.approx_eq(&Self::IDENTITY, epsilon)
            && (self.determinant() - 1.0).abs() <= epsilon
    }

    /// Component-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Mat3 {
    type Output = Self;
    #[inline]
    fn mul(self, other: Self) -> Self {
        Mat3::mul(&self, &other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_identity_rotate() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::IDENTITY.rotate(v), v);
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let rot = Mat3::rotation_z(std::f32::consts::FRAC_PI_2);
        let v = rot.rotate(Vec3::X);
        assert!(v.x.abs() < EPSILON, "Expected x near 0, got {:?}", v);
        assert!((v.y - 1.0).abs() < EPSILON, "Expected y near 1, got {:?}", v);
    }

    #[test]
    fn test_transpose_inverts_rotation() {
        let rot = Mat3::rotation_y(0.7);
        let round_trip = rot.transpose().rotate(rot.rotate(Vec3::new(1.0, 2.0, 3.0)));
        assert!((round_trip.x - 1.0).abs() < EPSILON);
        assert!((round_trip.y - 2.0).abs() < EPSILON);
        assert!((round_trip.z - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_mul_composes_in_order() {
        // self * other applies other first
        let a = Mat3::rotation_z(std::f32::consts::FRAC_PI_2);
        let b = Mat3::rotation_z(std::f32::consts::FRAC_PI_2);
        let half_turn = a.mul(&b);
        let v = half_turn.rotate(Vec3::X);
        assert!((v.x + 1.0).abs() < EPSILON, "Expected -X, got {:?}", v);
        assert!(v.y.abs() < EPSILON, "Expected -X, got {:?}", v);
    }

    #[test]
    fn test_determinant_of_rotation() {
        let rot = Mat3::rotation_x(1.3);
        assert!((rot.determinant() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_is_rotation() {
        assert!(Mat3::rotation_y(2.1).is_rotation(EPSILON));
        let sheared = Mat3::new([[1.0, 0.5, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(!sheared.is_rotation(EPSILON));
        // Mirrors have determinant -1
        let mirror = Mat3::new([[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(!mirror.is_rotation(EPSILON));
    }

    #[test]
    fn test_row_column() {
        let m = Mat3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m.row(1), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(m.column(2), Vec3::new(3.0, 6.0, 9.0));
    }
}
