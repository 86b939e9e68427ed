//! 3x3 rotation matrix.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `RotationMatrix * Vec3`
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! Euler rotations are composed as `Rz * Ry * Rx`, so a vector is rotated
//! about X first, then Y, then Z. Projection output depends on this order
//! bit-for-bit.

use std::ops::Mul;

use super::vec3::Vec3;

/// 3x3 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    data: [[f32; 3]; 3],
}

impl RotationMatrix {
    pub const IDENTITY: Self = Self {
        data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn new(data: [[f32; 3]; 3]) -> Self {
        Self { data }
    }

    /// Rotation about the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Rotation about the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Rotation about the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Builds a rotation from Euler angles in radians.
    ///
    /// `rotation.x`, `rotation.y` and `rotation.z` are the angles about the
    /// respective axes. The result is `Rz * Ry * Rx`.
    pub fn calculate(rotation: Vec3) -> Self {
        Self::rotation_z(rotation.z) * Self::rotation_y(rotation.y) * Self::rotation_x(rotation.x)
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<RotationMatrix> for RotationMatrix {
    type Output = RotationMatrix;

    fn mul(self, rhs: RotationMatrix) -> Self::Output {
        let a = &self.data;
        let b = &rhs.data;
        let mut data = [[0.0; 3]; 3];
        for (row, out) in data.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = a[row][0] * b[0][col] + a[row][1] * b[1][col] + a[row][2] * b[2][col];
            }
        }
        RotationMatrix { data }
    }
}

impl Mul<Vec3> for RotationMatrix {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let m = &self.data;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}
