//! Camera state consumed by the projection stage.

use crate::math::mat3::RotationMatrix;
use crate::math::vec3::Vec3;

/// A camera with a world position and Euler rotation (radians).
///
/// The rotation is applied to camera-relative vectors as
/// `RotationMatrix::calculate(rotation)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Camera {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = self.rotation + delta;
        self
    }

    /// The matrix that turns camera-relative vectors into camera space.
    pub fn rotation_matrix(&self) -> RotationMatrix {
        RotationMatrix::calculate(self.rotation)
    }
}
