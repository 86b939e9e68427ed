//! Perspective projection from camera space to screen space.
//!
//! A vertex is first moved into camera space (object position plus vertex
//! offset minus camera position, rotated by the camera). Its unit direction
//! is then divided by `1 + z`:
//!
//! ```text
//! screen_x = fov_scalar *  unit.x / (1 + unit.z)        + width  / 2
//! screen_y = fov_scalar * -unit.y / (1 + corrected_z)   + height / 2
//! ```
//!
//! `corrected_z` comes from a [`DistortionCorrection`]. The recorded depth is
//! the camera-space z truncated to an integer, used only for ordering.

use crate::camera::Camera;
use crate::colors::Color;
use crate::math::mat3::RotationMatrix;
use crate::math::vec3::Vec3;
use crate::render::{ScreenVertex, Triangle};

/// Scale applied to unit directions before centering on screen.
pub const DEFAULT_FOV_SCALAR: f32 = 3000.0;

/// Adjusts the z used in the vertical perspective divide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistortionCorrection {
    /// `unit.z * |cos(unit.x)|`. An empirical lens-like tweak that bows
    /// horizontal lines slightly toward the edges of the screen.
    #[default]
    CosineX,
    /// Use `unit.z` unchanged.
    None,
}

impl DistortionCorrection {
    /// The z to use in the vertical divide for a unit direction.
    #[inline]
    pub fn corrected_z(self, unit: Vec3) -> f32 {
        match self {
            DistortionCorrection::CosineX => unit.z * unit.x.cos().abs(),
            DistortionCorrection::None => unit.z,
        }
    }
}

impl std::fmt::Display for DistortionCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistortionCorrection::CosineX => write!(f, "cos(x)"),
            DistortionCorrection::None => write!(f, "none"),
        }
    }
}

/// Perspective projection parameters for a fixed viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    fov_scalar: f32,
    width: u32,
    height: u32,
    distortion: DistortionCorrection,
}

impl Projection {
    /// A projection for a `width` x `height` viewport with default field of
    /// view and distortion correction.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov_scalar: DEFAULT_FOV_SCALAR,
            width,
            height,
            distortion: DistortionCorrection::default(),
        }
    }

    pub fn with_fov_scalar(mut self, fov_scalar: f32) -> Self {
        self.fov_scalar = fov_scalar;
        self
    }

    pub fn with_distortion(mut self, distortion: DistortionCorrection) -> Self {
        self.distortion = distortion;
        self
    }

    pub fn fov_scalar(&self) -> f32 {
        self.fov_scalar
    }

    pub fn distortion(&self) -> DistortionCorrection {
        self.distortion
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Moves a world-space point into camera space.
    #[inline]
    pub fn to_camera_space(rotation: &RotationMatrix, camera_position: Vec3, world: Vec3) -> Vec3 {
        *rotation * (world - camera_position)
    }

    /// Projects a camera-space point to the screen.
    ///
    /// A point exactly at the camera has no direction; its unit vector is NaN
    /// and the saturating float-to-int casts place it at `(0, 0)`.
    pub fn project_point(&self, camera_space: Vec3, color: Color) -> ScreenVertex {
        let unit = camera_space.unit();
        let corrected_z = self.distortion.corrected_z(unit);
        let half_width = (self.width / 2) as f32;
        let half_height = (self.height / 2) as f32;

        let x = self.fov_scalar * unit.x / (1.0 + unit.z) + half_width;
        let y = self.fov_scalar * -unit.y / (1.0 + corrected_z) + half_height;

        ScreenVertex {
            x: x as i32,
            y: y as i32,
            depth: camera_space.z as i32,
            color,
        }
    }

    /// Projects one triangle of an object.
    ///
    /// `vertices` are offsets from `object_position` with their colors.
    /// Returns `None` when no vertex lies in front of the camera
    /// (camera-space z > 0). Visible triangles are returned whole, even if
    /// parts fall outside the viewport.
    pub fn project_triangle(
        &self,
        camera: &Camera,
        rotation: &RotationMatrix,
        object_position: Vec3,
        vertices: [(Vec3, Color); 3],
    ) -> Option<Triangle> {
        let camera_space =
            vertices.map(|(offset, _)| Self::to_camera_space(rotation, camera.position, object_position + offset));

        if !camera_space.iter().any(|v| v.z > 0.0) {
            return None;
        }

        let [a, b, c] = [0, 1, 2].map(|i| self.project_point(camera_space[i], vertices[i].1));
        Some(Triangle::new(a, b, c))
    }
}
