//! Vector and rotation-matrix algebra used by the projection stage.

pub mod mat3;
pub mod vec3;
