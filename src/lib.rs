//! A CPU scanline triangle rasterizer.
//!
//! Colored triangles are projected from 3D with a simple perspective divide,
//! then filled row by row into an ARGB8888 pixel buffer with a per-pixel
//! integer depth test. SDL2 is used only to put finished frames on screen.
//!
//! # Quick Start
//!
//! ```ignore
//! use scanraster::prelude::*;
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! engine.add_object(Object::cube(10.0, &mut rng));
//! engine.draw(&mut PngSink::new("frames")?)?;
//! ```

pub mod camera;
pub mod colors;
pub mod engine;
pub mod math;
pub mod projection;
pub mod render;
pub mod scene;
pub mod window;

pub use camera::Camera;
pub use colors::Color;
pub use engine::{Engine, EngineConfig, FrameStats, RenderMode};
pub use projection::{DistortionCorrection, Projection};
pub use scene::{LoadError, Object};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::colors::Color;
    pub use crate::engine::{Engine, EngineConfig, FrameStats, RenderMode};
    pub use crate::math::mat3::RotationMatrix;
    pub use crate::math::vec3::Vec3;
    pub use crate::projection::{DistortionCorrection, Projection};
    pub use crate::render::{FrameSink, PngSink, ScanlineRasterizer, ScreenVertex, Triangle};
    pub use crate::scene::Object;
    pub use crate::window::{FrameTimer, InputState, Window, WindowEvent};
}
