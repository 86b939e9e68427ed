//! Screen-space triangle rasterization.
//!
//! [`ScanlineRasterizer`] owns the frame's pixel and depth buffers and fills
//! [`Triangle`]s produced by the projection stage.

mod scanline;

pub use scanline::ScanlineRasterizer;

use crate::colors::Color;

/// A projected vertex: integer screen position, relative depth, and color.
///
/// `depth` only orders vertices against each other (lower is closer); it is
/// not a distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenVertex {
    pub x: i32,
    pub y: i32,
    pub depth: i32,
    pub color: Color,
}

impl ScreenVertex {
    pub const fn new(x: i32, y: i32, depth: i32, color: Color) -> Self {
        Self { x, y, depth, color }
    }
}

/// A triangle ready for rasterization in screen space.
///
/// Vertices may be in any order; the rasterizer sorts them by y.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub vertices: [ScreenVertex; 3],
}

impl Triangle {
    pub const fn new(a: ScreenVertex, b: ScreenVertex, c: ScreenVertex) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// A triangle with one color and one depth at every vertex.
    pub const fn uniform(points: [(i32, i32); 3], depth: i32, color: Color) -> Self {
        Self::new(
            ScreenVertex::new(points[0].0, points[0].1, depth, color),
            ScreenVertex::new(points[1].0, points[1].1, depth, color),
            ScreenVertex::new(points[2].0, points[2].1, depth, color),
        )
    }
}
