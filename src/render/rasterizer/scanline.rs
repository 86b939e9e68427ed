//! Scanline-based triangle rasterization.
//!
//! Triangles are filled one horizontal scanline at a time using the classic
//! flat-top/flat-bottom decomposition.
//!
//! # Triangle Decomposition
//!
//! ```text
//!        top                  top
//!        /\                   /\
//!       /  \                 /  \
//!      /    \       =>  mid /----\ split   <- flat-bottom half
//!  mid \     \              \     \
//!       \     \              \     \       <- flat-top half
//!        \_____\              \_____\
//!           bottom               bottom
//! ```
//!
//! The split vertex lies on the top->bottom edge at the middle vertex's y.
//! The flat-bottom half covers rows `top.y .. mid.y` and the flat-top half
//! covers rows `mid.y .. bottom.y`, so the halves share no scanline and leave
//! no gap.
//!
//! # Interpolation
//!
//! Color and depth are interpolated twice: along both edges by vertical
//! progress, then across the span by horizontal progress. Every step uses the
//! truncating [`lerp`], never rounding.
//!
//! # Depth Test
//!
//! Lower depth is closer. A fill writes a pixel only if its depth is strictly
//! below the stored one, so the result does not depend on draw order except
//! for exact ties, where the first writer wins.

use super::{ScreenVertex, Triangle};
use crate::colors::{lerp, lerp_color, Color};
use crate::render::framebuffer::{FrameBuffer, FrameBufferError, OVERLAY_DEPTH};
use crate::render::sink::FrameSink;

/// Scanline triangle rasterizer that owns the frame's pixel and depth buffers.
///
/// Buffers are allocated in [`ScanlineRasterizer::new`], live exactly as long
/// as the rasterizer, and are cleared by every [`ScanlineRasterizer::render`].
pub struct ScanlineRasterizer {
    buffer: FrameBuffer,
    color: u32,
}

impl ScanlineRasterizer {
    /// Allocates cleared buffers for a `width` x `height` frame.
    ///
    /// Allocation failure is the only error; without buffers there is
    /// nothing to render into.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameBufferError> {
        Ok(Self {
            buffer: FrameBuffer::new(width, height)?,
            color: Color::WHITE.to_argb(),
        })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Sets the color used by [`draw_line`](Self::draw_line) and
    /// [`triangle`](Self::triangle).
    pub fn set_color(&mut self, color: Color) {
        self.color = color.to_argb();
    }

    /// The current line color, packed ARGB.
    pub fn color(&self) -> u32 {
        self.color
    }

    /// Resets all pixels to 0 and all depth cells to the far sentinel.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Hands the finished frame to `sink`, then clears the buffers.
    ///
    /// The buffers are cleared even if the sink fails.
    pub fn render<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        let result = sink.present(self.buffer.pixels(), self.width(), self.height());
        self.clear();
        result
    }

    /// Draws a line in the current color by parametric stepping.
    ///
    /// Takes `|dx| + |dy|` steps; the start point is drawn and the end point
    /// is not. Lines ignore the depth test and mark their pixels with
    /// [`OVERLAY_DEPTH`] so later fills cannot cover them.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let width = self.width() as i64;
        let height = self.height() as i64;
        let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);

        if x1.max(x2) < 0 || x1.min(x2) >= width || y1.max(y2) < 0 || y1.min(y2) >= height {
            return;
        }

        let delta_x = x2 - x1;
        let delta_y = y2 - y1;
        let total_steps = delta_x.abs() + delta_y.abs();
        let first_step = first_visible_step(x1, delta_x, width, total_steps)
            .max(first_visible_step(y1, delta_y, height, total_steps));

        for i in first_step..total_steps {
            let progress = i as f32 / total_steps as f32;
            let x = x1 + (delta_x as f32 * progress) as i64;
            let y = y1 + (delta_y as f32 * progress) as i64;

            if x < 0 || x >= width || y < 0 || y >= height {
                let leaving = (delta_x < 0 && x < 0)
                    || (delta_x > 0 && x >= width)
                    || (delta_y < 0 && y < 0)
                    || (delta_y > 0 && y >= height);
                if leaving {
                    break;
                }
                continue;
            }

            self.buffer
                .set_pixel(x as i32, y as i32, OVERLAY_DEPTH, self.color);
        }
    }

    /// Draws the three edges of a triangle with [`draw_line`](Self::draw_line).
    pub fn triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.draw_line(x1, y1, x2, y2);
        self.draw_line(x2, y2, x3, y3);
        self.draw_line(x3, y3, x1, y1);
    }

    /// Wireframe of a screen-space triangle, in the current color.
    pub fn triangle_wireframe(&mut self, triangle: &Triangle) {
        let [a, b, c] = triangle.vertices;
        self.triangle(a.x, a.y, b.x, b.y, c.x, c.y);
    }

    /// Fills a triangle with depth testing and per-vertex color interpolation.
    pub fn fill_triangle(&mut self, triangle: &Triangle) {
        let [top, middle, bottom] = sort_by_y(triangle);

        if top.y >= self.height() as i32 || bottom.y < 0 {
            return;
        }

        if top.y == middle.y {
            let (left, right) = if top.x > middle.x {
                (middle, top)
            } else {
                (top, middle)
            };
            self.fill_flat_top(left, right, bottom);
        } else if middle.y == bottom.y {
            let (left, right) = if bottom.x < middle.x {
                (bottom, middle)
            } else {
                (middle, bottom)
            };
            self.fill_flat_bottom(top, left, right);
        } else {
            let split = split_vertex(top, middle, bottom);
            let (left, right) = if middle.x > split.x {
                (split, middle)
            } else {
                (middle, split)
            };
            self.fill_flat_bottom(top, left, right);
            self.fill_flat_top(left, right, bottom);
        }
    }

    /// Fills a triangle whose two lower vertices share a y.
    fn fill_flat_bottom(&mut self, top: ScreenVertex, left: ScreenVertex, right: ScreenVertex) {
        self.fill_flat(top, left, right);
    }

    /// Fills a triangle whose two upper vertices share a y.
    fn fill_flat_top(&mut self, left: ScreenVertex, right: ScreenVertex, bottom: ScreenVertex) {
        self.fill_flat(bottom, left, right);
    }

    /// Sweeps the scanlines between `corner` and the horizontal base
    /// `left`-`right`.
    ///
    /// Rows run from the upper of the two y values up to, but excluding, the
    /// lower one. For a flat-bottom triangle that skips the base row; for a
    /// flat-top triangle it skips the corner row.
    fn fill_flat(&mut self, corner: ScreenVertex, left: ScreenVertex, right: ScreenVertex) {
        let corner_y = corner.y as i64;
        let base_y = left.y as i64;
        let triangle_height = (base_y - corner_y).abs();
        if triangle_height == 0 {
            return;
        }

        let top_y = corner_y.min(base_y);
        let has_flat_top = corner_y > base_y;
        let left_run = left.x as i64 - corner.x as i64;
        let right_run = right.x as i64 - corner.x as i64;

        // Clip the row range to the buffer instead of skipping row by row.
        let first = (-top_y).max(0);
        let last = (self.height() as i64 - top_y).min(triangle_height);

        for i in first..last {
            let y = (top_y + i) as i32;
            // Distance from the corner, in scanlines.
            let j = if has_flat_top { triangle_height - i } else { i };
            let progress = j as f32 / triangle_height as f32;

            let start_x = (corner.x as f32 + edge_offset(triangle_height, left_run, j)) as i64;
            let end_x = (corner.x as f32 + edge_offset(triangle_height, right_run, j)) as i64;

            let left_color = lerp_color(corner.color, left.color, progress);
            let right_color = lerp_color(corner.color, right.color, progress);
            let left_depth = lerp(corner.depth, left.depth, progress);
            let right_depth = lerp(corner.depth, right.depth, progress);

            self.span(
                start_x,
                y,
                end_x.saturating_sub(start_x),
                left_color,
                right_color,
                left_depth,
                right_depth,
            );
        }
    }

    /// Fills the pixels `x1 ..= x1 + length` of row `y`, interpolating color
    /// and depth from the left end to the right end.
    ///
    /// A zero `length` draws nothing. Pixels outside the buffer are skipped,
    /// and each pixel is written only if it passes the depth test.
    #[allow(clippy::too_many_arguments)]
    pub fn rasterize_span(
        &mut self,
        x1: i32,
        y: i32,
        length: i32,
        left_color: Color,
        right_color: Color,
        left_depth: i32,
        right_depth: i32,
    ) {
        self.span(
            x1 as i64,
            y,
            length as i64,
            left_color,
            right_color,
            left_depth,
            right_depth,
        );
    }

    #[allow(clippy::too_many_arguments)]
    #[inline]
    fn span(
        &mut self,
        x1: i64,
        y: i32,
        length: i64,
        left_color: Color,
        right_color: Color,
        left_depth: i32,
        right_depth: i32,
    ) {
        if length == 0 || y < 0 || y >= self.height() as i32 {
            return;
        }

        let first = x1.max(0);
        let last = x1.saturating_add(length).min(self.width() as i64 - 1);

        for x in first..=last {
            let progress = (x - x1) as f32 / length as f32;
            let depth = lerp(left_depth, right_depth, progress);
            let color = lerp_color(left_color, right_color, progress);
            self.buffer
                .set_pixel_with_depth(x as i32, y, depth, color.to_argb());
        }
    }
}

/// Leading steps of a line that cannot reach `[0, limit)` along one axis.
///
/// Only lines that start outside the range and move toward it are skipped
/// ahead. The margin keeps the skip short of any step the float stepping in
/// [`ScanlineRasterizer::draw_line`] could land inside the range.
fn first_visible_step(start: i64, delta: i64, limit: i64, total_steps: i64) -> i64 {
    let distance = if start < 0 && delta > 0 {
        -start
    } else if start >= limit && delta < 0 {
        start - limit + 1
    } else {
        return 0;
    };
    let exact = distance as f64 * total_steps as f64 / delta.abs() as f64;
    let margin = total_steps as f64 * 1e-6 + 2.0;
    (exact - margin).max(0.0) as i64
}

/// Orders the vertices top to bottom by y with three compare-and-swaps on
/// indices. Vertices with equal y keep their input order.
fn sort_by_y(triangle: &Triangle) -> [ScreenVertex; 3] {
    let v = &triangle.vertices;
    let (mut top, mut middle, mut bottom) = (0, 1, 2);

    if v[top].y > v[middle].y {
        std::mem::swap(&mut top, &mut middle);
    }
    if v[middle].y > v[bottom].y {
        std::mem::swap(&mut middle, &mut bottom);
    }
    if v[top].y > v[middle].y {
        std::mem::swap(&mut top, &mut middle);
    }

    [v[top], v[middle], v[bottom]]
}

/// The point on the `top`-`bottom` edge at `middle.y`, with depth and color
/// interpolated along that edge.
///
/// Requires `top.y < middle.y < bottom.y`.
fn split_vertex(top: ScreenVertex, middle: ScreenVertex, bottom: ScreenVertex) -> ScreenVertex {
    let rise = bottom.y as i64 - top.y as i64;
    let middle_rise = middle.y as i64 - top.y as i64;
    let ratio = middle_rise as f32 / rise as f32;
    let offset = edge_offset(rise, bottom.x as i64 - top.x as i64, middle_rise) as i64;

    ScreenVertex {
        x: saturate(top.x as i64 + offset),
        y: middle.y,
        depth: lerp(top.depth, bottom.depth, ratio),
        color: lerp_color(top.color, bottom.color, ratio),
    }
}

/// Horizontal distance travelled along an edge after `dy` scanlines.
///
/// The edge's slope is `rise / run`. A vertical edge (`run == 0`) has
/// infinite slope and never moves horizontally.
#[inline]
fn edge_offset(rise: i64, run: i64, dy: i64) -> f32 {
    if run == 0 {
        return 0.0;
    }
    let slope = rise as f32 / run as f32;
    dy as f32 / slope
}

#[inline]
fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::framebuffer::FAR_DEPTH;
    use crate::render::sink::CaptureSink;

    const WHITE: u32 = 0xFFFF_FFFF;

    fn rasterizer(width: u32, height: u32) -> ScanlineRasterizer {
        ScanlineRasterizer::new(width, height).unwrap()
    }

    fn vertex(x: i32, y: i32, depth: i32, color: Color) -> ScreenVertex {
        ScreenVertex::new(x, y, depth, color)
    }

    fn is_cleared(r: &ScanlineRasterizer, x: i32, y: i32) -> bool {
        r.buffer().get_pixel(x, y) == Some(0) && r.buffer().get_depth(x, y) == Some(FAR_DEPTH)
    }

    fn written(r: &ScanlineRasterizer) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..r.height() as i32 {
            for x in 0..r.width() as i32 {
                if !is_cleared(r, x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    // ---------------------------------------------------------------------
    // Lines
    // ---------------------------------------------------------------------

    #[test]
    fn horizontal_line_excludes_end_point() {
        let mut r = rasterizer(20, 5);
        r.draw_line(0, 0, 10, 0);

        for x in 0..10 {
            assert_eq!(r.buffer().get_pixel(x, 0), Some(WHITE), "x = {}", x);
            assert_eq!(r.buffer().get_depth(x, 0), Some(OVERLAY_DEPTH));
        }
        assert!(is_cleared(&r, 10, 0));
        assert_eq!(written(&r).len(), 10);
    }

    #[test]
    fn line_uses_current_color() {
        let mut r = rasterizer(10, 10);
        r.set_color(Color::RED);
        r.draw_line(0, 3, 0, 8);
        for y in 3..8 {
            assert_eq!(r.buffer().get_pixel(0, y), Some(Color::RED.to_argb()));
        }
        assert!(is_cleared(&r, 0, 8));
    }

    #[test]
    fn diagonal_line_steps_both_axes() {
        let mut r = rasterizer(10, 10);
        r.draw_line(0, 0, 4, 4);
        assert_eq!(written(&r), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn zero_length_line_draws_nothing() {
        let mut r = rasterizer(10, 10);
        r.draw_line(5, 5, 5, 5);
        assert!(written(&r).is_empty());
    }

    #[test]
    fn line_entering_from_outside_is_clipped() {
        let mut r = rasterizer(10, 10);
        r.draw_line(-5, 2, 5, 2);
        let expected: Vec<_> = (0..5).map(|x| (x, 2)).collect();
        assert_eq!(written(&r), expected);
    }

    #[test]
    fn line_leaving_the_viewport_stops() {
        let mut r = rasterizer(10, 10);
        r.draw_line(5, 2, 1_000_000, 2);
        let expected: Vec<_> = (5..10).map(|x| (x, 2)).collect();
        assert_eq!(written(&r), expected);
    }

    #[test]
    fn line_entirely_outside_draws_nothing() {
        let mut r = rasterizer(10, 10);
        r.draw_line(i32::MIN, -3, i32::MIN + 10, -100);
        r.draw_line(20, 0, i32::MAX, 9);
        assert!(written(&r).is_empty());
    }

    #[test]
    fn lines_stay_on_top_of_fills() {
        let mut r = rasterizer(20, 20);
        r.set_color(Color::GREEN);
        r.draw_line(0, 10, 19, 10);
        r.fill_triangle(&Triangle::uniform(
            [(0, 0), (19, 0), (10, 19)],
            i32::MIN + 1,
            Color::RED,
        ));
        assert_eq!(r.buffer().get_pixel(10, 10), Some(Color::GREEN.to_argb()));
        assert_eq!(r.buffer().get_pixel(10, 5), Some(Color::RED.to_argb()));
    }

    #[test]
    fn wireframe_triangle_leaves_interior_empty() {
        let mut r = rasterizer(50, 50);
        r.triangle(10, 10, 40, 10, 25, 40);
        assert_eq!(r.buffer().get_pixel(10, 10), Some(WHITE));
        assert_eq!(r.buffer().get_pixel(40, 10), Some(WHITE));
        assert_eq!(r.buffer().get_pixel(25, 40), Some(WHITE));
        assert!(is_cleared(&r, 25, 20));
    }

    // ---------------------------------------------------------------------
    // Spans
    // ---------------------------------------------------------------------

    #[test]
    fn zero_length_span_is_a_no_op() {
        let mut r = rasterizer(10, 10);
        r.rasterize_span(3, 3, 0, Color::RED, Color::BLUE, 0, 0);
        assert!(written(&r).is_empty());
    }

    #[test]
    fn span_is_inclusive_and_interpolates() {
        let mut r = rasterizer(10, 10);
        r.rasterize_span(2, 3, 4, Color::RED, Color::BLUE, 0, 40);

        let expected: Vec<_> = (2..=6).map(|x| (x, 3)).collect();
        assert_eq!(written(&r), expected);

        assert_eq!(r.buffer().get_pixel(2, 3), Some(Color::RED.to_argb()));
        assert_eq!(r.buffer().get_pixel(6, 3), Some(Color::BLUE.to_argb()));
        assert_eq!(r.buffer().get_depth(4, 3), Some(20));
        assert_eq!(
            r.buffer().get_pixel(4, 3),
            Some(Color::rgb(128, 0, 127).to_argb())
        );
    }

    #[test]
    fn span_is_clipped_horizontally() {
        let mut r = rasterizer(10, 10);
        r.rasterize_span(-5, 0, 20, Color::RED, Color::RED, 1, 1);
        let expected: Vec<_> = (0..10).map(|x| (x, 0)).collect();
        assert_eq!(written(&r), expected);
    }

    #[test]
    fn span_respects_depth_test() {
        let mut r = rasterizer(10, 1);
        r.rasterize_span(0, 0, 9, Color::RED, Color::RED, 50, 50);
        r.rasterize_span(0, 0, 9, Color::BLUE, Color::BLUE, 50, 50);
        assert_eq!(r.buffer().get_pixel(4, 0), Some(Color::RED.to_argb()));
        r.rasterize_span(0, 0, 9, Color::GREEN, Color::GREEN, 49, 49);
        assert_eq!(r.buffer().get_pixel(4, 0), Some(Color::GREEN.to_argb()));
    }

    // ---------------------------------------------------------------------
    // Triangles
    // ---------------------------------------------------------------------

    #[test]
    fn flat_top_white_triangle_scenario() {
        let mut r = rasterizer(100, 100);
        r.fill_triangle(&Triangle::uniform(
            [(10, 10), (50, 10), (30, 50)],
            5,
            Color::WHITE,
        ));

        let pixels = written(&r);
        assert!(!pixels.is_empty());
        for &(x, y) in &pixels {
            assert_eq!(r.buffer().get_pixel(x, y), Some(WHITE));
            assert_eq!(r.buffer().get_depth(x, y), Some(5));
            assert!((10..50).contains(&y), "row {} outside triangle", y);
            let half_width = (50 - y) as f32 / 2.0;
            assert!(((x - 30) as f32).abs() <= half_width + 1.0, "({}, {})", x, y);
        }

        // Top row spans both top vertices inclusively.
        let top_row: Vec<_> = pixels.iter().filter(|p| p.1 == 10).map(|p| p.0).collect();
        assert_eq!(top_row, (10..=50).collect::<Vec<_>>());

        // The apex row itself is not drawn.
        assert!(pixels.iter().all(|p| p.1 != 50));
        assert_eq!(r.buffer().get_pixel(30, 30), Some(WHITE));
        assert!(is_cleared(&r, 5, 5));
        assert!(is_cleared(&r, 10, 40));
        assert!(is_cleared(&r, 30, 60));
    }

    #[test]
    fn uniform_triangle_has_uniform_depth_and_color() {
        let color = Color::rgb(40, 80, 160);
        let mut r = rasterizer(64, 64);
        r.fill_triangle(&Triangle::uniform([(5, 3), (60, 20), (18, 58)], 321, color));

        let pixels = written(&r);
        assert!(pixels.len() > 100);
        for (x, y) in pixels {
            assert_eq!(r.buffer().get_pixel(x, y), Some(color.to_argb()));
            assert_eq!(r.buffer().get_depth(x, y), Some(321));
        }
    }

    #[test]
    fn vertex_order_does_not_change_output() {
        let a = vertex(5, 3, 10, Color::RED);
        let b = vertex(60, 20, 20, Color::GREEN);
        let c = vertex(18, 58, 30, Color::BLUE);

        let mut reference = rasterizer(64, 64);
        reference.fill_triangle(&Triangle::new(a, b, c));

        for order in [[b, c, a], [c, a, b], [a, c, b], [c, b, a], [b, a, c]] {
            let mut r = rasterizer(64, 64);
            r.fill_triangle(&Triangle { vertices: order });
            assert_eq!(r.buffer().pixels(), reference.buffer().pixels());
            assert_eq!(r.buffer().depths(), reference.buffer().depths());
        }
    }

    #[test]
    fn depth_test_is_order_independent() {
        let far = Triangle::uniform([(10, 10), (80, 15), (30, 80)], 100, Color::RED);
        let near = Triangle::uniform([(20, 5), (90, 60), (5, 70)], 10, Color::BLUE);

        let mut far_first = rasterizer(100, 100);
        far_first.fill_triangle(&far);
        far_first.fill_triangle(&near);

        let mut near_first = rasterizer(100, 100);
        near_first.fill_triangle(&near);
        near_first.fill_triangle(&far);

        assert_eq!(far_first.buffer().pixels(), near_first.buffer().pixels());
        assert_eq!(far_first.buffer().depths(), near_first.buffer().depths());

        // A point inside both triangles shows the near one.
        assert_eq!(
            far_first.buffer().get_pixel(35, 35),
            Some(Color::BLUE.to_argb())
        );
        assert_eq!(far_first.buffer().get_depth(35, 35), Some(10));
    }

    #[test]
    fn general_triangle_equals_its_two_halves() {
        let triangle = Triangle::new(
            vertex(20, 5, 7, Color::RED),
            vertex(80, 40, 90, Color::GREEN),
            vertex(35, 90, 400, Color::BLUE),
        );

        let mut whole = rasterizer(100, 100);
        whole.fill_triangle(&triangle);

        let [top, middle, bottom] = sort_by_y(&triangle);
        let split = split_vertex(top, middle, bottom);
        let (left, right) = if middle.x > split.x {
            (split, middle)
        } else {
            (middle, split)
        };

        let mut upper = rasterizer(100, 100);
        upper.fill_triangle(&Triangle::new(top, left, right));
        let mut lower = rasterizer(100, 100);
        lower.fill_triangle(&Triangle::new(left, right, bottom));

        let mut covered = 0;
        for y in 0..100 {
            for x in 0..100 {
                let in_upper = !is_cleared(&upper, x, y);
                let in_lower = !is_cleared(&lower, x, y);
                assert!(!(in_upper && in_lower), "({}, {}) drawn by both halves", x, y);

                let expected = if in_upper {
                    &upper
                } else if in_lower {
                    &lower
                } else {
                    assert!(is_cleared(&whole, x, y), "({}, {}) only in whole", x, y);
                    continue;
                };
                covered += 1;
                assert_eq!(whole.buffer().get_pixel(x, y), expected.buffer().get_pixel(x, y));
                assert_eq!(whole.buffer().get_depth(x, y), expected.buffer().get_depth(x, y));
            }
        }
        assert!(covered > 0);

        // The shared scanline belongs to the lower half only.
        assert!(written(&upper).iter().all(|p| p.1 < middle.y));
        assert!(written(&lower).iter().any(|p| p.1 == middle.y));
    }

    #[test]
    fn colors_interpolate_down_the_edges() {
        let mut r = rasterizer(101, 60);
        r.fill_triangle(&Triangle::new(
            vertex(50, 0, 1, Color::RED),
            vertex(0, 50, 1, Color::GREEN),
            vertex(100, 50, 1, Color::GREEN),
        ));

        let halfway = Color::rgb(128, 127, 0).to_argb();
        let row: Vec<_> = written(&r).into_iter().filter(|p| p.1 == 25).collect();
        assert_eq!(row.first(), Some(&(25, 25)));
        assert_eq!(row.last(), Some(&(75, 25)));
        for (x, y) in row {
            assert_eq!(r.buffer().get_pixel(x, y), Some(halfway));
        }
    }

    #[test]
    fn vertical_edge_keeps_constant_x() {
        let mut r = rasterizer(40, 40);
        r.fill_triangle(&Triangle::uniform([(10, 10), (10, 30), (30, 30)], 1, Color::WHITE));

        for y in 11..30 {
            assert_eq!(r.buffer().get_pixel(10, y), Some(WHITE), "row {}", y);
            assert!(is_cleared(&r, 9, y));
        }
        assert_eq!(r.buffer().get_pixel(20, 20), Some(WHITE));
        assert!(is_cleared(&r, 21, 20));
    }

    #[test]
    fn degenerate_triangles_draw_nothing() {
        let mut r = rasterizer(50, 50);
        r.fill_triangle(&Triangle::uniform([(5, 20), (25, 20), (45, 20)], 1, Color::WHITE));
        r.fill_triangle(&Triangle::uniform([(0, 0), (10, 10), (20, 20)], 1, Color::WHITE));
        r.fill_triangle(&Triangle::uniform([(7, 7), (7, 7), (7, 7)], 1, Color::WHITE));
        assert!(written(&r).is_empty());
    }

    #[test]
    fn triangles_fully_above_or_below_are_rejected() {
        let mut r = rasterizer(50, 50);
        r.fill_triangle(&Triangle::uniform([(0, -30), (40, -10), (20, -1)], 1, Color::WHITE));
        r.fill_triangle(&Triangle::uniform([(0, 50), (40, 60), (20, 90)], 1, Color::WHITE));
        r.fill_triangle(&Triangle::uniform([(-60, 0), (-10, 10), (-30, 40)], 1, Color::WHITE));
        assert!(written(&r).is_empty());
    }

    #[test]
    fn out_of_bounds_triangle_is_clipped() {
        let mut r = rasterizer(100, 100);
        r.fill_triangle(&Triangle::uniform(
            [(-20, -5), (150, 60), (40, 200)],
            3,
            Color::WHITE,
        ));

        let pixels = written(&r);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().any(|p| p.1 == 99));
        assert!(pixels.iter().any(|p| p.0 == 99));
        for (x, y) in pixels {
            assert_eq!(r.buffer().get_depth(x, y), Some(3));
        }
        assert_eq!(r.buffer().pixels().len(), 100 * 100);
        assert_eq!(r.buffer().depths().len(), 100 * 100);
    }

    #[test]
    fn extreme_coordinates_do_not_fault() {
        let mut r = rasterizer(100, 100);
        r.fill_triangle(&Triangle::new(
            vertex(i32::MIN, i32::MIN, i32::MIN, Color::RED),
            vertex(i32::MAX, 50, 0, Color::GREEN),
            vertex(0, i32::MAX, i32::MAX, Color::BLUE),
        ));
        r.fill_triangle(&Triangle::uniform(
            [(i32::MAX, 0), (i32::MIN, 0), (0, 99)],
            i32::MAX - 1,
            Color::WHITE,
        ));
        r.triangle(i32::MIN, 0, i32::MAX, 99, 0, i32::MIN);
        assert_eq!(r.buffer().pixels().len(), 100 * 100);
    }

    #[test]
    fn saturated_depth_never_becomes_overlay() {
        let mut r = rasterizer(64, 64);
        r.fill_triangle(&Triangle::new(
            vertex(5, 2, 0, Color::RED),
            vertex(60, 30, i32::MAX, Color::GREEN),
            vertex(10, 60, i32::MAX, Color::BLUE),
        ));

        let pixels = written(&r);
        assert!(!pixels.is_empty());
        for (x, y) in pixels {
            let depth = r.buffer().get_depth(x, y).unwrap();
            assert!(depth >= 0, "depth at ({}, {}) wrapped to {}", x, y, depth);
        }

        // A nearer overlapping fill must still win where the far one landed.
        r.fill_triangle(&Triangle::uniform([(0, 0), (63, 0), (0, 63)], -1, Color::WHITE));
        assert_eq!(r.buffer().get_pixel(20, 20), Some(WHITE));
    }

    #[test]
    fn far_off_line_start_skips_ahead() {
        let mut r = rasterizer(10, 10);
        r.draw_line(-1_000_000, 5, 9, 5);
        // Only the visible tail is drawn; the end point is excluded.
        let expected: Vec<_> = (0..9).map(|x| (x, 5)).collect();
        assert_eq!(written(&r), expected);
    }

    // ---------------------------------------------------------------------
    // Frames
    // ---------------------------------------------------------------------

    #[test]
    fn render_presents_then_clears() {
        let mut r = rasterizer(8, 8);
        r.fill_triangle(&Triangle::uniform([(0, 0), (7, 0), (0, 7)], 2, Color::BLUE));
        let drawn = r.buffer().pixels().to_vec();

        let mut sink = CaptureSink::default();
        r.render(&mut sink).unwrap();

        assert_eq!(sink.frames, 1);
        assert_eq!(sink.last, drawn);
        assert!(written(&r).is_empty());
    }

    #[test]
    fn render_clears_even_when_sink_fails() {
        struct FailingSink;
        impl FrameSink for FailingSink {
            type Error = &'static str;
            fn present(&mut self, _: &[u32], _: u32, _: u32) -> Result<(), Self::Error> {
                Err("display lost")
            }
        }

        let mut r = rasterizer(4, 4);
        r.draw_line(0, 0, 3, 0);
        assert_eq!(r.render(&mut FailingSink), Err("display lost"));
        assert!(written(&r).is_empty());
    }

    #[test]
    fn zero_sized_rasterizer_is_an_error() {
        assert!(ScanlineRasterizer::new(0, 0).is_err());
    }
}
