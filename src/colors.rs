//! Vertex colors and integer interpolation.
//!
//! All interpolation here truncates toward zero instead of rounding, so that
//! a given triangle always produces the same pixels.

/// An 8-bit-per-channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packs into ARGB8888.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_argb()
    }
}

/// Integer linear interpolation: `a + trunc((b - a) * t)`.
///
/// The difference is taken in 64 bits so that extreme depth values cannot
/// overflow. The result is clamped to the range between `a` and `b`, since
/// the `f32` product can round past `b` for large differences.
#[inline]
pub fn lerp(a: i32, b: i32, t: f32) -> i32 {
    let delta = (b as i64 - a as i64) as f32 * t;
    (a as i64 + delta as i64).clamp(a.min(b) as i64, a.max(b) as i64) as i32
}

/// Interpolates each channel independently with [`lerp`].
#[inline]
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let channel = |from: u8, to: u8| lerp(from as i32, to as i32, t).clamp(0, 255) as u8;
    Color {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
        a: channel(a.a, b.a),
    }
}
