//! Owned color and depth buffers.
//!
//! Both buffers are allocated once, sized exactly `width * height`, and never
//! resized. Depth cells hold relative camera-space depth: lower values are
//! closer to the camera, and [`FAR_DEPTH`] marks an empty cell.

use std::collections::TryReserveError;
use std::fmt;

/// Depth of a cleared cell. Every real depth is at least as close as this.
pub const FAR_DEPTH: i32 = i32::MAX;

/// Depth written by overlay primitives (lines). No depth-tested write can
/// replace it.
pub const OVERLAY_DEPTH: i32 = i32::MIN;

/// Errors raised while allocating a [`FrameBuffer`].
#[derive(Debug)]
pub enum FrameBufferError {
    /// Width or height was zero.
    EmptyDimensions { width: u32, height: u32 },
    /// `width * height` does not fit in memory addressing.
    TooLarge { width: u32, height: u32 },
    /// The allocator refused the request.
    Allocation(TryReserveError),
}

impl From<TryReserveError> for FrameBufferError {
    fn from(e: TryReserveError) -> Self {
        FrameBufferError::Allocation(e)
    }
}

impl fmt::Display for FrameBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameBufferError::EmptyDimensions { width, height } => {
                write!(f, "frame buffer must be at least 1x1, got {}x{}", width, height)
            }
            FrameBufferError::TooLarge { width, height } => {
                write!(f, "frame buffer {}x{} is too large", width, height)
            }
            FrameBufferError::Allocation(e) => write!(f, "frame buffer allocation failed: {}", e),
        }
    }
}

impl std::error::Error for FrameBufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameBufferError::Allocation(e) => Some(e),
            _ => None,
        }
    }
}

/// A row-major ARGB8888 pixel buffer with a parallel depth buffer.
pub struct FrameBuffer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<i32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Allocates cleared buffers for a `width` x `height` frame.
    pub fn new(width: u32, height: u32) -> Result<Self, FrameBufferError> {
        if width == 0 || height == 0 {
            return Err(FrameBufferError::EmptyDimensions { width, height });
        }
        // Pixel coordinates are i32, so each side must fit in one.
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(FrameBufferError::TooLarge { width, height });
        }
        let size = (width as usize)
            .checked_mul(height as usize)
            .ok_or(FrameBufferError::TooLarge { width, height })?;

        let mut color_buffer = Vec::new();
        color_buffer.try_reserve_exact(size)?;
        color_buffer.resize(size, 0);

        let mut depth_buffer = Vec::new();
        depth_buffer.try_reserve_exact(size)?;
        depth_buffer.resize(size, FAR_DEPTH);

        log::debug!("allocated {}x{} frame buffer ({} cells)", width, height, size);

        Ok(Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resets every pixel to 0 and every depth cell to [`FAR_DEPTH`].
    pub fn clear(&mut self) {
        self.color_buffer.fill(0);
        self.depth_buffer.fill(FAR_DEPTH);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Writes color and depth without a depth test.
    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, depth: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
            self.depth_buffer[idx] = depth;
        }
    }

    /// Writes color and depth only if `depth` is strictly closer (smaller)
    /// than the stored depth. Equal depth keeps the existing pixel.
    /// Silently ignores out-of-bounds coordinates.
    ///
    /// Returns whether the pixel was written.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: i32, color: u32) -> bool {
        match self.index(x, y) {
            Some(idx) if depth < self.depth_buffer[idx] => {
                self.depth_buffer[idx] = depth;
                self.color_buffer[idx] = color;
                true
            }
            _ => false,
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    /// Get the depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<i32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depths(&self) -> &[i32] {
        &self.depth_buffer
    }

    /// The color buffer reinterpreted as bytes, for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        pixels_as_bytes(&self.color_buffer)
    }
}

/// Reinterprets packed pixels as native-endian bytes.
pub fn pixels_as_bytes(pixels: &[u32]) -> &[u8] {
    // SAFETY: u32 has no padding and every bit pattern is a valid u8
    // sequence; the byte slice covers exactly the same memory and borrows it.
    unsafe { std::slice::from_raw_parts(pixels.as_ptr() as *const u8, std::mem::size_of_val(pixels)) }
}
