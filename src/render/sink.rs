//! Frame presentation.
//!
//! A [`FrameSink`] receives the finished ARGB8888 buffer once per
//! [`ScanlineRasterizer::render`](super::ScanlineRasterizer::render) call.

use std::fmt;
use std::path::PathBuf;

/// Receives finished frames.
pub trait FrameSink {
    type Error;

    /// Presents a row-major ARGB8888 frame of `width * height` pixels.
    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> Result<(), Self::Error>;
}

/// Errors raised while writing a frame to disk.
#[derive(Debug)]
pub enum SinkError {
    Io(std::io::Error),
    Image(image::ImageError),
    /// The pixel slice did not match the frame dimensions.
    Size { expected: usize, actual: usize },
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e)
    }
}

impl From<image::ImageError> for SinkError {
    fn from(e: image::ImageError) -> Self {
        SinkError::Image(e)
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Io(e) => write!(f, "IO error: {}", e),
            SinkError::Image(e) => write!(f, "Image error: {}", e),
            SinkError::Size { expected, actual } => {
                write!(f, "frame has {} pixels, expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io(e) => Some(e),
            SinkError::Image(e) => Some(e),
            SinkError::Size { .. } => None,
        }
    }
}

/// Writes every presented frame to `<dir>/frame_NNNN.png`.
pub struct PngSink {
    dir: PathBuf,
    frame: u32,
}

impl PngSink {
    /// Creates the output directory if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, frame: 0 })
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u32 {
        self.frame
    }

    fn frame_path(&self) -> PathBuf {
        self.dir.join(format!("frame_{:04}.png", self.frame))
    }
}

impl FrameSink for PngSink {
    type Error = SinkError;

    fn present(&mut self, pixels: &[u32], width: u32, height: u32) -> Result<(), SinkError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SinkError::Size {
                expected,
                actual: pixels.len(),
            });
        }

        // ARGB -> RGBA, forcing opaque alpha so cleared pixels show as black.
        let image = image::RgbaImage::from_fn(width, height, |x, y| {
            let argb = pixels[y as usize * width as usize + x as usize];
            image::Rgba([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8, 255])
        });

        let path = self.frame_path();
        image.save(&path)?;
        log::debug!("wrote {}", path.display());
        self.frame += 1;
        Ok(())
    }
}

/// Keeps a copy of the most recent frame in memory.
#[derive(Debug, Default)]
pub struct CaptureSink {
    pub frames: u32,
    pub last: Vec<u32>,
}

impl FrameSink for CaptureSink {
    type Error = std::convert::Infallible;

    fn present(&mut self, pixels: &[u32], _width: u32, _height: u32) -> Result<(), Self::Error> {
        self.frames += 1;
        self.last.clear();
        self.last.extend_from_slice(pixels);
        Ok(())
    }
}
