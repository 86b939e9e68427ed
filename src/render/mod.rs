//! Rasterization back end: buffers, the scanline rasterizer, and frame sinks.

pub mod framebuffer;
pub mod rasterizer;
pub mod sink;

pub use framebuffer::{FrameBuffer, FrameBufferError, FAR_DEPTH, OVERLAY_DEPTH};
pub use rasterizer::{ScanlineRasterizer, ScreenVertex, Triangle};
pub use sink::{CaptureSink, FrameSink, PngSink, SinkError};
