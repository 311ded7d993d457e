//! Error types for the capture pipeline.

use thiserror::Error;

use crate::pool::PixelFormat;

/// Errors from the pixel buffer pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// `acquire()` was called before the pool was configured with a
    /// descriptor.
    #[error("buffer pool has no descriptor configured")]
    Unconfigured,

    /// Every buffer up to the pool depth is checked out.
    #[error("all pooled buffers are checked out")]
    Exhausted,
}

/// Failure reported by the external rasterization backend.
#[derive(Debug, Error)]
#[error("rasterization failed: {0}")]
pub struct RenderError(pub String);

/// Errors from pixel format conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Surface dimensions do not match the destination buffer.
    #[error("surface is {surface_width}x{surface_height} but buffer expects {buffer_width}x{buffer_height}")]
    SizeMismatch {
        surface_width: u32,
        surface_height: u32,
        buffer_width: u32,
        buffer_height: u32,
    },

    /// The destination buffer's format is not one this converter
    /// produces.
    #[error("converter does not produce {0:?}")]
    UnsupportedFormat(PixelFormat),
}

/// Per-frame failures. All of these drop the current frame only; the
/// pool, clock, and session remain usable for the next tick.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The pool could not supply a buffer for this tick.
    #[error("no pixel buffer available")]
    BufferUnavailable(#[source] PoolError),

    /// The rasterization backend failed.
    #[error("frame rasterization failed")]
    RenderFailed(#[source] RenderError),

    /// The rasterized surface could not be converted to the target
    /// pixel format.
    #[error("pixel conversion failed")]
    ConversionFailed(#[source] ConvertError),

    /// The target reported a zero dimension; the tick is skipped
    /// silently without attempting allocation.
    #[error("invalid capture geometry: {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
}
