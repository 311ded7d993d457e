//! Paced frame capture with pooled pixel buffers.
//!
//! This crate is the producer side of a live video pipeline: an external
//! periodic clock drives it, an external rasterization backend draws into
//! it, and completed frames are handed to a [`FrameSink`] (typically an
//! encoder). The pipeline guarantees at most one frame in flight and
//! drops ticks rather than queueing them when processing falls behind.

mod clock;
mod convert;
mod error;
mod frame;
mod guard;
mod pool;
mod renderer;
mod session;
mod sink;
mod stats;
mod surface;
mod target;

#[cfg(test)]
pub(crate) mod testutil;

pub use clock::{CaptureClock, TickObserver, TickSource};
pub use convert::{Bgra8Converter, Nv12Converter, PixelConverter};
pub use error::{ConvertError, FrameError, PoolError, RenderError};
pub use frame::{Frame, FrameTimestamp};
pub use guard::DropFrameGuard;
pub use pool::{BufferDescriptor, PixelBufferHandle, PixelBufferPool, PixelFormat};
pub use renderer::FrameRenderer;
pub use session::CaptureSession;
pub use sink::FrameSink;
pub use stats::StatsCollector;
pub use surface::RasterSurface;
pub use target::{
    CaptureTarget, FullScreenTarget, GeometrySource, RenderBackend, ViewSubtreeTarget,
};

/// Number of pixel buffers the pool will hold before acquisition fails.
pub const POOL_DEPTH: usize = 3;

/// Capacity of the tick-to-worker job channel. The drop-frame guard
/// admits one tick at a time, so one slot is enough.
pub(crate) const TICK_JOB_CAPACITY: usize = 1;
