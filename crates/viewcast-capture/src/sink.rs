//! Consumer-side contract.

use crate::frame::Frame;

/// The downstream consumer of produced frames, typically an encoder.
///
/// Implemented externally and held by the pipeline without ownership
/// (a `Weak` reference): the sink may be torn down any time after
/// `stop()`, and the pipeline tolerates that by skipping delivery.
pub trait FrameSink: Send + Sync {
    /// A new output size, in pixels. Called at most once per distinct
    /// size, always before any frame at that size is delivered.
    fn on_size_changed(&self, width: u32, height: u32);

    /// One successfully produced frame. The sink owns the frame's
    /// buffer for the duration of the call; dropping the frame returns
    /// the buffer to the pool, so a sink that needs the pixels longer
    /// must copy them.
    fn on_frame(&self, frame: Frame);
}
