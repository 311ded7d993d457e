//! Pipeline statistics snapshot.

use serde::{Deserialize, Serialize};

/// Counters describing what the pipeline has done since `start()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Ticks received from the clock source.
    pub ticks_received: u64,

    /// Ticks skipped by the frame-interval divider.
    pub ticks_divider_skipped: u64,

    /// Ticks dropped because a frame was already in flight.
    pub ticks_dropped_busy: u64,

    /// Frames delivered to the sink.
    pub frames_emitted: u64,

    /// Frames dropped by a per-frame error (pool exhaustion, render or
    /// conversion failure).
    pub frames_dropped: u64,
}
