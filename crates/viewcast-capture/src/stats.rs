//! Pipeline counters.

use std::sync::atomic::{AtomicU64, Ordering};

use viewcast_core::CaptureStats;

/// Collects pipeline counters. Cheap to update from any thread.
#[derive(Debug, Default)]
pub struct StatsCollector {
    ticks_received: AtomicU64,
    ticks_divider_skipped: AtomicU64,
    ticks_dropped_busy: AtomicU64,
    frames_emitted: AtomicU64,
    frames_dropped: AtomicU64,
}

impl StatsCollector {
    /// Create a collector with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick arriving from the clock source.
    pub fn record_tick(&self) {
        self.ticks_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a tick skipped by the frame-interval divider.
    pub fn record_divider_skip(&self) {
        self.ticks_divider_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a tick dropped because a frame was in flight.
    pub fn record_busy_drop(&self) {
        self.ticks_dropped_busy.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame delivered to the sink.
    pub fn record_frame(&self) {
        self.frames_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame dropped by a per-frame error.
    pub fn record_frame_drop(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Zero all counters.
    pub fn reset(&self) {
        self.ticks_received.store(0, Ordering::Relaxed);
        self.ticks_divider_skipped.store(0, Ordering::Relaxed);
        self.ticks_dropped_busy.store(0, Ordering::Relaxed);
        self.frames_emitted.store(0, Ordering::Relaxed);
        self.frames_dropped.store(0, Ordering::Relaxed);
    }

    /// Current counter snapshot.
    pub fn snapshot(&self) -> CaptureStats {
        CaptureStats {
            ticks_received: self.ticks_received.load(Ordering::Relaxed),
            ticks_divider_skipped: self.ticks_divider_skipped.load(Ordering::Relaxed),
            ticks_dropped_busy: self.ticks_dropped_busy.load(Ordering::Relaxed),
            frames_emitted: self.frames_emitted.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
        }
    }
}
