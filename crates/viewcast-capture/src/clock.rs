//! Tick reception and pacing.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use tracing::trace;

use crate::guard::DropFrameGuard;
use crate::stats::StatsCollector;

/// Receives ticks from the external periodic clock source.
pub trait TickObserver: Send + Sync {
    /// One tick, carrying the time since the driver's epoch.
    fn on_tick(&self, tick: Duration);
}

/// The external periodic driver's registration surface.
///
/// The driver calls `on_tick` on the attached observer from its own
/// context at its fixed native rate.
pub trait TickSource: Send + Sync {
    /// Start delivering ticks to `observer`.
    fn attach(&self, observer: Arc<dyn TickObserver>);

    /// Stop delivering ticks.
    fn detach(&self);
}

/// Paces capture attempts from the raw tick stream.
///
/// Applies the frame-interval divider (process every nth tick, firing
/// on ticks n, 2n, 3n, ...), then attempts non-blocking admission
/// through the drop-frame guard. Admitted ticks are handed to the
/// render worker; the worker releases the guard when the dispatched
/// work completes. The clock never does frame work on the tick-delivery
/// context.
pub struct CaptureClock {
    frame_interval: Arc<AtomicU32>,
    tick_count: AtomicU64,
    guard: Arc<DropFrameGuard>,
    jobs: Sender<Duration>,
    stats: Arc<StatsCollector>,
}

impl CaptureClock {
    pub(crate) fn new(
        frame_interval: Arc<AtomicU32>,
        guard: Arc<DropFrameGuard>,
        jobs: Sender<Duration>,
        stats: Arc<StatsCollector>,
    ) -> Self {
        Self {
            frame_interval,
            tick_count: AtomicU64::new(0),
            guard,
            jobs,
            stats,
        }
    }

    /// Set the divider: only every nth tick triggers a capture attempt.
    /// Values below 1 are clamped to 1.
    pub fn set_frame_interval(&self, n: u32) {
        self.frame_interval.store(n.max(1), Ordering::Relaxed);
    }
}

impl TickObserver for CaptureClock {
    fn on_tick(&self, tick: Duration) {
        self.stats.record_tick();

        let interval = self.frame_interval.load(Ordering::Relaxed).max(1) as u64;
        let count = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count % interval != 0 {
            self.stats.record_divider_skip();
            return;
        }

        if !self.guard.try_enter() {
            // Drop-newest-on-busy: skip the tick entirely, no queueing.
            self.stats.record_busy_drop();
            trace!(tick_ms = tick.as_millis() as u64, "Frame in flight, dropping tick");
            return;
        }

        if self.jobs.try_send(tick).is_err() {
            // Worker is gone; nothing downstream will release the guard.
            self.guard.exit();
        }
    }
}
