//! Capture session lifecycle.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use viewcast_core::{CaptureConfig, CaptureStats};

use crate::clock::{CaptureClock, TickObserver, TickSource};
use crate::convert::PixelConverter;
use crate::error::FrameError;
use crate::guard::DropFrameGuard;
use crate::pool::PixelBufferPool;
use crate::renderer::FrameRenderer;
use crate::sink::FrameSink;
use crate::stats::StatsCollector;
use crate::target::CaptureTarget;
use crate::TICK_JOB_CAPACITY;

struct SessionInner {
    running: bool,
    clock: Option<Arc<CaptureClock>>,
}

/// A capture session: owns the pool, the guard, and the start/stop
/// state machine.
///
/// `start()` and `stop()` are idempotent and may be called from any
/// thread; one critical section serializes them against each other.
/// `stop()` never waits for an in-flight frame: the frame past the
/// guard is allowed to complete and emit after `stop()` returns.
pub struct CaptureSession {
    target: Arc<dyn CaptureTarget>,
    tick_source: Arc<dyn TickSource>,
    converter: Arc<dyn PixelConverter>,
    sink: Weak<dyn FrameSink>,
    config: CaptureConfig,
    frame_interval: Arc<AtomicU32>,
    pool: PixelBufferPool,
    guard: Arc<DropFrameGuard>,
    stats: Arc<StatsCollector>,
    inner: Mutex<SessionInner>,
}

impl CaptureSession {
    /// Create a stopped session. The sink is held weakly: it is owned
    /// by the host and may be torn down after `stop()`.
    pub fn new(
        target: Arc<dyn CaptureTarget>,
        tick_source: Arc<dyn TickSource>,
        converter: Arc<dyn PixelConverter>,
        sink: Weak<dyn FrameSink>,
        config: CaptureConfig,
    ) -> Self {
        let config = config.normalized();
        Self {
            target,
            tick_source,
            converter,
            sink,
            frame_interval: Arc::new(AtomicU32::new(config.frame_interval)),
            config,
            pool: PixelBufferPool::new(),
            guard: Arc::new(DropFrameGuard::new()),
            stats: Arc::new(StatsCollector::new()),
            inner: Mutex::new(SessionInner {
                running: false,
                clock: None,
            }),
        }
    }

    /// Begin capturing. No-op if already running.
    #[instrument(name = "capture_start", skip(self))]
    pub fn start(&self) {
        let mut inner = self.inner.lock();
        if inner.running {
            debug!("Already running, ignoring start");
            return;
        }

        info!("Starting capture session");

        // Force a full pool reconfiguration (and a fresh size
        // notification) on the first tick of this run.
        self.pool.reset();
        self.stats.reset();

        let (jobs_tx, jobs_rx) = crossbeam_channel::bounded(TICK_JOB_CAPACITY);

        let renderer = FrameRenderer::new(
            Arc::clone(&self.target),
            self.pool.clone(),
            Arc::clone(&self.converter),
            Weak::clone(&self.sink),
            self.config.clone(),
        );
        let sink = Weak::clone(&self.sink);
        let guard = Arc::clone(&self.guard);
        let stats = Arc::clone(&self.stats);
        thread::spawn(move || render_worker(jobs_rx, renderer, sink, guard, stats));

        let clock = Arc::new(CaptureClock::new(
            Arc::clone(&self.frame_interval),
            Arc::clone(&self.guard),
            jobs_tx,
            Arc::clone(&self.stats),
        ));
        self.tick_source.attach(Arc::clone(&clock) as Arc<dyn TickObserver>);

        inner.clock = Some(clock);
        inner.running = true;
    }

    /// Stop capturing. No-op if already stopped.
    ///
    /// Deregisters from the tick source and releases the pool; does not
    /// block on an in-flight frame.
    #[instrument(name = "capture_stop", skip(self))]
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        if !inner.running {
            debug!("Already stopped, ignoring stop");
            return;
        }

        info!("Stopping capture session");

        self.tick_source.detach();

        // Dropping the clock closes the job channel; the worker drains
        // its current job and exits. An in-flight frame may still emit
        // once after this returns.
        inner.clock = None;

        self.pool.reset();
        inner.running = false;
    }

    /// Whether the session is currently capturing.
    pub fn is_running(&self) -> bool {
        self.inner.lock().running
    }

    /// Update the tick divider, effective immediately. Values below 1
    /// are clamped to 1.
    pub fn set_frame_interval(&self, n: u32) {
        self.frame_interval.store(n.max(1), Ordering::Relaxed);
    }

    /// Counters since the last `start()`.
    pub fn stats(&self) -> CaptureStats {
        self.stats.snapshot()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Dedicated per-session render loop. Exits when the job channel
/// closes; releases the guard after every job, on every path.
fn render_worker(
    jobs: Receiver<Duration>,
    renderer: FrameRenderer,
    sink: Weak<dyn FrameSink>,
    guard: Arc<DropFrameGuard>,
    stats: Arc<StatsCollector>,
) {
    debug!("Render worker starting");

    for tick in jobs.iter() {
        match renderer.process_one(tick) {
            Ok(frame) => {
                if let Some(sink) = sink.upgrade() {
                    sink.on_frame(frame);
                } else {
                    trace!("Sink torn down, discarding frame");
                }
                stats.record_frame();
            }
            Err(FrameError::InvalidGeometry { width, height }) => {
                trace!(width, height, "Zero-area target, skipping tick");
            }
            Err(e) => {
                stats.record_frame_drop();
                warn!("Frame dropped: {}", e);
            }
        }
        guard.exit();
    }

    debug!("Render worker stopped");
}
