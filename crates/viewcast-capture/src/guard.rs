//! Non-blocking single-frame admission gate.

use std::sync::atomic::{AtomicBool, Ordering};

/// Ensures at most one frame-processing operation is in flight.
///
/// Ticks that arrive while busy are discarded, never queued: under slow
/// rasterization the pipeline drops the newest frame rather than
/// building a backlog.
#[derive(Debug, Default)]
pub struct DropFrameGuard {
    busy: AtomicBool,
}

impl DropFrameGuard {
    /// Create a guard with no frame in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to mark a frame in flight. Never blocks.
    ///
    /// Returns true iff the caller won admission; every successful call
    /// must be paired with exactly one [`exit`](Self::exit), on success
    /// and failure paths alike.
    pub fn try_enter(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clear the in-flight marker.
    pub fn exit(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Whether a frame is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_second_enter_refused_until_exit() {
        let guard = DropFrameGuard::new();

        assert!(guard.try_enter());
        assert!(guard.is_busy());
        assert!(!guard.try_enter());
        assert!(!guard.try_enter());

        guard.exit();
        assert!(!guard.is_busy());
        assert!(guard.try_enter());
    }

    #[test]
    fn test_at_most_one_in_flight_under_contention() {
        let guard = Arc::new(DropFrameGuard::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let admitted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                let admitted = Arc::clone(&admitted);
                thread::spawn(move || {
                    for _ in 0..500 {
                        if guard.try_enter() {
                            admitted.fetch_add(1, Ordering::Relaxed);
                            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                            max_seen.fetch_max(now, Ordering::SeqCst);
                            thread::yield_now();
                            in_flight.fetch_sub(1, Ordering::SeqCst);
                            guard.exit();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(admitted.load(Ordering::Relaxed) >= 1);
        assert!(!guard.is_busy());
    }
}
