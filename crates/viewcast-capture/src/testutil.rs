//! Deterministic fakes shared by the module tests.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use viewcast_core::{Rect, Size};

use crate::clock::{TickObserver, TickSource};
use crate::error::RenderError;
use crate::frame::Frame;
use crate::sink::FrameSink;
use crate::surface::RasterSurface;
use crate::target::{GeometrySource, RenderBackend};

/// Geometry with a mutable size and fixed scale.
pub struct FixedGeometry {
    size: Mutex<Size>,
    scale: f32,
}

impl FixedGeometry {
    pub fn new(size: Size, scale: f32) -> Self {
        Self {
            size: Mutex::new(size),
            scale,
        }
    }

    pub fn set_size(&self, size: Size) {
        *self.size.lock() = size;
    }
}

impl GeometrySource for FixedGeometry {
    fn size(&self) -> Size {
        *self.size.lock()
    }

    fn scale_factor(&self) -> f32 {
        self.scale
    }
}

/// Backend that fills the surface with a constant byte and records the
/// snapshot flag it was last asked for.
pub struct FillBackend {
    fill: u8,
    last_snapshot_flag: Mutex<Option<bool>>,
}

impl FillBackend {
    pub fn new(fill: u8) -> Self {
        Self {
            fill,
            last_snapshot_flag: Mutex::new(None),
        }
    }

    pub fn last_snapshot_flag(&self) -> Option<bool> {
        *self.last_snapshot_flag.lock()
    }
}

impl RenderBackend for FillBackend {
    fn render(
        &self,
        surface: &mut RasterSurface,
        _region: Rect,
        snapshot_after_update: bool,
    ) -> Result<(), RenderError> {
        surface.data_mut().fill(self.fill);
        *self.last_snapshot_flag.lock() = Some(snapshot_after_update);
        Ok(())
    }
}

/// Backend that always fails.
pub struct FailingBackend;

impl RenderBackend for FailingBackend {
    fn render(
        &self,
        _surface: &mut RasterSurface,
        _region: Rect,
        _snapshot_after_update: bool,
    ) -> Result<(), RenderError> {
        Err(RenderError("backend offline".into()))
    }
}

/// What a [`RecordingSink`] observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    SizeChanged { width: u32, height: u32 },
    Frame { pts_ms: u64, width: u32, height: u32 },
}

/// Sink that records every callback. Frame buffers are dropped on
/// receipt, returning them to the pool.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn size_events(&self) -> Vec<(u32, u32)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::SizeChanged { width, height } => Some((width, height)),
                _ => None,
            })
            .collect()
    }

    pub fn frame_timestamps(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Frame { pts_ms, .. } => Some(pts_ms),
                _ => None,
            })
            .collect()
    }
}

impl FrameSink for RecordingSink {
    fn on_size_changed(&self, width: u32, height: u32) {
        self.events
            .lock()
            .push(SinkEvent::SizeChanged { width, height });
    }

    fn on_frame(&self, frame: Frame) {
        let descriptor = frame.descriptor();
        self.events.lock().push(SinkEvent::Frame {
            pts_ms: frame.timestamp.pts_ms,
            width: descriptor.width,
            height: descriptor.height,
        });
    }
}

/// Tick source driven by hand from tests.
#[derive(Default)]
pub struct ManualTickSource {
    observer: Mutex<Option<Arc<dyn TickObserver>>>,
}

impl ManualTickSource {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver one tick to the attached observer, if any.
    pub fn fire(&self, tick: Duration) {
        let observer = self.observer.lock().clone();
        if let Some(observer) = observer {
            observer.on_tick(tick);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.observer.lock().is_some()
    }
}

impl TickSource for ManualTickSource {
    fn attach(&self, observer: Arc<dyn TickObserver>) {
        *self.observer.lock() = Some(observer);
    }

    fn detach(&self) {
        *self.observer.lock() = None;
    }
}
