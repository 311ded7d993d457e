//! Per-tick frame production.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::debug;

use viewcast_core::{CaptureConfig, Rect};

use crate::convert::PixelConverter;
use crate::error::FrameError;
use crate::frame::{Frame, FrameTimestamp};
use crate::pool::{BufferDescriptor, PixelBufferPool};
use crate::sink::FrameSink;
use crate::surface::RasterSurface;
use crate::target::CaptureTarget;

/// Produces one frame per admitted tick: geometry query, pool
/// (re)configuration, rasterization, and format conversion.
///
/// Runs only on the dedicated render worker; the drop-frame guard
/// guarantees a single in-flight invocation, so no state here is
/// touched concurrently.
pub struct FrameRenderer {
    target: Arc<dyn CaptureTarget>,
    pool: PixelBufferPool,
    converter: Arc<dyn PixelConverter>,
    sink: Weak<dyn FrameSink>,
    config: CaptureConfig,
}

impl FrameRenderer {
    /// Create a renderer over the given collaborators. `config` is
    /// normalized by the caller.
    pub fn new(
        target: Arc<dyn CaptureTarget>,
        pool: PixelBufferPool,
        converter: Arc<dyn PixelConverter>,
        sink: Weak<dyn FrameSink>,
        config: CaptureConfig,
    ) -> Self {
        Self {
            target,
            pool,
            converter,
            sink,
            config,
        }
    }

    /// Produce the frame for one tick.
    ///
    /// Any error drops this frame only; the pool and session stay
    /// usable for the next tick.
    pub fn process_one(&self, tick: Duration) -> Result<Frame, FrameError> {
        let logical = self.target.current_size();
        if logical.is_empty() {
            return Err(FrameError::InvalidGeometry {
                width: logical.width,
                height: logical.height,
            });
        }

        let scale = self.config.effective_scale(self.target.scale_factor());
        let descriptor =
            BufferDescriptor::for_target(logical, scale, self.converter.output_format());

        // Reconfigure and notify once per distinct size, not once per tick.
        if self.pool.descriptor() != Some(descriptor) {
            self.pool.configure(descriptor);
            debug!(
                width = descriptor.width,
                height = descriptor.height,
                "Capture size changed"
            );
            if let Some(sink) = self.sink.upgrade() {
                sink.on_size_changed(descriptor.width, descriptor.height);
            }
        }

        let mut buffer = self
            .pool
            .acquire()
            .map_err(FrameError::BufferUnavailable)?;

        let mut surface = RasterSurface::new(descriptor.size());
        let snapshot_after_update =
            self.config.snapshot_after_update || self.target.prefers_post_update_snapshot();
        self.target
            .render(&mut surface, Rect::from_size(logical), snapshot_after_update)
            .map_err(FrameError::RenderFailed)?;

        self.converter
            .convert(&surface, &mut buffer)
            .map_err(FrameError::ConversionFailed)?;

        Ok(Frame {
            buffer,
            timestamp: FrameTimestamp::from_tick(tick),
        })
    }
}
