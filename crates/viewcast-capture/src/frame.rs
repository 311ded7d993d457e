//! Produced frame types.

use std::time::Duration;

use crate::pool::{BufferDescriptor, PixelBufferHandle};

/// Timestamp of a produced frame.
///
/// Ticks arrive as a `Duration` since the driver's epoch; the
/// presentation timestamp is expressed in milliseconds so downstream
/// consumers see one clock domain regardless of the tick source's
/// native unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimestamp {
    /// The tick this frame was produced for.
    pub tick: Duration,

    /// Presentation timestamp in milliseconds.
    pub pts_ms: u64,
}

impl FrameTimestamp {
    /// Derive the presentation timestamp from a tick.
    pub fn from_tick(tick: Duration) -> Self {
        Self {
            tick,
            pts_ms: tick.as_millis() as u64,
        }
    }
}

/// A completed frame: one pooled pixel buffer plus its presentation
/// timestamp. Ownership moves to the sink on emission; dropping the
/// frame returns the buffer to the pool.
#[derive(Debug)]
pub struct Frame {
    /// The converted pixel data.
    pub buffer: PixelBufferHandle,

    /// When this frame is nominally meant to be displayed or encoded.
    pub timestamp: FrameTimestamp,
}

impl Frame {
    /// Descriptor of the underlying buffer.
    pub fn descriptor(&self) -> BufferDescriptor {
        self.buffer.descriptor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pts_is_milliseconds() {
        let ts = FrameTimestamp::from_tick(Duration::from_micros(16_700));
        assert_eq!(ts.pts_ms, 16);

        let ts = FrameTimestamp::from_tick(Duration::from_secs(2));
        assert_eq!(ts.pts_ms, 2_000);
    }
}
