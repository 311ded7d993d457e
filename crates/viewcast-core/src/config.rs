//! Capture session configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Tick divider: only every nth tick from the clock source triggers
    /// a capture attempt. Must be at least 1 (default: 2).
    pub frame_interval: u32,

    /// When false, capture at 1.0x regardless of the device pixel
    /// density (default: false).
    pub scale_enabled: bool,

    /// Wait for pending visual updates to flush before rasterizing.
    /// Forced on for view-subtree targets regardless of this setting
    /// (default: false).
    pub snapshot_after_update: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_interval: 2,
            scale_enabled: false,
            snapshot_after_update: false,
        }
    }
}

impl CaptureConfig {
    /// Return a copy with out-of-range fields clamped to valid values.
    pub fn normalized(&self) -> Self {
        Self {
            frame_interval: self.frame_interval.max(1),
            ..self.clone()
        }
    }

    /// The scale factor to capture at, given the device scale reported
    /// by the target.
    pub fn effective_scale(&self, device_scale: f32) -> f32 {
        if self.scale_enabled {
            device_scale.max(1.0)
        } else {
            1.0
        }
    }
}
