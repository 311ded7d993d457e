//! Capture target abstraction.
//!
//! A target is what gets captured: the full compositor output or one
//! view's subtree. Both are thin compositions of two injected seams,
//! a [`GeometrySource`] for size/scale queries and a [`RenderBackend`]
//! for the actual rasterization, so tests can substitute deterministic
//! geometry without a real display.

use std::sync::Arc;

use viewcast_core::{Rect, Size};

use crate::error::RenderError;
use crate::surface::RasterSurface;

/// Provides the current bounds and device scale of a capture target.
///
/// Both queries must be cheap, synchronous, and side-effect-free; they
/// run on every tick.
pub trait GeometrySource: Send + Sync {
    /// Current logical size of the target.
    fn size(&self) -> Size;

    /// Device scale factor (>= 1.0 for real displays).
    fn scale_factor(&self) -> f32;
}

/// The external rasterization collaborator.
///
/// Draws the target's current visual state into `surface`, bounded by
/// `region` (in logical coordinates; the backend handles scale-correct
/// drawing at the surface's pixel dimensions). This call may
/// synchronize with the context that owns the visual tree, and is the
/// pipeline's single blocking point.
pub trait RenderBackend: Send + Sync {
    /// Rasterize into the surface. `snapshot_after_update` requests
    /// waiting for pending visual updates to flush first; backends that
    /// capture composited output may ignore it.
    fn render(
        &self,
        surface: &mut RasterSurface,
        region: Rect,
        snapshot_after_update: bool,
    ) -> Result<(), RenderError>;
}

/// Polymorphic capture source: what to capture and how to draw it.
pub trait CaptureTarget: Send + Sync {
    /// Current logical size. Read on every tick, never mutated by the
    /// pipeline; size changes originate externally.
    fn current_size(&self) -> Size;

    /// Device scale factor.
    fn scale_factor(&self) -> f32;

    /// Whether this target requires waiting for pending visual updates
    /// before drawing, regardless of session configuration.
    fn prefers_post_update_snapshot(&self) -> bool {
        false
    }

    /// Draw the target into `surface`.
    fn render(
        &self,
        surface: &mut RasterSurface,
        region: Rect,
        snapshot_after_update: bool,
    ) -> Result<(), RenderError>;
}

/// Captures the full compositor output of a display.
pub struct FullScreenTarget {
    geometry: Arc<dyn GeometrySource>,
    backend: Arc<dyn RenderBackend>,
}

impl FullScreenTarget {
    /// Create a full-screen target over the given display geometry and
    /// rasterization backend.
    pub fn new(geometry: Arc<dyn GeometrySource>, backend: Arc<dyn RenderBackend>) -> Self {
        Self { geometry, backend }
    }
}

impl CaptureTarget for FullScreenTarget {
    fn current_size(&self) -> Size {
        self.geometry.size()
    }

    fn scale_factor(&self) -> f32 {
        self.geometry.scale_factor()
    }

    fn render(
        &self,
        surface: &mut RasterSurface,
        region: Rect,
        _snapshot_after_update: bool,
    ) -> Result<(), RenderError> {
        // Compositor output is always post-update; the flag is meaningless here.
        self.backend.render(surface, region, false)
    }
}

/// Captures one view's subtree.
pub struct ViewSubtreeTarget {
    geometry: Arc<dyn GeometrySource>,
    backend: Arc<dyn RenderBackend>,
}

impl ViewSubtreeTarget {
    /// Create a view-subtree target over the given view geometry and
    /// rasterization backend.
    pub fn new(geometry: Arc<dyn GeometrySource>, backend: Arc<dyn RenderBackend>) -> Self {
        Self { geometry, backend }
    }
}

impl CaptureTarget for ViewSubtreeTarget {
    fn current_size(&self) -> Size {
        self.geometry.size()
    }

    fn scale_factor(&self) -> f32 {
        self.geometry.scale_factor()
    }

    fn prefers_post_update_snapshot(&self) -> bool {
        // A mid-layout capture of a view subtree is visually incorrect.
        true
    }

    fn render(
        &self,
        surface: &mut RasterSurface,
        region: Rect,
        snapshot_after_update: bool,
    ) -> Result<(), RenderError> {
        self.backend.render(surface, region, snapshot_after_update)
    }
}
