//! Geometry value types.

use serde::{Deserialize, Serialize};

/// A width/height pair in whole pixels (or logical points, depending
/// on context).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Scale both dimensions by a factor, rounding to the nearest pixel.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            width: (self.width as f32 * factor).round() as u32,
            height: (self.height as f32 * factor).round() as u32,
        }
    }

    /// Total pixel count.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,

    /// Top edge.
    pub y: i32,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle covering the full bounds of `size`, with its
    /// origin at (0, 0).
    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0,
            y: 0,
            width: size.width,
            height: size.height,
        }
    }

    /// The rectangle's dimensions as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
