//! CPU-side raster surface.

use viewcast_core::Size;

/// Bytes per BGRA pixel.
const BYTES_PER_PIXEL: usize = 4;

/// An offscreen BGRA8 surface the rasterization backend draws into.
///
/// Rows are laid out top to bottom with a fixed stride; the stride may
/// exceed `width * 4` if a backend needs row alignment, so readers must
/// go through [`stride`](Self::stride) rather than assuming packed rows.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl RasterSurface {
    /// Allocate a zeroed surface at the given pixel dimensions with
    /// packed rows.
    pub fn new(size: Size) -> Self {
        let stride = size.width as usize * BYTES_PER_PIXEL;
        Self {
            width: size.width,
            height: size.height,
            stride,
            data: vec![0u8; stride * size.height as usize],
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel dimensions as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The raw BGRA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw BGRA bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }
}
