//! Pixel format conversion.

use crate::error::ConvertError;
use crate::pool::{PixelBufferHandle, PixelFormat};
use crate::surface::RasterSurface;

/// Converts a rasterized BGRA surface into a target pixel format.
pub trait PixelConverter: Send + Sync {
    /// The format this converter writes.
    fn output_format(&self) -> PixelFormat;

    /// Convert `surface` into `buffer`. The buffer's descriptor must
    /// match the converter's output format and the surface dimensions.
    fn convert(
        &self,
        surface: &RasterSurface,
        buffer: &mut PixelBufferHandle,
    ) -> Result<(), ConvertError>;
}

fn check_dimensions(
    surface: &RasterSurface,
    buffer: &PixelBufferHandle,
    format: PixelFormat,
) -> Result<(), ConvertError> {
    let descriptor = buffer.descriptor();
    if descriptor.format != format {
        return Err(ConvertError::UnsupportedFormat(descriptor.format));
    }
    if descriptor.width != surface.width() || descriptor.height != surface.height() {
        return Err(ConvertError::SizeMismatch {
            surface_width: surface.width(),
            surface_height: surface.height(),
            buffer_width: descriptor.width,
            buffer_height: descriptor.height,
        });
    }
    Ok(())
}

/// Software BGRA to NV12 converter using BT.601 coefficients.
#[derive(Debug, Default)]
pub struct Nv12Converter;

impl Nv12Converter {
    /// Create a converter.
    pub fn new() -> Self {
        Self
    }
}

impl PixelConverter for Nv12Converter {
    fn output_format(&self) -> PixelFormat {
        PixelFormat::Nv12
    }

    fn convert(
        &self,
        surface: &RasterSurface,
        buffer: &mut PixelBufferHandle,
    ) -> Result<(), ConvertError> {
        check_dimensions(surface, buffer, PixelFormat::Nv12)?;

        let w = surface.width() as usize;
        let h = surface.height() as usize;
        let src_stride = surface.stride();
        let dst_stride = buffer.descriptor().row_stride();
        let bgra = surface.data();
        let nv12 = &mut buffer[..];

        // Y plane
        for y in 0..h {
            for x in 0..w {
                let src = y * src_stride + x * 4;
                let b = bgra[src] as f32;
                let g = bgra[src + 1] as f32;
                let r = bgra[src + 2] as f32;

                // BT.601 conversion
                let y_val = (0.299 * r + 0.587 * g + 0.114 * b) as u8;
                nv12[y * dst_stride + x] = y_val;
            }
        }

        // UV plane, subsampled 2x2; odd trailing row/column keep the
        // zeroed default chroma.
        let uv_offset = dst_stride * h;
        let even_w = w & !1;
        let even_h = h & !1;
        for y in (0..even_h).step_by(2) {
            for x in (0..even_w).step_by(2) {
                let src = y * src_stride + x * 4;
                let b = bgra[src] as f32;
                let g = bgra[src + 1] as f32;
                let r = bgra[src + 2] as f32;

                let u = ((-0.169 * r - 0.331 * g + 0.500 * b) + 128.0).clamp(0.0, 255.0) as u8;
                let v = ((0.500 * r - 0.419 * g - 0.081 * b) + 128.0).clamp(0.0, 255.0) as u8;

                let uv_idx = uv_offset + (y / 2) * dst_stride + x;
                nv12[uv_idx] = u;
                nv12[uv_idx + 1] = v;
            }
        }

        Ok(())
    }
}

/// Pass-through converter that copies BGRA rows into the destination
/// stride layout.
#[derive(Debug, Default)]
pub struct Bgra8Converter;

impl Bgra8Converter {
    /// Create a converter.
    pub fn new() -> Self {
        Self
    }
}

impl PixelConverter for Bgra8Converter {
    fn output_format(&self) -> PixelFormat {
        PixelFormat::Bgra8
    }

    fn convert(
        &self,
        surface: &RasterSurface,
        buffer: &mut PixelBufferHandle,
    ) -> Result<(), ConvertError> {
        check_dimensions(surface, buffer, PixelFormat::Bgra8)?;

        let row_bytes = surface.width() as usize * 4;
        let dst_stride = buffer.descriptor().row_stride();
        for y in 0..surface.height() {
            let dst_start = y as usize * dst_stride;
            buffer[dst_start..dst_start + row_bytes].copy_from_slice(surface.row(y));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{BufferDescriptor, PixelBufferPool};
    use viewcast_core::Size;

    fn acquire(descriptor: BufferDescriptor) -> PixelBufferHandle {
        let pool = PixelBufferPool::new();
        pool.configure(descriptor);
        pool.acquire().unwrap()
    }

    fn packed(format: PixelFormat, width: u32, height: u32) -> BufferDescriptor {
        BufferDescriptor {
            format,
            width,
            height,
            row_alignment: 1,
        }
    }

    #[test]
    fn test_nv12_black_frame() {
        let surface = RasterSurface::new(Size::new(4, 4));
        let mut buffer = acquire(packed(PixelFormat::Nv12, 4, 4));

        Nv12Converter::new().convert(&surface, &mut buffer).unwrap();

        // Black: Y = 0, U = V = 128.
        assert!(buffer[..16].iter().all(|&b| b == 0));
        assert!(buffer[16..].iter().all(|&b| b == 128));
    }

    #[test]
    fn test_nv12_red_frame() {
        let mut surface = RasterSurface::new(Size::new(2, 2));
        for pixel in surface.data_mut().chunks_exact_mut(4) {
            pixel.copy_from_slice(&[0, 0, 255, 255]); // BGRA red
        }
        let mut buffer = acquire(packed(PixelFormat::Nv12, 2, 2));

        Nv12Converter::new().convert(&surface, &mut buffer).unwrap();

        // BT.601: Y = 0.299 * 255, U = -0.169 * 255 + 128, V clamps to 255.
        assert_eq!(buffer[0], 76);
        assert_eq!(buffer[4], 84);
        assert_eq!(buffer[5], 255);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let surface = RasterSurface::new(Size::new(4, 4));
        let mut buffer = acquire(packed(PixelFormat::Nv12, 8, 8));

        let err = Nv12Converter::new()
            .convert(&surface, &mut buffer)
            .unwrap_err();
        assert!(matches!(err, ConvertError::SizeMismatch { .. }));
    }

    #[test]
    fn test_format_mismatch_rejected() {
        let surface = RasterSurface::new(Size::new(4, 4));
        let mut buffer = acquire(packed(PixelFormat::Bgra8, 4, 4));

        let err = Nv12Converter::new()
            .convert(&surface, &mut buffer)
            .unwrap_err();
        assert_eq!(err, ConvertError::UnsupportedFormat(PixelFormat::Bgra8));
    }

    #[test]
    fn test_bgra_passthrough() {
        let mut surface = RasterSurface::new(Size::new(2, 1));
        surface.data_mut().copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut buffer = acquire(packed(PixelFormat::Bgra8, 2, 1));

        Bgra8Converter::new().convert(&surface, &mut buffer).unwrap();
        assert_eq!(&buffer[..], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_bgra_honors_row_alignment() {
        let mut surface = RasterSurface::new(Size::new(2, 2));
        surface
            .data_mut()
            .copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]);
        let mut buffer = acquire(packed(PixelFormat::Bgra8, 2, 2).with_row_alignment(16));
        assert_eq!(buffer.len(), 32);

        Bgra8Converter::new().convert(&surface, &mut buffer).unwrap();
        assert_eq!(&buffer[0..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&buffer[16..24], &[9, 10, 11, 12, 13, 14, 15, 16]);
        // Padding bytes stay zeroed.
        assert!(buffer[8..16].iter().all(|&b| b == 0));
    }
}
