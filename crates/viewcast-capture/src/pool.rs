//! Descriptor-keyed pixel buffer pool.
//!
//! The pool owns pre-allocated buffers matching exactly one descriptor
//! at a time. Reconfiguring invalidates every pooled buffer; buffers
//! are never resized in place. Allocation is lazy: the
//! first `acquire()` after a (re)configuration pays the allocation
//! cost, steady-state acquisitions reuse returned buffers.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace};

use viewcast_core::Size;

use crate::error::PoolError;
use crate::POOL_DEPTH;

/// Pixel format of a pooled buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Planar Y + interleaved UV, 4:2:0.
    Nv12,

    /// Packed 8-bit BGRA.
    Bgra8,
}

/// The tuple a pooled buffer must match to be reused. Width and height
/// are in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescriptor {
    /// Pixel format.
    pub format: PixelFormat,

    /// Buffer width in pixels.
    pub width: u32,

    /// Buffer height in pixels.
    pub height: u32,

    /// Row stride alignment in bytes. 1 means packed rows.
    pub row_alignment: u32,
}

impl BufferDescriptor {
    /// Compute the descriptor for a target's logical size at a scale
    /// factor, with packed rows.
    pub fn for_target(logical: Size, scale: f32, format: PixelFormat) -> Self {
        let pixels = logical.scaled(scale);
        Self {
            format,
            width: pixels.width,
            height: pixels.height,
            row_alignment: 1,
        }
    }

    /// Same descriptor with rows padded to `alignment` bytes, for
    /// consumers that require aligned strides.
    pub fn with_row_alignment(self, alignment: u32) -> Self {
        Self {
            row_alignment: alignment.max(1),
            ..self
        }
    }

    fn align(&self, row_bytes: usize) -> usize {
        let alignment = self.row_alignment.max(1) as usize;
        row_bytes.div_ceil(alignment) * alignment
    }

    /// Bytes per row, alignment padding included. For NV12 this is the
    /// stride of both the Y plane and the interleaved UV plane.
    pub fn row_stride(&self) -> usize {
        match self.format {
            PixelFormat::Nv12 => self.align(self.width as usize),
            PixelFormat::Bgra8 => self.align(self.width as usize * 4),
        }
    }

    /// Byte length of one conforming buffer.
    pub fn byte_len(&self) -> usize {
        let stride = self.row_stride();
        let height = self.height as usize;
        match self.format {
            // Y plane plus half-height interleaved UV plane.
            PixelFormat::Nv12 => stride * height + stride * (height / 2),
            PixelFormat::Bgra8 => stride * height,
        }
    }

    /// Pixel dimensions as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

struct PoolInner {
    descriptor: Option<BufferDescriptor>,
    free: Vec<Vec<u8>>,
    outstanding: usize,
    generation: u64,
}

struct PoolShared {
    inner: Mutex<PoolInner>,
    depth: usize,
}

/// A reusable set of pixel buffers conforming to one descriptor.
///
/// Clones share the same underlying pool.
#[derive(Clone)]
pub struct PixelBufferPool {
    shared: Arc<PoolShared>,
}

impl PixelBufferPool {
    /// Create a pool with the default depth.
    pub fn new() -> Self {
        Self::with_depth(POOL_DEPTH)
    }

    /// Create a pool holding at most `depth` buffers.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            shared: Arc::new(PoolShared {
                inner: Mutex::new(PoolInner {
                    descriptor: None,
                    free: Vec::new(),
                    outstanding: 0,
                    generation: 0,
                }),
                depth: depth.max(1),
            }),
        }
    }

    /// Replace the active descriptor and invalidate all pooled buffers.
    ///
    /// Cheap: no allocation happens here. Buffers still checked out
    /// under the old descriptor are freed when dropped rather than
    /// returned. Configuring with the identical descriptor is a no-op.
    pub fn configure(&self, descriptor: BufferDescriptor) {
        let mut inner = self.shared.inner.lock();
        if inner.descriptor == Some(descriptor) {
            return;
        }

        debug!(
            width = descriptor.width,
            height = descriptor.height,
            format = ?descriptor.format,
            "Configuring buffer pool"
        );

        inner.descriptor = Some(descriptor);
        inner.free.clear();
        inner.outstanding = 0;
        inner.generation += 1;
    }

    /// Drop the descriptor and all pooled buffers, forcing a full
    /// reconfiguration on the next acquisition.
    pub fn reset(&self) {
        let mut inner = self.shared.inner.lock();
        inner.descriptor = None;
        inner.free.clear();
        inner.outstanding = 0;
        inner.generation += 1;
    }

    /// Acquire a buffer matching the current descriptor.
    ///
    /// Reuses a pooled buffer when one is available; otherwise
    /// allocates, up to the pool depth. The handle returns its buffer
    /// to the pool on drop, unless the pool was reconfigured in the
    /// meantime.
    pub fn acquire(&self) -> Result<PixelBufferHandle, PoolError> {
        let mut inner = self.shared.inner.lock();
        let descriptor = inner.descriptor.ok_or(PoolError::Unconfigured)?;

        let data = if let Some(data) = inner.free.pop() {
            data
        } else if inner.outstanding < self.shared.depth {
            trace!(bytes = descriptor.byte_len(), "Allocating pool buffer");
            vec![0u8; descriptor.byte_len()]
        } else {
            return Err(PoolError::Exhausted);
        };

        inner.outstanding += 1;

        Ok(PixelBufferHandle {
            data,
            descriptor,
            generation: inner.generation,
            pool: Arc::downgrade(&self.shared),
        })
    }

    /// The pool's last-known descriptor, if configured.
    pub fn descriptor(&self) -> Option<BufferDescriptor> {
        self.shared.inner.lock().descriptor
    }

    /// Number of buffers currently sitting in the pool.
    pub fn pooled(&self) -> usize {
        self.shared.inner.lock().free.len()
    }
}

impl Default for PixelBufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// An acquired pixel buffer. Derefs to the pixel bytes.
///
/// Dropping the handle returns the buffer to the pool it came from,
/// provided the pool still has the same descriptor; a stale buffer is
/// freed instead.
#[derive(Debug)]
pub struct PixelBufferHandle {
    data: Vec<u8>,
    descriptor: BufferDescriptor,
    generation: u64,
    pool: Weak<PoolShared>,
}

impl PixelBufferHandle {
    /// The descriptor this buffer conforms to.
    pub fn descriptor(&self) -> BufferDescriptor {
        self.descriptor
    }
}

impl Deref for PixelBufferHandle {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for PixelBufferHandle {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for PixelBufferHandle {
    fn drop(&mut self) {
        let data = std::mem::take(&mut self.data);
        if let Some(shared) = self.pool.upgrade() {
            let mut inner = shared.inner.lock();
            if inner.generation == self.generation {
                inner.outstanding = inner.outstanding.saturating_sub(1);
                if inner.free.len() < shared.depth {
                    inner.free.push(data);
                }
            }
            // Generation mismatch: the pool was reconfigured while this
            // buffer was out, so it no longer matches the descriptor and
            // is freed here.
        }
    }
}
