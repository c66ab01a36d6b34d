//! PixelBuffer - The main image container
//!
//! `PixelBuffer` is the fundamental image type in pixtone: a dense,
//! row-major array of 8-bit samples.
//!
//! # Sample layout
//!
//! - Samples are stored one byte each, interleaved per pixel
//! - RGB buffers store (R, G, B) in that order
//! - Each row occupies `stride` bytes; bytes past `width * channels`
//!   are alignment padding, always zero and never read as pixel data
//!
//! # Ownership model
//!
//! `PixelBuffer` uses `Arc` for cheap cloning (shared ownership).
//! To modify sample data, convert to `PixelBufferMut` via
//! [`PixelBuffer::try_into_mut`] or [`PixelBuffer::to_mut`], then convert
//! back with `Into<PixelBuffer>`. No operation in the workspace mutates a
//! buffer it was handed; transforms build a fresh `PixelBufferMut` and
//! return it frozen.

mod access;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Number and meaning of the samples stored per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ChannelLayout {
    /// Single-channel luminance
    Gray = 1,
    /// Three channels, (R, G, B) order
    Rgb = 3,
}

impl ChannelLayout {
    /// Get the number of samples per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        self as usize
    }
}

/// Internal buffer data
#[derive(Debug)]
struct BufferData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Samples per pixel
    layout: ChannelLayout,
    /// Bytes per row, including padding
    stride: usize,
    /// The sample data, `stride * height` bytes
    data: Vec<u8>,
}

impl BufferData {
    fn zeroed(width: u32, height: u32, layout: ChannelLayout, stride: usize) -> Self {
        BufferData {
            width,
            height,
            layout,
            stride,
            data: vec![0u8; stride * height as usize],
        }
    }

    #[inline]
    fn row_bytes(&self) -> usize {
        self.width as usize * self.layout.channels()
    }
}

/// Check geometry shared by every constructor.
fn validate_geometry(width: u32, height: u32, layout: ChannelLayout, stride: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    let min = width as usize * layout.channels();
    if stride < min {
        return Err(Error::InvalidStride { stride, min });
    }
    // Allocation size must fit in isize
    let fits = stride
        .checked_mul(height as usize)
        .is_some_and(|len| len <= isize::MAX as usize);
    if !fits {
        return Err(Error::InvalidDimension { width, height });
    }
    Ok(())
}

/// Immutable pixel buffer with shared storage.
///
/// # Examples
///
/// ```
/// use pixtone_core::{ChannelLayout, PixelBuffer};
///
/// let buf = PixelBuffer::new(64, 48, ChannelLayout::Rgb).unwrap();
/// assert_eq!(buf.width(), 64);
/// assert_eq!(buf.stride(), 64 * 3);
/// ```
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    inner: Arc<BufferData>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer with no row padding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or the
    /// sample data would be too large to allocate.
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Result<Self> {
        Self::with_stride(width, height, layout, width as usize * layout.channels())
    }

    /// Create a zero-filled buffer with an explicit row stride.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0 or the
    /// data would be too large to allocate, or [`Error::InvalidStride`] if `stride < width * channels`.
    pub fn with_stride(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        stride: usize,
    ) -> Result<Self> {
        validate_geometry(width, height, layout, stride)?;
        Ok(PixelBuffer {
            inner: Arc::new(BufferData::zeroed(width, height, layout, stride)),
        })
    }

    /// Wrap raw, unpadded sample data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] unless
    /// `data.len() == width * height * channels`.
    pub fn from_raw(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        let stride = width as usize * layout.channels();
        validate_geometry(width, height, layout, stride)?;
        let expected = stride * height as usize;
        if data.len() != expected {
            return Err(Error::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(PixelBuffer {
            inner: Arc::new(BufferData {
                width,
                height,
                layout,
                stride,
                data,
            }),
        })
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel layout.
    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.inner.layout
    }

    /// Get the number of samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.inner.layout.channels()
    }

    /// Get the number of bytes per row, padding included.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.stride
    }

    /// Get the number of pixel bytes per row, padding excluded.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.inner.row_bytes()
    }

    /// Check whether rows carry alignment padding.
    #[inline]
    pub fn is_padded(&self) -> bool {
        self.inner.stride != self.inner.row_bytes()
    }

    /// Get the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.inner.width) * u64::from(self.inner.height)
    }

    /// Get raw access to the sample data, padding included.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get a full row, padding included.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.inner.stride;
        &self.inner.data[start..start + self.inner.stride]
    }

    /// Get the pixel bytes of a row, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_pixels(&self, y: u32) -> &[u8] {
        let start = y as usize * self.inner.stride;
        &self.inner.data[start..start + self.inner.row_bytes()]
    }

    /// Iterate over the pixel bytes of every row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let row_bytes = self.inner.row_bytes();
        self.inner
            .data
            .chunks_exact(self.inner.stride)
            .map(move |row| &row[..row_bytes])
    }

    /// Check if two buffers have the same width, height, and layout.
    pub fn sizes_equal(&self, other: &PixelBuffer) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.layout == other.inner.layout
    }

    /// Check that `channel` addresses a sample of this layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelOutOfRange`] otherwise.
    pub fn check_channel(&self, channel: usize) -> Result<()> {
        let channels = self.channels();
        if channel >= channels {
            return Err(Error::ChannelOutOfRange { channel, channels });
        }
        Ok(())
    }

    /// Create a zero-filled buffer with the same geometry and stride.
    pub fn create_template(&self) -> PixelBufferMut {
        PixelBufferMut {
            inner: BufferData::zeroed(
                self.inner.width,
                self.inner.height,
                self.inner.layout,
                self.inner.stride,
            ),
        }
    }

    /// Copy this buffer into a new one whose stride equals its row bytes.
    ///
    /// Returns a cheap clone if the buffer is already unpadded.
    pub fn to_unpadded(&self) -> PixelBuffer {
        if !self.is_padded() {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.row_bytes() * self.inner.height as usize);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        PixelBuffer {
            inner: Arc::new(BufferData {
                width: self.inner.width,
                height: self.inner.height,
                layout: self.inner.layout,
                stride: self.inner.row_bytes(),
                data,
            }),
        }
    }

    /// Create a deep copy of this buffer.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        PixelBuffer {
            inner: Arc::new(self.copy_data()),
        }
    }

    /// Get the number of strong references to this buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Try to get mutable access to the sample data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PixelBufferMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixelBufferMut { inner: data }),
            Err(arc) => Err(PixelBuffer { inner: arc }),
        }
    }

    /// Create a mutable copy of this buffer.
    ///
    /// Always copies; the source is left untouched.
    pub fn to_mut(&self) -> PixelBufferMut {
        PixelBufferMut {
            inner: self.copy_data(),
        }
    }

    fn copy_data(&self) -> BufferData {
        BufferData {
            width: self.inner.width,
            height: self.inner.height,
            layout: self.inner.layout,
            stride: self.inner.stride,
            data: self.inner.data.clone(),
        }
    }
}

/// Mutable pixel buffer
///
/// Allows modification of sample data. Convert back to an immutable
/// [`PixelBuffer`] using `Into<PixelBuffer>`. Writes only ever reach pixel
/// columns, so padding bytes keep their zero value.
#[derive(Debug)]
pub struct PixelBufferMut {
    inner: BufferData,
}

impl PixelBufferMut {
    /// Create a zero-filled mutable buffer with no row padding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0, or the
    /// sample data would be too large to allocate.
    pub fn new(width: u32, height: u32, layout: ChannelLayout) -> Result<Self> {
        let stride = width as usize * layout.channels();
        validate_geometry(width, height, layout, stride)?;
        Ok(PixelBufferMut {
            inner: BufferData::zeroed(width, height, layout, stride),
        })
    }

    /// Get the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel layout.
    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.inner.layout
    }

    /// Get the number of samples per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.inner.layout.channels()
    }

    /// Get the number of bytes per row, padding included.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.stride
    }

    /// Get the number of pixel bytes per row, padding excluded.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.inner.row_bytes()
    }

    /// Get the pixel bytes of a row, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_pixels(&self, y: u32) -> &[u8] {
        let start = y as usize * self.inner.stride;
        &self.inner.data[start..start + self.inner.row_bytes()]
    }

    /// Get the pixel bytes of a row for writing, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_pixels_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.inner.stride;
        let row_bytes = self.inner.row_bytes();
        &mut self.inner.data[start..start + row_bytes]
    }
}

impl From<PixelBufferMut> for PixelBuffer {
    fn from(buf: PixelBufferMut) -> Self {
        PixelBuffer {
            inner: Arc::new(buf.inner),
        }
    }
}
