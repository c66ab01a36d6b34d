//! Color space conversion
//!
//! RGB to luminance, channel extraction, and 4-byte row alignment for
//! consumers that need it.
//!
//! Luminance uses the ITU-R BT.601 weights in integer thousandths, so the
//! result rounds half up exactly with no floating-point drift:
//!
//! ```text
//! L = (299 * R + 587 * G + 114 * B + 500) / 1000
//! ```

use crate::{ColorError, ColorResult};
use pixtone_core::{ChannelLayout, PixelBuffer, PixelBufferMut};
use tracing::debug;

/// Red weight, in thousandths
pub const LUMA_RED: u32 = 299;
/// Green weight, in thousandths
pub const LUMA_GREEN: u32 = 587;
/// Blue weight, in thousandths
pub const LUMA_BLUE: u32 = 114;

/// Row alignment used by [`to_aligned`], in bytes.
pub const ROW_ALIGNMENT: usize = 4;

/// Convert one RGB pixel to luminance.
///
/// # Examples
///
/// ```
/// use pixtone_color::rgb_to_luminance;
///
/// assert_eq!(rgb_to_luminance(255, 0, 0), 76);
/// assert_eq!(rgb_to_luminance(255, 255, 255), 255);
/// ```
#[inline]
pub fn rgb_to_luminance(r: u8, g: u8, b: u8) -> u8 {
    let sum = LUMA_RED * u32::from(r) + LUMA_GREEN * u32::from(g) + LUMA_BLUE * u32::from(b);
    ((sum + 500) / 1000).min(255) as u8
}

/// Convert an RGB buffer to a single-channel luminance buffer.
///
/// The result has the same width and height and no row padding. Padding
/// in the input is ignored.
///
/// # Errors
///
/// Returns [`ColorError::UnsupportedLayout`] for a gray input.
pub fn to_luminance(pix: &PixelBuffer) -> ColorResult<PixelBuffer> {
    if pix.layout() != ChannelLayout::Rgb {
        return Err(ColorError::UnsupportedLayout {
            expected: "RGB",
            actual: pix.layout(),
        });
    }
    debug!(
        width = pix.width(),
        height = pix.height(),
        "converting to luminance"
    );

    let mut out = PixelBufferMut::new(pix.width(), pix.height(), ChannelLayout::Gray)?;
    for y in 0..pix.height() {
        let src = pix.row_pixels(y);
        let dst = out.row_pixels_mut(y);
        for (d, rgb) in dst.iter_mut().zip(src.chunks_exact(3)) {
            *d = rgb_to_luminance(rgb[0], rgb[1], rgb[2]);
        }
    }
    Ok(out.into())
}

/// Copy a buffer so every row is padded with zeros to a multiple of 4 bytes.
///
/// The channel layout is unchanged. An already aligned unpadded buffer is
/// returned as a cheap clone with its stride untouched.
pub fn to_aligned(pix: &PixelBuffer) -> ColorResult<PixelBuffer> {
    let row_bytes = pix.row_bytes();
    let stride = row_bytes.div_ceil(ROW_ALIGNMENT) * ROW_ALIGNMENT;
    if pix.stride() == stride {
        return Ok(pix.clone());
    }
    debug!(
        width = pix.width(),
        height = pix.height(),
        from = pix.stride(),
        to = stride,
        "aligning rows"
    );

    let template = PixelBuffer::with_stride(pix.width(), pix.height(), pix.layout(), stride)?;
    let mut out = template.to_mut();
    for y in 0..pix.height() {
        out.row_pixels_mut(y).copy_from_slice(pix.row_pixels(y));
    }
    Ok(out.into())
}

/// Extract one channel as an unpadded gray buffer.
///
/// # Errors
///
/// Returns [`ColorError::Core`] wrapping `ChannelOutOfRange` for a bad
/// index.
pub fn extract_channel(pix: &PixelBuffer, channel: usize) -> ColorResult<PixelBuffer> {
    pix.check_channel(channel)?;
    let nch = pix.channels();
    let mut out = PixelBufferMut::new(pix.width(), pix.height(), ChannelLayout::Gray)?;
    for y in 0..pix.height() {
        let src = pix.row_pixels(y);
        for (d, px) in out.row_pixels_mut(y).iter_mut().zip(src.chunks_exact(nch)) {
            *d = px[channel];
        }
    }
    Ok(out.into())
}
