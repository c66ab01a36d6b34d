//! Synthetic test inputs
//!
//! Buffers and BMP byte streams built in code, so regression tests carry
//! no binary assets. BMP streams are assembled field by field rather than
//! through the workspace encoder, which keeps decoder tests independent of
//! the code they check.

use crate::error::TestResult;
use pixtone_core::{ChannelLayout, PixelBuffer};

/// Create a uniform gray buffer
pub fn uniform_gray(val: u8, w: u32, h: u32) -> TestResult<PixelBuffer> {
    Ok(PixelBuffer::from_raw(
        w,
        h,
        ChannelLayout::Gray,
        vec![val; (w * h) as usize],
    )?)
}

/// Create a uniform RGB buffer
pub fn uniform_rgb(r: u8, g: u8, b: u8, w: u32, h: u32) -> TestResult<PixelBuffer> {
    let data = [r, g, b].repeat((w * h) as usize);
    Ok(PixelBuffer::from_raw(w, h, ChannelLayout::Rgb, data)?)
}

/// Create a horizontal gray gradient (0 at the left edge toward 255)
pub fn gradient_gray(w: u32, h: u32) -> TestResult<PixelBuffer> {
    let mut data = Vec::with_capacity((w * h) as usize);
    for _ in 0..h {
        for x in 0..w {
            data.push(((x as f32 / w as f32) * 255.0) as u8);
        }
    }
    Ok(PixelBuffer::from_raw(w, h, ChannelLayout::Gray, data)?)
}

/// Create an RGB test pattern: red ramps with x, green with y, blue with
/// a checkerboard-modulated diagonal
pub fn pattern_rgb(w: u32, h: u32) -> TestResult<PixelBuffer> {
    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            data.push(((x * 255) / w.max(2).saturating_sub(1)).min(255) as u8);
            data.push(((y * 255) / h.max(2).saturating_sub(1)).min(255) as u8);
            let diag = ((x + y) * 37 % 256) as u8;
            data.push(if (x + y) % 2 == 0 { diag } else { 255 - diag });
        }
    }
    Ok(PixelBuffer::from_raw(w, h, ChannelLayout::Rgb, data)?)
}

/// Hand-assembled 24-bit BMP byte stream.
///
/// Pixels are given top row first in (R, G, B) order; [`BmpFixture::bytes`]
/// stores them bottom-up in (B, G, R) order with 4-byte row padding, as the
/// format requires.
#[derive(Debug, Clone)]
pub struct BmpFixture {
    /// Declared width
    pub width: i32,
    /// Declared height
    pub height: i32,
    /// Info header size (40, 108, 124)
    pub info_header_size: u32,
    /// Extra bytes between the info header and the pixel data
    pub gap: usize,
    /// Bits per pixel field
    pub bits_per_pixel: u16,
    /// Top-down RGB triples, `width * height` of them
    pub pixels: Vec<(u8, u8, u8)>,
    /// Value written into every row padding byte
    pub padding_fill: u8,
}

impl BmpFixture {
    /// A minimal 40-byte-header fixture
    pub fn new(width: i32, height: i32, pixels: Vec<(u8, u8, u8)>) -> Self {
        Self {
            width,
            height,
            info_header_size: 40,
            gap: 0,
            bits_per_pixel: 24,
            pixels,
            padding_fill: 0,
        }
    }

    /// Use a larger info header (e.g. 108 for V4, 124 for V5)
    pub fn with_info_header_size(mut self, size: u32) -> Self {
        self.info_header_size = size;
        self
    }

    /// Insert `gap` bytes before the pixel data
    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    /// Fill row padding with a nonzero marker
    pub fn with_padding_fill(mut self, fill: u8) -> Self {
        self.padding_fill = fill;
        self
    }

    /// Declare a different bit depth
    pub fn with_bits_per_pixel(mut self, bpp: u16) -> Self {
        self.bits_per_pixel = bpp;
        self
    }

    /// Offset of the first pixel byte
    pub fn data_offset(&self) -> usize {
        14 + self.info_header_size as usize + self.gap
    }

    /// Serialize to BMP bytes
    pub fn bytes(&self) -> Vec<u8> {
        let offset = self.data_offset();
        let mut v = Vec::with_capacity(offset + self.pixels.len() * 4);
        v.extend_from_slice(b"BM");
        v.extend_from_slice(&0u32.to_le_bytes()); // patched below
        v.extend_from_slice(&[0u8; 4]);
        v.extend_from_slice(&(offset as u32).to_le_bytes());
        v.extend_from_slice(&self.info_header_size.to_le_bytes());
        v.extend_from_slice(&self.width.to_le_bytes());
        v.extend_from_slice(&self.height.to_le_bytes());
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        v.resize(offset, 0);

        if self.width > 0 && self.height > 0 {
            let w = self.width as usize;
            let pad = (4 - (w * 3) % 4) % 4;
            for row in self.pixels.chunks(w).rev() {
                for &(r, g, b) in row {
                    v.extend_from_slice(&[b, g, r]);
                }
                v.extend(std::iter::repeat_n(self.padding_fill, pad));
            }
        }

        let size = v.len() as u32;
        v[2..6].copy_from_slice(&size.to_le_bytes());
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_layout() {
        let bytes = BmpFixture::new(1, 2, vec![(1, 2, 3), (4, 5, 6)]).bytes();
        assert_eq!(bytes.len(), 54 + 8);
        // Bottom row first, BGR, one padding byte
        assert_eq!(&bytes[54..58], &[6, 5, 4, 0]);
        assert_eq!(&bytes[58..62], &[3, 2, 1, 0]);
        assert_eq!(u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]), 62);
    }

    #[test]
    fn test_uniform_and_gradient() {
        let g = uniform_gray(9, 3, 2).unwrap();
        assert!(g.data().iter().all(|&v| v == 9));
        let rgb = uniform_rgb(1, 2, 3, 2, 2).unwrap();
        assert_eq!(rgb.get_rgb(1, 1), Some((1, 2, 3)));
        let grad = gradient_gray(4, 1).unwrap();
        assert_eq!(grad.data(), &[0, 63, 127, 191]);
    }
}
