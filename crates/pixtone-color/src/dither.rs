//! Ordered dithering
//!
//! Quantizes every sample to 0 or 255 by comparing it against a tiled
//! Bayer threshold matrix. Each channel is dithered on its own, so a gray
//! buffer gives monochrome output and an RGB buffer gives colored output.

use crate::{ColorError, ColorResult};
use pixtone_core::PixelBuffer;
use tracing::debug;

const BAYER_2: [u8; 4] = [
    0, 2, //
    3, 1,
];

const BAYER_4: [u8; 16] = [
    0, 8, 2, 10, //
    12, 4, 14, 6, //
    3, 11, 1, 9, //
    15, 7, 13, 5,
];

const BAYER_8: [u8; 64] = [
    0, 32, 8, 40, 2, 34, 10, 42, //
    48, 16, 56, 24, 50, 18, 58, 26, //
    12, 44, 4, 36, 14, 46, 6, 38, //
    60, 28, 52, 20, 62, 30, 54, 22, //
    3, 35, 11, 43, 1, 33, 9, 41, //
    51, 19, 59, 27, 49, 17, 57, 25, //
    15, 47, 7, 39, 13, 45, 5, 37, //
    63, 31, 55, 23, 61, 29, 53, 21,
];

/// Threshold matrix size for ordered dithering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DitherLevel {
    /// 2x2 matrix, 5 effective levels
    Size2,
    /// 4x4 matrix, 17 effective levels
    Size4,
    /// 8x8 matrix, 65 effective levels
    Size8,
}

impl DitherLevel {
    /// All levels, smallest first
    pub const ALL: [DitherLevel; 3] = [DitherLevel::Size2, DitherLevel::Size4, DitherLevel::Size8];

    /// Select a level from its matrix side length.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidArgument`] unless `size` is 2, 4, or 8.
    pub fn from_size(size: u32) -> ColorResult<Self> {
        match size {
            2 => Ok(DitherLevel::Size2),
            4 => Ok(DitherLevel::Size4),
            8 => Ok(DitherLevel::Size8),
            _ => Err(ColorError::InvalidArgument(format!(
                "dither matrix size must be 2, 4 or 8, got {size}"
            ))),
        }
    }

    /// Side length of the matrix
    #[inline]
    pub fn size(self) -> usize {
        match self {
            DitherLevel::Size2 => 2,
            DitherLevel::Size4 => 4,
            DitherLevel::Size8 => 8,
        }
    }

    /// Largest matrix entry, `size^2 - 1`
    #[inline]
    pub fn max_threshold(self) -> u32 {
        (self.size() * self.size() - 1) as u32
    }

    /// Row-major threshold matrix
    #[inline]
    pub fn matrix(self) -> &'static [u8] {
        match self {
            DitherLevel::Size2 => &BAYER_2,
            DitherLevel::Size4 => &BAYER_4,
            DitherLevel::Size8 => &BAYER_8,
        }
    }

    /// Threshold at row `i`, column `j`, tiled periodically
    #[inline]
    pub fn threshold(self, i: u32, j: u32) -> u8 {
        let n = self.size();
        self.matrix()[(i as usize % n) * n + j as usize % n]
    }
}

/// Ordered dithering with a numeric matrix size.
///
/// # Arguments
///
/// * `pix` - Gray or RGB buffer
/// * `matrix_size` - Matrix side length: 2, 4, or 8
///
/// # Errors
///
/// Returns [`ColorError::InvalidArgument`] for any other size.
pub fn ordered_dither(pix: &PixelBuffer, matrix_size: u32) -> ColorResult<PixelBuffer> {
    let level = DitherLevel::from_size(matrix_size)?;
    Ok(ordered_dither_level(pix, level))
}

/// Ordered dithering with a [`DitherLevel`].
///
/// A sample `v` at row `i`, column `j` becomes 255 when
/// `v * MAX / 255 > matrix[i % N][j % N]` and 0 otherwise, where
/// `MAX = N^2 - 1`. The comparison is done in integers as
/// `v * MAX > m * 255`, so it is exact.
///
/// The output keeps the input's geometry, layout, and stride.
///
/// # Examples
///
/// ```
/// use pixtone_color::{DitherLevel, ordered_dither_level};
/// use pixtone_core::{ChannelLayout, PixelBuffer};
///
/// let gray = PixelBuffer::from_raw(2, 2, ChannelLayout::Gray, vec![128; 4]).unwrap();
/// let out = ordered_dither_level(&gray, DitherLevel::Size2);
/// assert_eq!(out.data(), &[255, 0, 0, 255]);
/// ```
pub fn ordered_dither_level(pix: &PixelBuffer, level: DitherLevel) -> PixelBuffer {
    debug!(
        width = pix.width(),
        height = pix.height(),
        channels = pix.channels(),
        size = level.size(),
        "ordered dither"
    );

    let max = level.max_threshold();
    let nch = pix.channels();
    let mut out = pix.create_template();

    for y in 0..pix.height() {
        let src = pix.row_pixels(y);
        let dst = out.row_pixels_mut(y);
        for (x, (d_px, s_px)) in dst
            .chunks_exact_mut(nch)
            .zip(src.chunks_exact(nch))
            .enumerate()
        {
            let m = u32::from(level.threshold(y, x as u32)) * 255;
            for (d, &v) in d_px.iter_mut().zip(s_px) {
                *d = if u32::from(v) * max > m { 255 } else { 0 };
            }
        }
    }

    out.into()
}
