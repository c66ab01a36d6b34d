//! pixtone - Pixel-processing engine for 8-bit raster images
//!
//! # Overview
//!
//! - BMP decoding and encoding (uncompressed 24-bit)
//! - Luminance conversion and row alignment
//! - Ordered dithering with 2x2, 4x4, and 8x8 Bayer matrices
//! - Levels/gamma tone adjustment and auto level
//! - Histogram statistics: entropy and average Huffman code length
//!
//! # Example
//!
//! ```
//! use pixtone::{ChannelLayout, PixelBuffer};
//! use pixtone::color::{DitherLevel, ordered_dither_level, to_luminance};
//! use pixtone::filter::{AutoLevelOptions, auto_level};
//!
//! let rgb = PixelBuffer::from_raw(2, 1, ChannelLayout::Rgb, vec![255, 0, 0, 0, 0, 255]).unwrap();
//! let luma = to_luminance(&rgb).unwrap();
//! assert_eq!(luma.data(), &[76, 29]);
//!
//! let dithered = ordered_dither_level(&luma, DitherLevel::Size2);
//! assert!(dithered.data().iter().all(|&v| v == 0 || v == 255));
//!
//! let leveled = auto_level(&rgb, &AutoLevelOptions::default()).unwrap();
//! assert_eq!(leveled.params.input_low(), 29);
//!
//! let h = pixtone::histogram(&luma);
//! assert_eq!(pixtone::entropy(&h), vec![1.0]);
//! ```

// Re-export core types (buffer, histogram, statistics)
pub use pixtone_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use pixtone_color as color;
pub use pixtone_filter as filter;
pub use pixtone_io as io;
