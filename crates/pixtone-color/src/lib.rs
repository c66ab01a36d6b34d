//! pixtone-color - Luminance conversion and dithering
//!
//! - **Color space conversion** ([`colorspace`]): RGB to luminance, channel
//!   extraction, 4-byte row alignment
//! - **Dithering** ([`dither`]): ordered dithering with 2x2, 4x4, and 8x8
//!   Bayer matrices

pub mod colorspace;
pub mod dither;
pub mod error;

// Re-export core types
pub use pixtone_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export color space functions
pub use colorspace::{
    // Constants
    LUMA_BLUE,
    LUMA_GREEN,
    LUMA_RED,
    // Functions
    extract_channel,
    rgb_to_luminance,
    to_aligned,
    to_luminance,
};

// Re-export dithering types and functions
pub use dither::{DitherLevel, ordered_dither, ordered_dither_level};
