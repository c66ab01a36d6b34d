//! pixtone Core - Basic data structures for pixel processing
//!
//! This crate provides the fundamental data structures used throughout
//! the pixtone image engine:
//!
//! - [`PixelBuffer`] / [`PixelBufferMut`] - The main image container (immutable / mutable)
//! - [`ChannelLayout`] - Gray (1 sample) or RGB (3 samples) per pixel
//! - [`Histogram`] / [`ChannelHistogram`] - 256-bin value counts per channel
//! - Entropy and Huffman code-length statistics over histograms
//!
//! Every type here is plain data; nothing holds state between calls.

pub mod buffer;
pub mod error;
pub mod histogram;

pub use buffer::{ChannelLayout, PixelBuffer, PixelBufferMut};
pub use error::{Error, Result};
pub use histogram::entropy::entropy;
pub use histogram::huffman::{average_huffman_length, huffman_code_lengths};
pub use histogram::{ChannelHistogram, Histogram, NUM_LEVELS};

/// Channel indices for RGB buffers.
pub mod color {
    /// Red channel
    pub const RED: usize = 0;
    /// Green channel
    pub const GREEN: usize = 1;
    /// Blue channel
    pub const BLUE: usize = 2;
}

/// Compute the per-channel histogram of `buffer`.
///
/// Padding columns are skipped.
pub fn histogram(buffer: &PixelBuffer) -> Histogram {
    Histogram::from_buffer(buffer)
}
