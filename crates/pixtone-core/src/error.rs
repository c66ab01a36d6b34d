//! Error types for pixtone-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.
//!
//! Shape errors here are caller contract violations: a buffer constructed
//! with impossible geometry, or a channel index past the buffer's layout.

use thiserror::Error;

/// pixtone core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid buffer dimensions
    #[error("invalid buffer dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Row stride shorter than the pixel data it must hold
    #[error("invalid stride {stride}: rows need at least {min} bytes")]
    InvalidStride { stride: usize, min: usize },

    /// Channel index outside the buffer layout
    #[error("channel {channel} out of range for {channels}-channel buffer")]
    ChannelOutOfRange { channel: usize, channels: usize },

    /// Raw data length does not match the declared geometry
    #[error("data length mismatch: expected {expected} bytes, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Invalid argument value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for pixtone core operations
pub type Result<T> = std::result::Result<T, Error>;
