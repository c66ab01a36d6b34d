//! Error types for pixtone-color

use pixtone_core::ChannelLayout;
use thiserror::Error;

/// Errors that can occur during color processing operations
#[derive(Debug, Error)]
pub enum ColorError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixtone_core::Error),

    /// Buffer layout not accepted by this operation
    #[error("unsupported layout: expected {expected}, got {actual:?}")]
    UnsupportedLayout {
        expected: &'static str,
        actual: ChannelLayout,
    },

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;
