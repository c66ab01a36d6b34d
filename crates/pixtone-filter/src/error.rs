//! Error types for pixtone-filter

use thiserror::Error;

/// Errors that can occur during tone adjustment
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixtone_core::Error),

    /// Color conversion error
    #[error("color error: {0}")]
    Color(#[from] pixtone_color::ColorError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
