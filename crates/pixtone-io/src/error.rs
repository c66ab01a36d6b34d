//! I/O error types
//!
//! Provides a unified error type for BMP decoding and encoding, so that
//! callers only need to handle one error type. Every variant carries
//! enough context to build a user-facing message.

use thiserror::Error;

/// Error type for image I/O operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data does not start with the BMP magic bytes
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// A header field is non-positive, inconsistent, or runs past the data
    #[error("corrupt header field '{field}': {reason}")]
    CorruptHeader { field: &'static str, reason: String },

    /// The file is a BMP variant this decoder does not handle
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An error from the core library (e.g. invalid buffer geometry)
    #[error("core error: {0}")]
    Core(#[from] pixtone_core::Error),
}

impl IoError {
    pub(crate) fn corrupt(field: &'static str, reason: impl Into<String>) -> Self {
        IoError::CorruptHeader {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
