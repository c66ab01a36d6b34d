//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur during regression testing
#[derive(Debug, Error)]
pub enum TestError {
    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Buffer comparison failed
    #[error("buffer comparison failed at index {index}: {reason}")]
    BufferMismatch { index: usize, reason: String },

    /// Fixture construction failed
    #[error("fixture error: {0}")]
    Fixture(#[from] pixtone_core::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
