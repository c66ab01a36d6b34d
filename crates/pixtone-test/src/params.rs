//! Regression test parameters and operations

use crate::error::TestError;
use pixtone_core::PixelBuffer;
use tracing::{error, info};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed values with expectations (default)
    #[default]
    Compare,
    /// Compare, and also log every checked value
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, the index of the
/// current check, the mode, and every failure seen so far. Checks never
/// panic; call [`RegParams::cleanup`] at the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "bmpio")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Recorded failures
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// Installs the test log subscriber on first use and reads the mode
    /// from `REGTEST_MODE`.
    pub fn new(test_name: &str) -> Self {
        crate::init_test_logging();
        let mode = RegTestMode::from_env();
        info!(test = test_name, ?mode, "starting regression test");

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record(&mut self, failure: TestError) {
        error!(test = %self.test_name, "{failure}");
        self.failures.push(failure);
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        if self.display() {
            info!(index = self.index, expected, actual, "value");
        }
        // NaN never compares within delta
        if (expected - actual).abs() <= delta {
            return true;
        }
        self.record(TestError::ValueMismatch {
            index: self.index,
            expected,
            actual,
            delta,
        });
        false
    }

    /// Compare two buffers for identical geometry and pixel content
    ///
    /// Row padding is ignored; only pixel columns are compared.
    pub fn compare_buffers(&mut self, buf1: &PixelBuffer, buf2: &PixelBuffer) -> bool {
        self.index += 1;

        if !buf1.sizes_equal(buf2) {
            self.record(TestError::BufferMismatch {
                index: self.index,
                reason: format!(
                    "geometry {}x{}x{} vs {}x{}x{}",
                    buf1.width(),
                    buf1.height(),
                    buf1.channels(),
                    buf2.width(),
                    buf2.height(),
                    buf2.channels()
                ),
            });
            return false;
        }

        for y in 0..buf1.height() {
            let (r1, r2) = (buf1.row_pixels(y), buf2.row_pixels(y));
            if let Some(i) = r1.iter().zip(r2).position(|(a, b)| a != b) {
                let ch = buf1.channels();
                self.record(TestError::BufferMismatch {
                    index: self.index,
                    reason: format!(
                        "sample mismatch at ({}, {}) channel {}: {} vs {}",
                        i / ch,
                        y,
                        i % ch,
                        r1[i],
                        r2[i]
                    ),
                });
                return false;
            }
        }

        true
    }

    /// Compare two binary data arrays
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 == data2 {
            return true;
        }
        let reason = match data1.iter().zip(data2).position(|(a, b)| a != b) {
            Some(i) => format!("bytes differ at offset {i}"),
            None => format!("sizes: {} vs {}", data1.len(), data2.len()),
        };
        self.record(TestError::BufferMismatch {
            index: self.index,
            reason,
        });
        false
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            info!(test = %self.test_name, checks = self.index, "SUCCESS");
            true
        } else {
            error!(
                test = %self.test_name,
                failed = self.failures.len(),
                checks = self.index,
                "FAILURE"
            );
            for failure in &self.failures {
                eprintln!("  {}_reg: {}", self.test_name, failure);
            }
            false
        }
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get list of failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}
