//! pixtone-test - Regression test framework for pixtone
//!
//! Provides a regression test harness in the style of regutils:
//! every check bumps an index, failures are recorded instead of
//! panicking, and `cleanup()` reports the overall result.
//!
//! # Usage
//!
//! ```ignore
//! use pixtone_test::RegParams;
//!
//! let mut rp = RegParams::new("luminance");
//! rp.compare_values(76.0, red_luma as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "compare" (default) or "display"
//! - `RUST_LOG`: filter for the test log subscriber (default `info`)

mod error;
pub mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use fixtures::BmpFixture;
pub use params::{RegParams, RegTestMode};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
