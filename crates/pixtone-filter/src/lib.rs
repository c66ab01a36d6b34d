//! pixtone-filter - Tone adjustment
//!
//! - **Levels** ([`levels`]): input/output ranges with gamma, per channel or
//!   for all channels at once, and min/max normalization
//! - **Auto level** ([`autolevel`]): levels parameters derived from the
//!   luminance histogram

pub mod autolevel;
pub mod error;
pub mod levels;

// Re-export core types
pub use pixtone_core;

// Re-export error types
pub use error::{FilterError, FilterResult};

// Re-export levels types and functions
pub use levels::{
    // Types
    MAX_GAMMA,
    MIN_GAMMA,
    ToneCurveParameters,
    TrcLut,
    // Functions
    adjust,
    adjust_all,
    adjust_channels,
    levels_trc,
    normalize,
    trc_map,
    trc_map_channel,
};

// Re-export auto-level types and functions
pub use autolevel::{
    AutoLevel, AutoLevelOptions, DEFAULT_CUT_RATE, auto_level, compute_parameters,
    compute_parameters_with_options,
};
