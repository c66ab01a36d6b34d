//! Automatic levels
//!
//! Derives a levels curve from the luminance histogram: the darkest and
//! brightest `cut_rate` fraction of pixels are clipped, and gamma is chosen
//! so the median luminance lands on mid-gray. The same curve is then applied
//! to every channel of the RGB image.

use crate::levels::{ToneCurveParameters, adjust_all, normalize};
use crate::{FilterError, FilterResult};
use pixtone_color::to_luminance;
use pixtone_core::{ChannelHistogram, PixelBuffer};
use tracing::debug;

/// Default fraction of pixels clipped at each end
pub const DEFAULT_CUT_RATE: f64 = 0.001;

/// Options for [`auto_level`]
#[derive(Debug, Clone, PartialEq)]
pub struct AutoLevelOptions {
    /// Fraction of pixels clipped at each end, in `[0, 0.5)`
    pub cut_rate: f64,
    /// Output value for the clipped low end
    pub output_low: u8,
    /// Output value for the clipped high end
    pub output_high: u8,
    /// Stretch the luminance to full range before taking its histogram
    pub stretch_luminance: bool,
}

impl Default for AutoLevelOptions {
    fn default() -> Self {
        Self {
            cut_rate: DEFAULT_CUT_RATE,
            output_low: 0,
            output_high: 255,
            stretch_luminance: false,
        }
    }
}

impl AutoLevelOptions {
    /// Set the clipping fraction
    pub fn with_cut_rate(mut self, cut_rate: f64) -> Self {
        self.cut_rate = cut_rate;
        self
    }

    /// Set the output range
    pub fn with_output(mut self, low: u8, high: u8) -> Self {
        self.output_low = low;
        self.output_high = high;
        self
    }

    /// Enable or disable the luminance pre-stretch
    pub fn with_stretch_luminance(mut self, stretch: bool) -> Self {
        self.stretch_luminance = stretch;
        self
    }

    fn validate(&self) -> FilterResult<()> {
        if !(0.0..0.5).contains(&self.cut_rate) {
            return Err(FilterError::InvalidArgument(format!(
                "cut_rate must be in [0, 0.5), got {}",
                self.cut_rate
            )));
        }
        if self.output_low > self.output_high {
            return Err(FilterError::InvalidArgument(format!(
                "output_low ({}) must not exceed output_high ({})",
                self.output_low, self.output_high
            )));
        }
        Ok(())
    }
}

/// Result of [`auto_level`]
#[derive(Debug, Clone)]
pub struct AutoLevel {
    /// Curve that was applied to every channel
    pub params: ToneCurveParameters,
    /// The adjusted image
    pub buffer: PixelBuffer,
}

/// Compute auto-level parameters with default options.
///
/// See [`compute_parameters_with_options`].
pub fn compute_parameters(hist: &ChannelHistogram) -> FilterResult<ToneCurveParameters> {
    compute_parameters_with_options(hist, &AutoLevelOptions::default())
}

/// Compute auto-level parameters from a luminance histogram.
///
/// With `total` samples and `cut = floor(total * cut_rate)`:
///
/// - `low` is the sample at rank `cut`
/// - `high` is the sample at rank `total - 1 - cut`
/// - `med` is the median (mean of the two middle ranks)
/// - `gamma = log_0.5(max(med - low, 1) / max(high - low, 1))`, clamped to
///   `[0.01, 9.99]`
///
/// # Errors
///
/// Returns [`FilterError::InvalidArgument`] for an empty histogram or
/// invalid options.
pub fn compute_parameters_with_options(
    hist: &ChannelHistogram,
    options: &AutoLevelOptions,
) -> FilterResult<ToneCurveParameters> {
    options.validate()?;
    let total = hist.total();
    if total == 0 {
        return Err(FilterError::InvalidArgument(
            "cannot compute levels from an empty histogram".into(),
        ));
    }

    let cut = (total as f64 * options.cut_rate).floor() as u64;
    let empty = || FilterError::InvalidArgument("histogram rank out of range".into());
    let low = hist.value_at_rank(cut).ok_or_else(empty)?;
    let high = hist.value_at_rank(total - 1 - cut).ok_or_else(empty)?;
    let med = hist.median().ok_or_else(empty)?;

    let below = (med - f64::from(low)).max(1.0);
    let span = f64::from(high - low).max(1.0);
    let gamma = (below / span).ln() / 0.5f64.ln();

    debug!(total, cut, low, high, med, gamma, "auto level parameters");

    ToneCurveParameters::new(low, gamma, high, options.output_low, options.output_high)
}

/// Run the whole auto-level pipeline on an RGB buffer.
///
/// Converts to luminance, optionally stretches it to `[0, 255]`, derives the
/// curve from its histogram and applies that curve to every channel.
///
/// # Errors
///
/// Returns [`FilterError::Color`] for a non-RGB input and
/// [`FilterError::InvalidArgument`] for invalid options.
pub fn auto_level(rgb: &PixelBuffer, options: &AutoLevelOptions) -> FilterResult<AutoLevel> {
    let mut luma = to_luminance(rgb)?;
    if options.stretch_luminance {
        luma = normalize(&luma, 0, 255)?;
    }
    let hist = luma.histogram();
    let channel = hist.try_channel(0)?;
    let params = compute_parameters_with_options(channel, options)?;
    let buffer = adjust_all(rgb, &params);
    Ok(AutoLevel { params, buffer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixtone_core::{ChannelLayout, NUM_LEVELS};

    fn hist_of(pairs: &[(u8, u64)]) -> ChannelHistogram {
        let mut counts = [0u64; NUM_LEVELS];
        for &(v, c) in pairs {
            counts[v as usize] = c;
        }
        ChannelHistogram::from_counts(counts)
    }

    #[test]
    fn test_constant_image() {
        let p = compute_parameters(&hist_of(&[(128, 1000)])).unwrap();
        assert_eq!(p.input_low(), 128);
        assert_eq!(p.input_high(), 128);
        assert_eq!(p.gamma(), 0.01);
        assert_eq!(p.output_low(), 0);
        assert_eq!(p.output_high(), 255);
    }

    #[test]
    fn test_cut_clips_outliers() {
        // 2000 samples: cut = 2 clips the two 0s and the two 255s
        let p = compute_parameters(&hist_of(&[(0, 2), (50, 998), (200, 998), (255, 2)])).unwrap();
        assert_eq!(p.input_low(), 50);
        assert_eq!(p.input_high(), 200);
        // med = (50 + 200) / 2 = 125 sits exactly halfway, so gamma is 1
        assert!((p.gamma() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dark_median_raises_gamma() {
        let p = compute_parameters(&hist_of(&[(0, 600), (255, 400)])).unwrap();
        assert_eq!(p.input_low(), 0);
        assert_eq!(p.input_high(), 255);
        // med = 0 -> max(0, 1) / 255 -> log_0.5(1/255) ~ 7.99
        assert!((p.gamma() - 255f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn test_zero_cut_rate() {
        let opts = AutoLevelOptions::default().with_cut_rate(0.0);
        let p = compute_parameters_with_options(&hist_of(&[(3, 1), (100, 10), (250, 1)]), &opts)
            .unwrap();
        assert_eq!(p.input_low(), 3);
        assert_eq!(p.input_high(), 250);
    }

    #[test]
    fn test_empty_histogram() {
        assert!(matches!(
            compute_parameters(&ChannelHistogram::default()),
            Err(FilterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invalid_options() {
        let h = hist_of(&[(1, 1)]);
        let opts = AutoLevelOptions::default().with_cut_rate(0.5);
        assert!(compute_parameters_with_options(&h, &opts).is_err());
        let opts = AutoLevelOptions::default().with_cut_rate(f64::NAN);
        assert!(compute_parameters_with_options(&h, &opts).is_err());
        let opts = AutoLevelOptions::default().with_output(10, 5);
        assert!(compute_parameters_with_options(&h, &opts).is_err());
    }

    #[test]
    fn test_auto_level_rejects_gray() {
        let gray = PixelBuffer::new(2, 2, ChannelLayout::Gray).unwrap();
        assert!(matches!(
            auto_level(&gray, &AutoLevelOptions::default()),
            Err(FilterError::Color(_))
        ));
    }
}
