//! Levels and gamma tone adjustment
//!
//! A tone curve maps input range `[input_low, input_high]` onto output range
//! `[output_low, output_high]` through a gamma power function:
//!
//! ```text
//! n = clamp((v - input_low) / (input_high - input_low), 0, 1)
//! c = n ^ (1 / gamma)
//! result = round(c * (output_high - output_low) + output_low)
//! ```
//!
//! Curves are materialized as a 256-entry TRC (tone reproduction curve)
//! lookup table and then mapped over the samples.

use crate::{FilterError, FilterResult};
use pixtone_core::{PixelBuffer, PixelBufferMut};
use tracing::debug;

/// Lookup table for tone reproduction curves.
///
/// Maps input sample values [0..255] to output sample values [0..255].
pub type TrcLut = [u8; 256];

/// Smallest accepted gamma
pub const MIN_GAMMA: f64 = 0.01;
/// Largest accepted gamma
pub const MAX_GAMMA: f64 = 9.99;

/// Parameters of one levels curve.
///
/// Invariants: `input_low <= input_high`, `output_low <= output_high`, and
/// `gamma` lies in `[MIN_GAMMA, MAX_GAMMA]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurveParameters {
    input_low: u8,
    gamma: f64,
    input_high: u8,
    output_low: u8,
    output_high: u8,
}

impl Default for ToneCurveParameters {
    fn default() -> Self {
        Self::identity()
    }
}

impl ToneCurveParameters {
    /// Create curve parameters.
    ///
    /// `gamma` is clamped into `[MIN_GAMMA, MAX_GAMMA]`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidArgument`] if `input_low > input_high`,
    /// `output_low > output_high`, or `gamma` is not finite.
    pub fn new(
        input_low: u8,
        gamma: f64,
        input_high: u8,
        output_low: u8,
        output_high: u8,
    ) -> FilterResult<Self> {
        if input_low > input_high {
            return Err(FilterError::InvalidArgument(format!(
                "input_low ({input_low}) must not exceed input_high ({input_high})"
            )));
        }
        if output_low > output_high {
            return Err(FilterError::InvalidArgument(format!(
                "output_low ({output_low}) must not exceed output_high ({output_high})"
            )));
        }
        if !gamma.is_finite() {
            return Err(FilterError::InvalidArgument(format!(
                "gamma must be finite, got {gamma}"
            )));
        }
        Ok(ToneCurveParameters {
            input_low,
            gamma: gamma.clamp(MIN_GAMMA, MAX_GAMMA),
            input_high,
            output_low,
            output_high,
        })
    }

    /// Curve parameters with the full output range `[0, 255]`.
    pub fn with_input(input_low: u8, gamma: f64, input_high: u8) -> FilterResult<Self> {
        Self::new(input_low, gamma, input_high, 0, 255)
    }

    /// The curve that leaves every value unchanged
    pub const fn identity() -> Self {
        ToneCurveParameters {
            input_low: 0,
            gamma: 1.0,
            input_high: 255,
            output_low: 0,
            output_high: 255,
        }
    }

    pub fn input_low(&self) -> u8 {
        self.input_low
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn input_high(&self) -> u8 {
        self.input_high
    }

    pub fn output_low(&self) -> u8 {
        self.output_low
    }

    pub fn output_high(&self) -> u8 {
        self.output_high
    }

    /// Normalized input position of `v`, in `[0, 1]`.
    ///
    /// A collapsed input range is a step at `input_low`.
    fn normalized(&self, v: u8) -> f64 {
        let (low, high) = (self.input_low, self.input_high);
        if low == high {
            return if v < low { 0.0 } else { 1.0 };
        }
        if v <= low {
            0.0
        } else if v >= high {
            1.0
        } else {
            f64::from(v - low) / f64::from(high - low)
        }
    }

    /// Map one sample through the curve.
    pub fn apply(&self, v: u8) -> u8 {
        let c = self.normalized(v).powf(1.0 / self.gamma);
        let span = f64::from(self.output_high - self.output_low);
        (c * span + f64::from(self.output_low))
            .round()
            .clamp(0.0, 255.0) as u8
    }
}

/// Generate the TRC lookup table for a levels curve.
///
/// # Examples
///
/// ```
/// use pixtone_filter::{ToneCurveParameters, levels_trc};
///
/// let lut = levels_trc(&ToneCurveParameters::with_input(64, 1.0, 192).unwrap());
/// assert_eq!(lut[64], 0);
/// assert_eq!(lut[128], 128);
/// assert_eq!(lut[192], 255);
/// ```
pub fn levels_trc(params: &ToneCurveParameters) -> TrcLut {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = params.apply(i as u8);
    }
    lut
}

/// Apply a TRC lookup table to every sample of a mutable buffer.
///
/// Padding bytes are not touched.
pub fn trc_map(pix: &mut PixelBufferMut, lut: &TrcLut) {
    for y in 0..pix.height() {
        for v in pix.row_pixels_mut(y) {
            *v = lut[*v as usize];
        }
    }
}

/// Apply a TRC lookup table to one channel of a mutable buffer.
///
/// # Errors
///
/// Returns [`FilterError::InvalidArgument`] if `channel` is out of range.
pub fn trc_map_channel(pix: &mut PixelBufferMut, channel: usize, lut: &TrcLut) -> FilterResult<()> {
    let nch = pix.channels();
    check_channel(channel, nch)?;
    for y in 0..pix.height() {
        for px in pix.row_pixels_mut(y).chunks_exact_mut(nch) {
            px[channel] = lut[px[channel] as usize];
        }
    }
    Ok(())
}

fn check_channel(channel: usize, channels: usize) -> FilterResult<()> {
    if channel >= channels {
        return Err(FilterError::InvalidArgument(format!(
            "channel {channel} out of range for {channels} channel(s)"
        )));
    }
    Ok(())
}

/// Adjust one channel with a levels curve.
///
/// Other channels are copied unchanged. The result is a new buffer with the
/// input's geometry and stride.
///
/// # Errors
///
/// Returns [`FilterError::InvalidArgument`] if `channel` is out of range.
pub fn adjust(
    pix: &PixelBuffer,
    channel: usize,
    params: &ToneCurveParameters,
) -> FilterResult<PixelBuffer> {
    check_channel(channel, pix.channels())?;
    debug!(
        channel,
        input_low = params.input_low,
        gamma = params.gamma,
        input_high = params.input_high,
        "levels adjust"
    );
    let lut = levels_trc(params);
    let mut out = pix.to_mut();
    trc_map_channel(&mut out, channel, &lut)?;
    Ok(out.into())
}

/// Adjust every channel with the same levels curve.
pub fn adjust_all(pix: &PixelBuffer, params: &ToneCurveParameters) -> PixelBuffer {
    debug!(
        channels = pix.channels(),
        input_low = params.input_low,
        gamma = params.gamma,
        input_high = params.input_high,
        "levels adjust, all channels"
    );
    let lut = levels_trc(params);
    let mut out = pix.to_mut();
    trc_map(&mut out, &lut);
    out.into()
}

/// Adjust each channel with its own levels curve in a single pass.
///
/// # Errors
///
/// Returns [`FilterError::InvalidArgument`] unless `params` holds exactly
/// one curve per channel.
pub fn adjust_channels(
    pix: &PixelBuffer,
    params: &[ToneCurveParameters],
) -> FilterResult<PixelBuffer> {
    let nch = pix.channels();
    if params.len() != nch {
        return Err(FilterError::InvalidArgument(format!(
            "expected {nch} curve(s), got {}",
            params.len()
        )));
    }
    let luts: Vec<TrcLut> = params.iter().map(levels_trc).collect();
    Ok(map_per_channel(pix, &luts))
}

/// Stretch every channel linearly so its min and max land on `low` and
/// `high`.
///
/// A constant channel maps entirely to `low`.
///
/// # Errors
///
/// Returns [`FilterError::InvalidArgument`] if `low > high`.
pub fn normalize(pix: &PixelBuffer, low: u8, high: u8) -> FilterResult<PixelBuffer> {
    if low > high {
        return Err(FilterError::InvalidArgument(format!(
            "low ({low}) must not exceed high ({high})"
        )));
    }
    let hist = pix.histogram();
    let luts: Vec<TrcLut> = hist
        .iter()
        .map(|ch| {
            // Buffers are never empty, so both bounds exist
            let min = ch.min_value().unwrap_or(0);
            let max = ch.max_value().unwrap_or(0);
            stretch_trc(min, max, low, high)
        })
        .collect();
    debug!(low, high, channels = luts.len(), "normalize");
    Ok(map_per_channel(pix, &luts))
}

fn stretch_trc(min: u8, max: u8, low: u8, high: u8) -> TrcLut {
    let mut lut = [low; 256];
    if min == max {
        return lut;
    }
    let scale = f64::from(high - low) / f64::from(max - min);
    for v in min..=max {
        let mapped = f64::from(v - min) * scale + f64::from(low);
        lut[v as usize] = mapped.round().clamp(0.0, 255.0) as u8;
    }
    lut
}

fn map_per_channel(pix: &PixelBuffer, luts: &[TrcLut]) -> PixelBuffer {
    let nch = pix.channels();
    let mut out = pix.to_mut();
    for y in 0..out.height() {
        for px in out.row_pixels_mut(y).chunks_exact_mut(nch) {
            for (v, lut) in px.iter_mut().zip(luts) {
                *v = lut[*v as usize];
            }
        }
    }
    out.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixtone_core::ChannelLayout;

    #[test]
    fn test_params_validation() {
        assert!(ToneCurveParameters::new(10, 1.0, 5, 0, 255).is_err());
        assert!(ToneCurveParameters::new(0, 1.0, 255, 200, 100).is_err());
        assert!(ToneCurveParameters::new(0, f64::NAN, 255, 0, 255).is_err());
        assert!(ToneCurveParameters::new(0, f64::INFINITY, 255, 0, 255).is_err());
    }

    #[test]
    fn test_gamma_clamped() {
        let p = ToneCurveParameters::with_input(0, 0.0, 255).unwrap();
        assert_eq!(p.gamma(), MIN_GAMMA);
        let p = ToneCurveParameters::with_input(0, 50.0, 255).unwrap();
        assert_eq!(p.gamma(), MAX_GAMMA);
    }

    #[test]
    fn test_identity_trc() {
        let lut = levels_trc(&ToneCurveParameters::identity());
        for (i, &v) in lut.iter().enumerate() {
            assert_eq!(v as usize, i);
        }
    }

    #[test]
    fn test_linear_stretch_rounds_half_up() {
        // (v - 0) / 2 * 255: v = 1 gives 127.5
        let p = ToneCurveParameters::with_input(0, 1.0, 2).unwrap();
        let lut = levels_trc(&p);
        assert_eq!(&lut[..4], &[0, 128, 255, 255]);
    }

    #[test]
    fn test_output_range() {
        let p = ToneCurveParameters::new(0, 1.0, 255, 100, 150).unwrap();
        let lut = levels_trc(&p);
        assert_eq!(lut[0], 100);
        assert_eq!(lut[255], 150);
        assert!(lut.iter().all(|&v| (100..=150).contains(&v)));
    }

    #[test]
    fn test_gamma_curve() {
        // gamma 2 lifts midtones: c = sqrt(n)
        let p = ToneCurveParameters::with_input(0, 2.0, 255).unwrap();
        let lut = levels_trc(&p);
        let expected = ((64.0f64 / 255.0).sqrt() * 255.0).round() as u8;
        assert_eq!(lut[64], expected);
        assert!(lut[64] > 64);
    }

    #[test]
    fn test_step_when_range_collapsed() {
        let p = ToneCurveParameters::with_input(100, 1.0, 100).unwrap();
        let lut = levels_trc(&p);
        assert_eq!(lut[0], 0);
        assert_eq!(lut[99], 0);
        assert_eq!(lut[100], 255);
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn test_step_with_small_gamma() {
        let p = ToneCurveParameters::with_input(128, 0.01, 128).unwrap();
        let lut = levels_trc(&p);
        assert!(lut.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn test_adjust_single_channel() {
        let rgb = PixelBuffer::from_raw(1, 1, ChannelLayout::Rgb, vec![50, 60, 70]).unwrap();
        let p = ToneCurveParameters::new(0, 1.0, 255, 255, 255).unwrap();
        let out = adjust(&rgb, 1, &p).unwrap();
        assert_eq!(out.data(), &[50, 255, 70]);
        assert_eq!(rgb.data(), &[50, 60, 70]);
    }

    #[test]
    fn test_adjust_bad_channel() {
        let gray = PixelBuffer::new(2, 2, ChannelLayout::Gray).unwrap();
        let p = ToneCurveParameters::identity();
        assert!(matches!(
            adjust(&gray, 1, &p),
            Err(FilterError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_adjust_channels_length() {
        let rgb = PixelBuffer::new(1, 1, ChannelLayout::Rgb).unwrap();
        let p = ToneCurveParameters::identity();
        assert!(adjust_channels(&rgb, &[p, p]).is_err());

        let invert_out = ToneCurveParameters::new(0, 1.0, 255, 9, 9).unwrap();
        let out = adjust_channels(&rgb, &[p, invert_out, p]).unwrap();
        assert_eq!(out.data(), &[0, 9, 0]);
    }

    #[test]
    fn test_adjust_preserves_padding() {
        let src = PixelBuffer::with_stride(1, 1, ChannelLayout::Rgb, 4).unwrap();
        let p = ToneCurveParameters::new(0, 1.0, 255, 200, 200).unwrap();
        let out = adjust_all(&src, &p);
        assert_eq!(out.row(0), &[200, 200, 200, 0]);
    }

    #[test]
    fn test_normalize() {
        let gray = PixelBuffer::from_raw(3, 1, ChannelLayout::Gray, vec![10, 20, 30]).unwrap();
        let out = normalize(&gray, 0, 255).unwrap();
        assert_eq!(out.data(), &[0, 128, 255]);
    }

    #[test]
    fn test_normalize_constant_channel() {
        let rgb =
            PixelBuffer::from_raw(2, 1, ChannelLayout::Rgb, vec![7, 0, 40, 7, 255, 40]).unwrap();
        let out = normalize(&rgb, 16, 32).unwrap();
        assert_eq!(out.data(), &[16, 16, 16, 16, 32, 16]);
    }

    #[test]
    fn test_normalize_bad_range() {
        let gray = PixelBuffer::new(1, 1, ChannelLayout::Gray).unwrap();
        assert!(normalize(&gray, 200, 100).is_err());
    }
}
