//! Shannon entropy of sample distributions

use super::{ChannelHistogram, Histogram};

/// Probability floor applied before taking the logarithm.
const MIN_PROBABILITY: f64 = 1e-10;

impl ChannelHistogram {
    /// Shannon entropy in bits per sample.
    ///
    /// `H = -sum(p * log2(max(p, 1e-10)))` over values with a nonzero count.
    /// Zero-count bins contribute nothing. An empty histogram has entropy 0.
    pub fn entropy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        -self
            .iter()
            .map(|(_, c)| {
                let p = c as f64 / total;
                p * p.max(MIN_PROBABILITY).log2()
            })
            .sum::<f64>()
    }
}

/// Entropy of every channel of `hist`, in channel order.
pub fn entropy(hist: &Histogram) -> Vec<f64> {
    hist.iter().map(ChannelHistogram::entropy).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_mixed() {
        let hist = ChannelHistogram::from_samples(&[10, 10, 20, 30]);
        assert!((hist.entropy() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_constant_is_zero() {
        let hist = ChannelHistogram::from_samples(&[7; 100]);
        assert_eq!(hist.entropy(), 0.0);
    }

    #[test]
    fn test_entropy_uniform_256() {
        let samples: Vec<u8> = (0..=255).collect();
        let hist = ChannelHistogram::from_samples(&samples);
        assert!((hist.entropy() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_empty() {
        assert_eq!(ChannelHistogram::default().entropy(), 0.0);
    }

    #[test]
    fn test_entropy_per_channel() {
        let hist = Histogram::from_channels(vec![
            ChannelHistogram::from_samples(&[0, 1]),
            ChannelHistogram::from_samples(&[5, 5]),
        ]);
        let h = entropy(&hist);
        assert_eq!(h.len(), 2);
        assert!((h[0] - 1.0).abs() < 1e-12);
        assert_eq!(h[1], 0.0);
    }
}
