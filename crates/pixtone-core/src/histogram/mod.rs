//! Histogram generation for pixel buffers
//!
//! Counts the 256 possible sample values per channel, and answers rank
//! queries over those counts. Entropy and Huffman code-length estimates
//! built on top of a histogram live in the [`entropy`] and [`huffman`]
//! submodules.

pub mod entropy;
pub mod huffman;

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use tracing::debug;

/// Number of distinct 8-bit sample values.
pub const NUM_LEVELS: usize = 256;

/// Counts for one channel, one bin per sample value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistogram {
    counts: [u64; NUM_LEVELS],
}

impl Default for ChannelHistogram {
    fn default() -> Self {
        Self {
            counts: [0; NUM_LEVELS],
        }
    }
}

impl ChannelHistogram {
    /// Build a histogram from explicit counts.
    pub fn from_counts(counts: [u64; NUM_LEVELS]) -> Self {
        Self { counts }
    }

    /// Count every value in a slice of samples.
    pub fn from_samples(samples: &[u8]) -> Self {
        let mut hist = Self::default();
        for &v in samples {
            hist.counts[v as usize] += 1;
        }
        hist
    }

    /// Get the count for one sample value.
    #[inline]
    pub fn count(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    /// Get all 256 counts.
    #[inline]
    pub fn counts(&self) -> &[u64; NUM_LEVELS] {
        &self.counts
    }

    /// Total number of samples counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Check whether no samples were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Number of distinct values with a nonzero count.
    pub fn distinct_values(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Iterate over `(value, count)` pairs with a nonzero count, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(v, &c)| (v as u8, c))
    }

    /// Smallest value present, or `None` for an empty histogram.
    pub fn min_value(&self) -> Option<u8> {
        self.iter().next().map(|(v, _)| v)
    }

    /// Largest value present, or `None` for an empty histogram.
    pub fn max_value(&self) -> Option<u8> {
        self.counts
            .iter()
            .rposition(|&c| c > 0)
            .map(|v| v as u8)
    }

    /// Value at a zero-based rank in the ascending sort of all samples.
    ///
    /// Equivalent to flattening the histogram into a sorted sequence and
    /// indexing it, without materializing the sequence. Returns `None` if
    /// `rank >= total`.
    pub fn value_at_rank(&self, rank: u64) -> Option<u8> {
        let mut cumulative = 0u64;
        for (v, &c) in self.counts.iter().enumerate() {
            cumulative += c;
            if rank < cumulative {
                return Some(v as u8);
            }
        }
        None
    }

    /// Median as the mean of the two middle-ranked values.
    ///
    /// For an odd total both middle ranks coincide. Returns `None` for an
    /// empty histogram.
    pub fn median(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let lo = self.value_at_rank((total - 1) / 2)?;
        let hi = self.value_at_rank(total / 2)?;
        Some((f64::from(lo) + f64::from(hi)) / 2.0)
    }
}

/// Per-channel histograms of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    channels: Vec<ChannelHistogram>,
}

impl Histogram {
    /// Count sample values per channel over the pixel columns of `buffer`.
    ///
    /// Row padding is never counted.
    pub fn from_buffer(buffer: &PixelBuffer) -> Self {
        let nch = buffer.channels();
        debug!(
            width = buffer.width(),
            height = buffer.height(),
            channels = nch,
            "computing histogram"
        );
        let mut channels = vec![ChannelHistogram::default(); nch];
        for row in buffer.rows() {
            for pixel in row.chunks_exact(nch) {
                for (hist, &v) in channels.iter_mut().zip(pixel) {
                    hist.counts[v as usize] += 1;
                }
            }
        }
        Self { channels }
    }

    /// Build from already computed channel histograms.
    pub fn from_channels(channels: Vec<ChannelHistogram>) -> Self {
        Self { channels }
    }

    /// Number of channels.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Get the histogram of one channel.
    pub fn channel(&self, channel: usize) -> Option<&ChannelHistogram> {
        self.channels.get(channel)
    }

    /// Get the histogram of one channel, as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelOutOfRange`] for a bad index.
    pub fn try_channel(&self, channel: usize) -> Result<&ChannelHistogram> {
        self.channels.get(channel).ok_or(Error::ChannelOutOfRange {
            channel,
            channels: self.channels.len(),
        })
    }

    /// Iterate over the channel histograms in channel order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChannelHistogram> {
        self.channels.iter()
    }
}

impl PixelBuffer {
    /// Compute the per-channel histogram of this buffer.
    pub fn histogram(&self) -> Histogram {
        Histogram::from_buffer(self)
    }
}
