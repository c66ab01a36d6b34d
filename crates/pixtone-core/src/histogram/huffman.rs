//! Huffman code-length estimation
//!
//! Builds an optimal prefix code over the values present in a histogram
//! and reports the code length of each value. The tree lives in a flat
//! arena: leaves first (ascending sample value), then merged nodes in
//! creation order. Each node records only its parent, which is all that
//! code-length computation needs.
//!
//! Merging pops the two lightest entries from a min-heap keyed on
//! `(weight, node id)`. Because ids grow with sample value and then with
//! merge order, equal weights always resolve toward the lowest id, so the
//! resulting lengths are reproducible.

use super::{ChannelHistogram, NUM_LEVELS};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Code length assigned when only one distinct value is present.
///
/// A prefix code still needs one bit per emitted symbol.
pub const SINGLE_SYMBOL_CODE_LENGTH: u32 = 1;

const NO_PARENT: usize = usize::MAX;

/// Code length for every sample value; absent values get 0.
pub fn huffman_code_lengths(hist: &ChannelHistogram) -> [u32; NUM_LEVELS] {
    let mut lengths = [0u32; NUM_LEVELS];

    let symbols: Vec<(u8, u64)> = hist.iter().collect();
    match symbols.len() {
        0 => return lengths,
        1 => {
            lengths[symbols[0].0 as usize] = SINGLE_SYMBOL_CODE_LENGTH;
            return lengths;
        }
        _ => {}
    }

    // A full binary tree over n leaves has 2n - 1 nodes.
    let mut parent = vec![NO_PARENT; 2 * symbols.len() - 1];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = symbols
        .iter()
        .enumerate()
        .map(|(id, &(_, count))| Reverse((count, id)))
        .collect();

    let mut next_id = symbols.len();
    while heap.len() > 1 {
        let (Some(Reverse((w1, a))), Some(Reverse((w2, b)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        parent[a] = next_id;
        parent[b] = next_id;
        heap.push(Reverse((w1 + w2, next_id)));
        next_id += 1;
    }

    for (leaf, &(value, _)) in symbols.iter().enumerate() {
        let mut depth = 0;
        let mut node = leaf;
        while parent[node] != NO_PARENT {
            node = parent[node];
            depth += 1;
        }
        lengths[value as usize] = depth;
    }
    lengths
}

impl ChannelHistogram {
    /// Average Huffman code length in bits per sample.
    ///
    /// `sum(len_v * count_v) / total` for the optimal prefix code built by
    /// [`huffman_code_lengths`]. An empty histogram yields 0.
    pub fn average_huffman_length(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let lengths = huffman_code_lengths(self);
        let bits: u64 = self
            .iter()
            .map(|(v, c)| u64::from(lengths[v as usize]) * c)
            .sum();
        bits as f64 / total as f64
    }
}

/// Free-function form of [`ChannelHistogram::average_huffman_length`].
pub fn average_huffman_length(hist: &ChannelHistogram) -> f64 {
    hist.average_huffman_length()
}
