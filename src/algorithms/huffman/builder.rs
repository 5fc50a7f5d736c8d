use core::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::algorithms::huffman::node::{HuffmanTree, Node};

if_tracing! {
    use tracing::debug;
}

/// Occurrence counts for every byte value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    pub const fn new() -> Self {
        Self { counts: [0; 256] }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in data {
            table.add(byte, 1);
        }
        table
    }

    pub const fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub const fn set(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] = count;
    }

    pub const fn add(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] = self.counts[symbol as usize].saturating_add(count);
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count != 0).count()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    /// Symbols with a nonzero count, in ascending symbol order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0u8..=255).map(|symbol| (symbol, self.get(symbol))).filter(|&(_, count)| count != 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (symbol, count) in iter {
            table.add(symbol, count);
        }
        table
    }
}

/// Heap entry: lowest weight first, then lowest sequence number.
struct Pending {
    seq: u32,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so both keys are reversed.
        other
            .node
            .weight()
            .cmp(&self.node.weight())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Greedy Huffman construction.
///
/// Ties between equal weights are broken by insertion order: leaves are queued in
/// ascending symbol order and every merged node is queued after all existing entries.
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn build(frequencies: &FrequencyTable) -> HuffmanTree {
        let mut seq = 0u32;
        let mut heap = BinaryHeap::with_capacity(frequencies.distinct());
        for (symbol, count) in frequencies.iter_nonzero() {
            heap.push(Pending {
                seq,
                node: Node::leaf(symbol, count),
            });
            seq += 1;
        }

        if_tracing! {{
            debug!(target: "huffman", distinct = heap.len(), total = frequencies.total(), "building tree");
        }}

        loop {
            let Some(first) = heap.pop() else {
                return HuffmanTree::empty();
            };
            let Some(second) = heap.pop() else {
                return HuffmanTree::from_root(first.node);
            };
            heap.push(Pending {
                seq,
                node: Node::merge(first.node, second.node),
            });
            seq += 1;
        }
    }

    pub fn from_bytes(data: &[u8]) -> HuffmanTree {
        Self::build(&FrequencyTable::from_bytes(data))
    }
}
