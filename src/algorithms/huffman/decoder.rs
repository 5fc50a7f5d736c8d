use std::io;

use thiserror::Error;

use crate::{
    algorithms::huffman::node::{HuffmanTree, Node},
    bits::BitSource,
    lines::ByteSink,
};

if_tracing! {
    use tracing::{debug, warn};
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot decode a non-empty stream with an empty tree")]
    EmptyTree,

    /// A single-leaf tree consumes no bits, so bit exhaustion can never end the decode.
    #[error("a single-symbol tree needs an explicit symbol count to decode")]
    UnboundedSingleSymbol,

    #[error("I/O error while decoding: {0}")]
    Io(#[from] io::Error),
}

/// When the decoder stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Keep going while the bit source has bits.
    BitExhaustion,
    /// Stop after this many symbols, or earlier if the bits run out.
    SymbolCount(u64),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub symbols: u64,
    pub bits_consumed: u64,
    /// The bits ran out before the decode was complete: either in the middle of a
    /// code, or before the requested symbol count. The partial symbol is dropped.
    pub truncated: bool,
}

/// Walks the tree one bit at a time, restarting at the root after every symbol.
pub struct Decoder<'t> {
    tree: &'t HuffmanTree,
}

impl<'t> Decoder<'t> {
    pub const fn new(tree: &'t HuffmanTree) -> Self {
        Self { tree }
    }

    /// Decodes symbols from `bits` into `sink`.
    ///
    /// Reaching a leaf emits its symbol without consuming a bit. Running out of bits
    /// at an internal node other than the root is not an error: the decode ends, the
    /// incomplete symbol is lost, and the summary reports `truncated`. Callers that
    /// may receive cut-off streams should check it.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::EmptyTree`] if the tree is empty but there is something to decode.
    /// - [`DecodeError::UnboundedSingleSymbol`] for a single-leaf tree under
    ///   [`Termination::BitExhaustion`] with bits available.
    /// - [`DecodeError::Io`] if the bit source or the sink fails.
    pub fn decode<S, K>(&self, bits: &mut S, sink: &mut K, termination: Termination) -> Result<DecodeSummary, DecodeError>
    where
        S: BitSource + ?Sized,
        K: ByteSink + ?Sized,
    {
        let mut summary = DecodeSummary::default();
        let wanted = match termination {
            Termination::SymbolCount(0) => return Ok(summary),
            Termination::SymbolCount(n) => Some(n),
            Termination::BitExhaustion if !bits.has_next_bit() => return Ok(summary),
            Termination::BitExhaustion => None,
        };

        let root = match self.tree.root() {
            None => return Err(DecodeError::EmptyTree),
            Some(&Node::Leaf { symbol, .. }) => {
                let Some(count) = wanted else {
                    return Err(DecodeError::UnboundedSingleSymbol);
                };
                for _ in 0..count {
                    sink.write_symbol(symbol)?;
                }
                summary.symbols = count;
                return Ok(summary);
            }
            Some(root) => root,
        };

        let mut current = root;
        loop {
            match current {
                Node::Leaf { symbol, .. } => {
                    sink.write_symbol(*symbol)?;
                    summary.symbols += 1;
                    current = root;
                    if wanted == Some(summary.symbols) {
                        break;
                    }
                }
                Node::Internal { left, right, .. } => {
                    if !bits.has_next_bit() {
                        summary.truncated = !core::ptr::eq(current, root) || wanted.is_some();
                        break;
                    }
                    let bit = bits.next_bit()?;
                    summary.bits_consumed += 1;
                    current = if bit { &**right } else { &**left };
                }
            }
        }

        if_tracing! {{
            if summary.truncated {
                warn!(target: "huffman", symbols = summary.symbols, bits = summary.bits_consumed, "bit stream ended mid-symbol");
            } else {
                debug!(target: "huffman", symbols = summary.symbols, bits = summary.bits_consumed, "decode complete");
            }
        }}
        Ok(summary)
    }

    /// Decodes into a fresh buffer.
    pub fn decode_to_vec<S: BitSource + ?Sized>(&self, bits: &mut S, termination: Termination) -> Result<(Vec<u8>, DecodeSummary), DecodeError> {
        let mut out = Vec::new();
        let summary = self.decode(bits, &mut out, termination)?;
        Ok((out, summary))
    }
}
