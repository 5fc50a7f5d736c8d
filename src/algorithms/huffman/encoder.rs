use std::io;

use thiserror::Error;

use crate::{
    algorithms::huffman::{
        builder::FrequencyTable,
        node::{Code, HuffmanTree},
    },
    bits::BitSink,
};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("symbol {0} has no code in this tree")]
    UnknownSymbol(u8),

    #[error("I/O error while writing bits: {0}")]
    Io(#[from] io::Error),
}

/// Per-symbol codes of a tree, indexed by symbol.
#[derive(Clone, Debug)]
pub struct CodeBook {
    codes: Vec<Option<Code>>,
}

impl CodeBook {
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; 256];
        for (symbol, code) in tree.codes() {
            codes[symbol as usize] = Some(code);
        }
        Self { codes }
    }

    pub fn code(&self, symbol: u8) -> Option<&[bool]> {
        self.codes[symbol as usize].as_deref()
    }

    /// Number of symbols that have a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bits needed to encode data with these frequencies.
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter_nonzero()
            .map(|(symbol, count)| count * self.code(symbol).map_or(0, <[bool]>::len) as u64)
            .sum()
    }
}

pub struct Encoder<'c> {
    book: &'c CodeBook,
}

impl<'c> Encoder<'c> {
    pub const fn new(book: &'c CodeBook) -> Self {
        Self { book }
    }

    /// Writes the code of every byte of `data` and returns the number of bits written.
    pub fn encode<S: BitSink + ?Sized>(&self, data: &[u8], sink: &mut S) -> Result<u64, EncodeError> {
        let mut bits = 0u64;
        for &symbol in data {
            let code = self.book.code(symbol).ok_or(EncodeError::UnknownSymbol(symbol))?;
            for &bit in code {
                sink.write_bit(bit)?;
            }
            bits += code.len() as u64;
        }
        Ok(bits)
    }
}
