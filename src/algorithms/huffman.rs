use std::{fmt::Display, io::Cursor};

use anyhow::anyhow;

use crate::{
    bits::{BitStreamReader, BitStreamWriter, packed_len},
    compressor::{Compressor, DecompressionError, Result},
    config::TerminationPolicy,
};

pub mod builder;
pub mod decoder;
pub mod deserializer;
pub mod encoder;
pub mod node;
pub mod serializer;

pub use self::{
    builder::{FrequencyTable, TreeBuilder},
    decoder::{DecodeError, Decoder, Termination},
    deserializer::{FormatError, TreeDeserializer},
    encoder::{CodeBook, EncodeError, Encoder},
    serializer::TreeSerializer,
};

if_tracing! {
    use tracing::{debug, info};
}

/// symbol count + bit length
const STREAM_HEADER_LEN: usize = 16;
const TABLE_LEN_PREFIX: usize = 4;

/// Code table text and bit stream kept apart, for the raw layout.
///
/// `stream` starts with the little-endian `u64` symbol count and `u64` bit length,
/// followed by the packed bits.
#[derive(Clone, Debug)]
pub struct EncodedParts {
    pub table: Vec<u8>,
    pub stream: Vec<u8>,
}

/// Builds a tree for `data`, then writes its code table and the encoded stream.
pub fn encode_parts(data: &[u8]) -> Result<EncodedParts, EncodeError> {
    if_tracing! {{
        debug!(target: "huffman", input_len = data.len(), "huffman encode start");
    }}
    let frequencies = FrequencyTable::from_bytes(data);
    let tree = TreeBuilder::build(&frequencies);

    let mut table = Vec::new();
    TreeSerializer::write(&tree, &mut table)?;

    let book = CodeBook::from_tree(&tree);
    let mut packed = Vec::with_capacity(packed_len(book.encoded_bits(&frequencies)) as usize);
    let mut writer = BitStreamWriter::new(Cursor::new(&mut packed));
    Encoder::new(&book).encode(data, &mut writer)?;
    let bit_len = writer.finish()?;

    let mut stream = Vec::with_capacity(STREAM_HEADER_LEN + packed.len());
    stream.extend_from_slice(&(data.len() as u64).to_le_bytes());
    stream.extend_from_slice(&bit_len.to_le_bytes());
    stream.extend_from_slice(&packed);

    if_tracing! {{
        info!(
            target: "huffman",
            input_len = data.len(),
            symbols = book.len(),
            table_len = table.len(),
            bits = bit_len,
            "huffman encode complete"
        );
    }}
    Ok(EncodedParts { table, stream })
}

/// Inverse of [`encode_parts`].
pub fn decode_parts(table: &[u8], stream: &[u8], policy: TerminationPolicy) -> Result<Vec<u8>, DecompressionError> {
    let tree = TreeDeserializer::read(&mut &table[..])?;

    let (symbol_count, rest) = split_u64(stream).ok_or_else(|| invalid("stream header is missing the symbol count"))?;
    let (bit_len, payload) = split_u64(rest).ok_or_else(|| invalid("stream header is missing the bit length"))?;
    if (payload.len() as u64) < packed_len(bit_len) {
        return Err(invalid(format!(
            "stream declares {bit_len} bits but carries only {} bytes",
            payload.len()
        )));
    }

    // past the single-leaf case every symbol costs at least one bit
    if tree.leaf_count() > 1 && symbol_count > bit_len {
        return Err(invalid(format!(
            "stream declares {symbol_count} symbols but only {bit_len} bits"
        )));
    }
    let mut out = Vec::new();
    usize::try_from(symbol_count)
        .ok()
        .and_then(|count| out.try_reserve_exact(count).ok())
        .ok_or_else(|| invalid(format!("cannot allocate {symbol_count} decoded symbols")))?;

    let mut reader = BitStreamReader::new(payload, bit_len);
    let summary = Decoder::new(&tree).decode(&mut reader, &mut out, policy.resolve(symbol_count))?;

    if summary.truncated || summary.symbols != symbol_count {
        return Err(DecompressionError::Truncated {
            expected: symbol_count,
            decoded: summary.symbols,
        });
    }
    if_tracing! {{
        info!(target: "huffman", output_len = out.len(), bits = summary.bits_consumed, "huffman decode complete");
    }}
    Ok(out)
}

fn split_u64(data: &[u8]) -> Option<(u64, &[u8])> {
    let (head, rest) = data.split_first_chunk::<8>()?;
    Some((u64::from_le_bytes(*head), rest))
}

fn invalid(message: impl Into<String>) -> DecompressionError {
    DecompressionError::InvalidInput(message.into())
}

/// Huffman coding with the code table embedded in front of the stream.
///
/// Layout: little-endian `u32` table length, the code table text, then the stream
/// described on [`EncodedParts`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HuffmanCoding {
    policy: TerminationPolicy,
}

impl HuffmanCoding {
    pub const fn with_policy(policy: TerminationPolicy) -> Self {
        Self { policy }
    }

    pub fn huffman_encode(&mut self, data: &[u8]) -> Vec<u8> {
        let parts = encode_parts(data).unwrap_or_else(|e| {
            // every byte of `data` has a code in a tree built from `data`, and
            // writes go to a Vec, so neither error variant can occur here
            panic!("huffman encoder failed on its own tree: {e}")
        });

        let mut out = Vec::with_capacity(TABLE_LEN_PREFIX + parts.table.len() + parts.stream.len());
        out.extend_from_slice(&(parts.table.len() as u32).to_le_bytes());
        out.extend_from_slice(&parts.table);
        out.extend_from_slice(&parts.stream);
        out
    }

    pub fn huffman_decode(&mut self, data: &[u8]) -> Result<Vec<u8>, DecompressionError> {
        let (len, rest) = data
            .split_first_chunk::<TABLE_LEN_PREFIX>()
            .ok_or_else(|| invalid("missing code table length"))?;
        let len = u32::from_le_bytes(*len) as usize;
        if rest.len() < len {
            return Err(invalid(format!("code table needs {len} bytes, {} available", rest.len())));
        }
        let (table, stream) = rest.split_at(len);
        decode_parts(table, stream, self.policy)
    }
}

impl Compressor for HuffmanCoding {
    fn compress_bytes(&mut self, data: &[u8]) -> Vec<u8> {
        self.huffman_encode(data)
    }

    fn decompress_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.huffman_decode(data).map_err(|e| anyhow!(e))
    }

    fn compressor_name(&self) -> String {
        "Huffman Coding".into()
    }
}

impl Display for HuffmanCoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Huffman Coding")
    }
}
