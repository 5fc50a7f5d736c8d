pub use anyhow::Result;
use core::error::Error;

use crate::algorithms::huffman::{DecodeError, FormatError};

/// Represents an error emitted while turning a compressed buffer back into data.
#[derive(Debug)]
pub enum DecompressionError {
    /// The container framing is malformed: a length prefix or header is missing or lies.
    ///
    /// The argument is a string that describes what went wrong.
    InvalidInput(String),

    /// The embedded code table could not be read back into a tree.
    CodeTable(FormatError),

    /// The decoder refused the stream.
    Decode(DecodeError),

    /// The bit stream ended before every symbol recorded in the header was decoded.
    Truncated { expected: u64, decoded: u64 },
}

impl Error for DecompressionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CodeTable(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::InvalidInput(_) | Self::Truncated { .. } => None,
        }
    }
}

impl core::fmt::Display for DecompressionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidInput(message) => {
                write!(f, "Input data was malformed, and could not be decoded: {}", message)
            }
            Self::CodeTable(e) => write!(f, "Embedded code table is invalid: {}", e),
            Self::Decode(e) => write!(f, "Bit stream could not be decoded: {}", e),
            Self::Truncated { expected, decoded } => {
                write!(f, "Bit stream ended after {} of {} symbols", decoded, expected)
            }
        }
    }
}

impl From<FormatError> for DecompressionError {
    fn from(e: FormatError) -> Self {
        Self::CodeTable(e)
    }
}

impl From<DecodeError> for DecompressionError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

/// Shared behavior of byte-to-byte compressors.
///
/// [`decompress_bytes`](Compressor::decompress_bytes) must reconstruct exactly what was handed to
/// [`compress_bytes`](Compressor::compress_bytes). Nothing is promised about the compressed size:
/// tiny or high-entropy inputs grow, since the code table travels with the data.
pub trait Compressor: 'static {
    /// Compresses a given byte slice and returns the encoded data.
    fn compress_bytes(&mut self, data: &[u8]) -> Vec<u8>;

    /// Decompresses a given byte slice and returns the decoded data.
    ///
    /// # Errors
    ///
    /// Returns an error if the input data was malformed or cut short.
    fn decompress_bytes(&mut self, data: &[u8]) -> Result<Vec<u8>>;

    /// Compresses then decompresses `data` and compares the result with the original.
    fn test_roundtrip<'orig>(&mut self, data: &'orig [u8]) -> Result<RoundTripTestResult<'orig>> {
        let compressed = <Self as Compressor>::compress_bytes(self, data);
        let decompressed = <Self as Compressor>::decompress_bytes(self, &compressed)?;
        let equal = data == decompressed.as_slice();

        Ok(RoundTripTestResult {
            equal,
            original: data,
            compressed,
            decompressed,
        })
    }

    /// Human readable name of the compressor, used in reports.
    ///
    /// Defaults to the type name of the compressor.
    fn compressor_name(&self) -> String {
        core::any::type_name::<Self>().to_string()
    }
}

/// Outcome of [`Compressor::test_roundtrip`].
#[derive(Clone, Debug, Hash)]
pub struct RoundTripTestResult<'orig> {
    pub(crate) equal: bool,
    pub(crate) original: &'orig [u8],
    pub(crate) compressed: Vec<u8>,
    pub(crate) decompressed: Vec<u8>,
}

impl<'orig> RoundTripTestResult<'orig> {
    /// Whether the original and decompressed data were equal.
    pub const fn is_successful(&self) -> bool {
        self.equal
    }

    pub const fn get_original(&self) -> &'orig [u8] {
        self.original
    }

    pub fn get_compressed(&self) -> &[u8] {
        self.compressed.as_slice()
    }

    pub fn get_decompressed(&self) -> &[u8] {
        self.decompressed.as_slice()
    }

    /// Compressed size over original size. An empty original reports `1.0`.
    pub fn ratio(&self) -> f64 {
        if self.original.is_empty() {
            return 1.0;
        }
        self.compressed.len() as f64 / self.original.len() as f64
    }
}
