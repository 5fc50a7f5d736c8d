//! Bit-level sources and sinks.
//!
//! Bits are packed most significant bit first. The reader is told how many bits are
//! meaningful, so padding in the last byte is never mistaken for data.

use std::io::{self, Read, Write};

use arcode::bitbit::{BitReader, BitWriter, MSB};

/// A sequential supply of bits.
pub trait BitSource {
    /// Whether another bit can be read. Has no side effect.
    fn has_next_bit(&self) -> bool;

    /// Reads the next bit, `false` for `0` and `true` for `1`.
    ///
    /// # Errors
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] if no bit is left, or with the
    /// underlying reader's error.
    fn next_bit(&mut self) -> io::Result<bool>;
}

/// A sequential consumer of bits.
pub trait BitSink {
    fn write_bit(&mut self, bit: bool) -> io::Result<()>;
}

pub struct BitStreamReader<R: Read> {
    inner: BitReader<R, MSB>,
    remaining: u64,
}

impl<R: Read> BitStreamReader<R> {
    /// `bit_len` is the number of meaningful bits available from `reader`.
    pub fn new(reader: R, bit_len: u64) -> Self {
        Self {
            inner: BitReader::new(reader),
            remaining: bit_len,
        }
    }

    pub const fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<R: Read> BitSource for BitStreamReader<R> {
    fn has_next_bit(&self) -> bool {
        self.remaining > 0
    }

    fn next_bit(&mut self) -> io::Result<bool> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "bit source exhausted"));
        }
        let bit = self.inner.read_bit()?;
        self.remaining -= 1;
        Ok(bit)
    }
}

pub struct BitStreamWriter<W: Write> {
    inner: BitWriter<W>,
    written: u64,
}

impl<W: Write> BitStreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BitWriter::new(writer),
            written: 0,
        }
    }

    /// Pads the last partial byte with zeros and returns the number of meaningful bits.
    pub fn finish(mut self) -> io::Result<u64> {
        if self.written % 8 != 0 {
            self.inner.pad_to_byte()?;
        }
        if_tracing! {{
            tracing::trace!(target: "bits", bits = self.written, "bit stream finished");
        }}
        Ok(self.written)
    }
}

impl<W: Write> BitSink for BitStreamWriter<W> {
    fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner.write_bit(bit)?;
        self.written += 1;
        Ok(())
    }
}

/// Byte length needed to hold `bit_len` packed bits.
pub const fn packed_len(bit_len: u64) -> u64 {
    bit_len.div_ceil(8)
}
