//! Line and byte sinks/sources used by the code table and the decoder.

use std::io::{self, BufRead, Write};

/// Sequential access to text lines, without their terminators.
pub trait LineSource {
    /// Returns `Ok(None)` once the source is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

pub trait LineSink {
    /// Writes `line` followed by a newline.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Receives decoded symbols one at a time.
pub trait ByteSink {
    fn write_symbol(&mut self, symbol: u8) -> io::Result<()>;
}

impl<B: BufRead> LineSource for B {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

impl<W: Write> LineSink for W {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")
    }
}

impl<W: Write> ByteSink for W {
    fn write_symbol(&mut self, symbol: u8) -> io::Result<()> {
        self.write_all(&[symbol])
    }
}
