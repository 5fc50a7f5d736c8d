//! cli component of huffpack.
//!
//! `$exename` stands for the executable name. `<description>` denotes a required argument,
//! `[description]` an optional one. Every subcommand accepts `[--config <path to json>]`,
//! see [`crate::config`].
//!
//! # Compression
//!
//! > `$exename enc <input path> <output path> [--raw]`
//!
//! by default the code table is embedded in front of the bit stream, so the output file is all the
//! decompressor needs. with `--raw` the output holds only the stream, and the code table is written
//! next to it as `{output stem}.code` (the extension is configurable). the table is plain text and
//! can be read or edited by hand.
//!
//! # Decompression
//!
//! > `$exename dec <input path> <output path> [--raw] [--table <path to code table>]`
//!
//! with `--raw`, the code table is taken from `--table`, or from the side file the encoder would
//! have written for `<input path>`.
//!
//! # Inspecting codes
//!
//! > `$exename codes <input path> [--save <path>]`
//!
//! prints every symbol of the input with its frequency and code, and the total encoded size.
//! `--save` writes the code table in the same format `enc --raw` produces.
//!
//! # Testing
//!
//! > `$exename test <input paths>...`
//!
//! compresses and immediately decompresses every input, compares against the original and prints a
//! report. exits with a failure status if any roundtrip fails.
use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::{algorithms::huffman::EncodeError, config::ConfigError};

pub mod codes;
pub mod decode;
pub mod encode;
pub mod test;

/// Error types for CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("decoding failed: {0}")]
    Decompression(anyhow::Error),

    #[error("cannot derive a code table path from {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("{failed} of {total} roundtrips failed")]
    RoundTripFailed { failed: usize, total: usize },
}

impl CliError {
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| CliError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Huffman compressor with a portable text code table
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON session config
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode (compress) a file
    #[command(alias = "enc")]
    Encode(EncodeArgs),

    /// Decode (decompress) a file
    #[command(alias = "dec")]
    Decode(DecodeArgs),

    /// Print the code assigned to every symbol of a file
    Codes(CodesArgs),

    /// Test compression/decompression roundtrip
    Test(TestArgs),
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    pub input_path: PathBuf,

    pub output_path: PathBuf,

    /// Write the bit stream alone and put the code table in a side file
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    pub input_path: PathBuf,

    pub output_path: PathBuf,

    /// Input is a bare bit stream with its code table in a side file
    #[arg(long)]
    pub raw: bool,

    /// Code table to use with --raw, instead of the side file next to the input
    #[arg(long, requires = "raw")]
    pub table: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CodesArgs {
    pub input_path: PathBuf,

    /// Also write the code table to this path
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TestArgs {
    #[arg(required = true)]
    pub input_paths: Vec<PathBuf>,
}

/// `{stem}.{extension}` next to `base_path`.
pub fn table_path_for(base_path: &Path, extension: &str) -> Result<PathBuf> {
    let stem = base_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CliError::InvalidPath(base_path.to_path_buf()))?;
    Ok(base_path.with_file_name(format!("{stem}.{extension}")))
}
