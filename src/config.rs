//! Session configuration, read from an optional JSON file.
//!
//! Every field has a default, so `{}` and a missing file behave the same:
//!
//! ```json
//! {
//!     "termination": "symbol_count",
//!     "table_extension": "code"
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::algorithms::huffman::Termination;

/// How the decoder decides it is done with a stream.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerminationPolicy {
    /// Stop after the symbol count stored in the stream header.
    #[default]
    SymbolCount,
    /// Ignore the stored count and decode until the bits run out.
    /// Streams of a single distinct symbol cannot be decoded this way.
    BitExhaustion,
}

impl TerminationPolicy {
    pub const fn resolve(self, symbol_count: u64) -> Termination {
        match self {
            Self::SymbolCount => Termination::SymbolCount(symbol_count),
            Self::BitExhaustion => Termination::BitExhaustion,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HuffpackConfig {
    pub termination: TerminationPolicy,

    /// Extension of the code table written next to a raw stream.
    pub table_extension: String,
}

impl Default for HuffpackConfig {
    fn default() -> Self {
        Self {
            termination: TerminationPolicy::default(),
            table_extension: "code".to_string(),
        }
    }
}

impl HuffpackConfig {
    /// Reads the config at `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        if config.table_extension.is_empty() || config.table_extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidExtension(config.table_extension));
        }
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid JSON for huffpack: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table_extension {0:?} must be a non-empty file extension")]
    InvalidExtension(String),
}
