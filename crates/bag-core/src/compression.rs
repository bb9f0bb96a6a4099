//! Compression declarations and the policy deciding which ones can be reindexed
//!
//! Only per-message compression leaves the `topics` and `messages` tables of a
//! shard in plain, queryable form. Per-file compression wraps the whole SQLite
//! file and would need a decompression step that reindexing never performs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected compression declarations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Cannot specify a compression format without a compression mode")]
    IncompleteCompressionSpec,

    #[error("File-compressed bags cannot be reindexed (decompress the shard files first)")]
    UnsupportedFileCompression,
}

/// Unrecognized compression format or mode string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown compression {kind}: {value:?}")]
pub struct ParseCompressionError {
    pub kind: &'static str,
    pub value: String,
}

/// Compression algorithm declared for the bag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionFormat {
    #[default]
    None,
    Zstd,
}

impl CompressionFormat {
    /// Spelling used in the metadata descriptor
    pub fn as_metadata_str(&self) -> &'static str {
        match self {
            CompressionFormat::None => "",
            CompressionFormat::Zstd => "zstd",
        }
    }
}

impl FromStr for CompressionFormat {
    type Err = ParseCompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(CompressionFormat::None),
            "zstd" => Ok(CompressionFormat::Zstd),
            _ => Err(ParseCompressionError {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionFormat::None => write!(f, "none"),
            CompressionFormat::Zstd => write!(f, "zstd"),
        }
    }
}

/// Granularity at which compression was applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    #[default]
    None,
    File,
    Message,
}

impl CompressionMode {
    /// Spelling used in the metadata descriptor
    pub fn as_metadata_str(&self) -> &'static str {
        match self {
            CompressionMode::None => "",
            CompressionMode::File => "FILE",
            CompressionMode::Message => "MESSAGE",
        }
    }
}

impl FromStr for CompressionMode {
    type Err = ParseCompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(CompressionMode::None),
            "file" => Ok(CompressionMode::File),
            "message" => Ok(CompressionMode::Message),
            _ => Err(ParseCompressionError {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompressionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionMode::None => write!(f, "none"),
            CompressionMode::File => write!(f, "file"),
            CompressionMode::Message => write!(f, "message"),
        }
    }
}

/// How shard files are read once the declaration has been accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Query the shard directly; payload bytes stay opaque
    Plain,
}

/// Archive-wide compression declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompressionSpec {
    pub format: CompressionFormat,
    pub mode: CompressionMode,
}

impl CompressionSpec {
    pub fn new(format: CompressionFormat, mode: CompressionMode) -> Self {
        Self { format, mode }
    }

    /// Parse the CLI spellings, e.g. `("zstd", "message")`
    pub fn parse(format: &str, mode: &str) -> Result<Self, ParseCompressionError> {
        Ok(Self {
            format: format.parse()?,
            mode: mode.parse()?,
        })
    }

    /// Decide whether a bag with this declaration can be reindexed
    pub fn validate(&self) -> Result<ReadStrategy, PolicyError> {
        match (self.format, self.mode) {
            (_, CompressionMode::File) => Err(PolicyError::UnsupportedFileCompression),
            (CompressionFormat::None, CompressionMode::None) => Ok(ReadStrategy::Plain),
            (_, CompressionMode::Message) => Ok(ReadStrategy::Plain),
            (_, CompressionMode::None) => Err(PolicyError::IncompleteCompressionSpec),
        }
    }
}

impl fmt::Display for CompressionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.format, self.mode)
    }
}
