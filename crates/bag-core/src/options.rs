//! Options for a reindex run

use std::path::PathBuf;

use crate::compression::CompressionSpec;

/// Storage plugin identifier written when none is given
pub const DEFAULT_STORAGE_ID: &str = "sqlite3";

/// Options controlling one reindex run, with builder pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexOptions {
    /// Storage identifier recorded in the descriptor (passed through unchecked)
    pub storage_identifier: String,

    pub compression: CompressionSpec,

    /// Write the descriptor here instead of the bag directory
    pub output_dir: Option<PathBuf>,
}

impl Default for ReindexOptions {
    fn default() -> Self {
        Self {
            storage_identifier: DEFAULT_STORAGE_ID.to_string(),
            compression: CompressionSpec::default(),
            output_dir: None,
        }
    }
}

impl ReindexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_storage_identifier(mut self, storage_identifier: impl Into<String>) -> Self {
        self.storage_identifier = storage_identifier.into();
        self
    }

    pub fn with_compression(mut self, compression: CompressionSpec) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }
}
