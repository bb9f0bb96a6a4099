//! Reindexing errors

use bag_core::PolicyError;
use bag_db::ShardError;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure aborts the whole reindex run; nothing is persisted.
#[derive(Error, Debug)]
pub enum ReindexError {
    #[error("Invalid path {}: {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: &'static str },

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("Unreadable shard {}: {source}", path.display())]
    UnreadableShard {
        path: PathBuf,
        #[source]
        source: ShardError,
    },

    #[error("No shard files found in {}", .0.display())]
    EmptyArchive(PathBuf),

    #[error("Topic {topic} has conflicting {field}: {expected:?} vs {found:?}")]
    TopicMismatch {
        topic: String,
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ReindexError {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: &'static str) -> Self {
        ReindexError::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}
