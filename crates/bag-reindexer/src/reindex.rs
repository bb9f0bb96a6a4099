//! Reindex entry point
//!
//! Validates the inputs, scans every shard of the bag and persists a fresh
//! descriptor. Nothing is written unless every step before persisting
//! succeeds.

use bag_core::ReindexOptions;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::discovery::{find_shard_files, relative_paths};
use crate::error::ReindexError;
use crate::metadata::MetadataWriter;

/// Outcome of a successful reindex run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexSummary {
    pub metadata_path: PathBuf,
    pub shard_count: usize,
    pub topic_count: usize,
    pub message_count: u64,
    pub starting_time: i64,
    pub duration: i64,
}

/// Rebuild `metadata.yaml` for the bag in `root`
pub fn reindex(root: &Path, options: &ReindexOptions) -> Result<ReindexSummary, ReindexError> {
    if !root.exists() {
        return Err(ReindexError::invalid_path(root, "bag directory does not exist"));
    }
    if !root.is_dir() {
        return Err(ReindexError::invalid_path(root, "reindex needs a bag directory"));
    }
    if let Some(out) = &options.output_dir {
        if !out.is_dir() {
            return Err(ReindexError::invalid_path(
                out.as_path(),
                "output directory must be an existing directory",
            ));
        }
    }

    options.compression.validate()?;

    let shard_paths = find_shard_files(root)?;
    if shard_paths.is_empty() {
        return Err(ReindexError::EmptyArchive(root.to_path_buf()));
    }
    info!(bag = %root.display(), shards = shard_paths.len(), "reindexing bag");

    let relative = relative_paths(root, &shard_paths)?;
    let mut writer = MetadataWriter::new(
        options.storage_identifier.as_str(),
        relative,
        options.compression,
    );

    let archive = aggregate(&shard_paths, &options.compression, &mut writer)?;

    let (starting_time, duration) = match archive.bounds {
        Some(bounds) => (bounds.min(), bounds.duration()),
        None => {
            warn!(bag = %root.display(), "bag contains no messages");
            (0, 0)
        }
    };
    info!(starting_time, duration, "archive bounds");

    writer.set_starting_time(starting_time);
    writer.set_duration(duration);
    let message_count = writer.finalize_message_count();

    let out_dir = options.output_dir.as_deref().unwrap_or(root);
    let metadata_path = writer.persist(out_dir)?;
    info!(path = %metadata_path.display(), message_count, "metadata written");

    Ok(ReindexSummary {
        metadata_path,
        shard_count: shard_paths.len(),
        topic_count: writer.topic_count(),
        message_count,
        starting_time,
        duration,
    })
}
