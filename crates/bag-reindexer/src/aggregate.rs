//! Archive-wide aggregation over shard files

use bag_core::{CompressionSpec, TimeBounds};
use bag_db::extract_shard;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::ReindexError;
use crate::metadata::TopicSink;

/// Result of scanning every shard of a bag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveBounds {
    /// `None` when no shard contains a message
    pub bounds: Option<TimeBounds>,
    pub shards_scanned: usize,
    /// Topic records forwarded to the sink, before merging by name
    pub topics_seen: usize,
}

impl ArchiveBounds {
    pub fn starting_time(&self) -> Option<i64> {
        self.bounds.map(|b| b.min())
    }

    pub fn duration(&self) -> Option<i64> {
        self.bounds.map(|b| b.duration())
    }
}

/// Scan `shard_paths` in order, forwarding topics to `sink`
///
/// Fails on the first shard that cannot be queried.
pub fn aggregate<S: TopicSink>(
    shard_paths: &[PathBuf],
    compression: &CompressionSpec,
    sink: &mut S,
) -> Result<ArchiveBounds, ReindexError> {
    let strategy = compression.validate()?;
    debug!(?strategy, %compression, "compression policy accepted");

    let mut result = ArchiveBounds::default();
    for path in shard_paths {
        let stats = extract_shard(path).map_err(|source| ReindexError::UnreadableShard {
            path: path.clone(),
            source,
        })?;

        info!(
            shard = %path.display(),
            topics = stats.topics.len(),
            messages = stats.message_count(),
            min = ?stats.min_timestamp(),
            max = ?stats.max_timestamp(),
            "shard scanned"
        );

        result.bounds = TimeBounds::merge_opt(result.bounds, stats.bounds);
        result.shards_scanned += 1;
        result.topics_seen += stats.topics.len();

        for topic in stats.topics {
            sink.add_topic(topic)?;
        }
    }

    Ok(result)
}
