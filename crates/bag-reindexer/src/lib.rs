//! bag-reindexer - Rebuild the metadata descriptor of a sqlite3 bag
//!
//! This crate owns every **write** performed during reindexing: it scans the
//! shard files of a bag directory through the read-only `bag-db` crate, merges
//! their statistics and persists a fresh `metadata.yaml`.

pub mod aggregate;
pub mod discovery;
pub mod error;
pub mod metadata;
pub mod reindex;

pub use aggregate::{aggregate, ArchiveBounds};
pub use discovery::{find_shard_files, relative_paths};
pub use error::ReindexError;
pub use metadata::{
    BagMetadata, MetadataWriter, TopicSink, BAG_METADATA_VERSION, METADATA_FILENAME,
};
pub use reindex::{reindex, ReindexSummary};
