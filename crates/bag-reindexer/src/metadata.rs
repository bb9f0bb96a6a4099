//! Metadata descriptor accumulation and persistence
//!
//! `MetadataWriter` collects the descriptor fields while shards are scanned
//! and writes them out in the rosbag2 `metadata.yaml` layout.

use bag_core::{CompressionSpec, TopicStat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ReindexError;

/// Descriptor layout version written by this crate
pub const BAG_METADATA_VERSION: u32 = 4;

/// File name of the descriptor inside a bag directory
pub const METADATA_FILENAME: &str = "metadata.yaml";

/// Receives topic statistics as shards are scanned
pub trait TopicSink {
    fn add_topic(&mut self, stat: TopicStat) -> Result<(), ReindexError>;
}

/// Top-level document of `metadata.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetadataDocument {
    rosbag2_bagfile_information: BagMetadata,
}

/// Archive-wide metadata descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagMetadata {
    pub version: u32,
    pub storage_identifier: String,
    pub relative_file_paths: Vec<String>,
    pub duration: Duration,
    pub starting_time: StartingTime,
    pub message_count: u64,
    pub topics_with_message_count: Vec<TopicInformation>,
    #[serde(default)]
    pub compression_format: String,
    #[serde(default)]
    pub compression_mode: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duration {
    pub nanoseconds: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingTime {
    pub nanoseconds_since_epoch: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInformation {
    pub topic_metadata: TopicMetadata,
    pub message_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub topic_type: String,
    pub serialization_format: String,
    #[serde(default)]
    pub offered_qos_profiles: String,
}

impl BagMetadata {
    /// Read the descriptor from a bag directory
    pub fn load(dir: &Path) -> Result<Self, ReindexError> {
        let content = fs::read_to_string(dir.join(METADATA_FILENAME))?;
        let doc: MetadataDocument = serde_yaml::from_str(&content)?;
        Ok(doc.rosbag2_bagfile_information)
    }

    /// Render the descriptor as YAML
    pub fn to_yaml(&self) -> Result<String, ReindexError> {
        let doc = MetadataDocument {
            rosbag2_bagfile_information: self.clone(),
        };
        Ok(serde_yaml::to_string(&doc)?)
    }
}

/// Accumulates descriptor fields during a reindex run
#[derive(Debug, Clone)]
pub struct MetadataWriter {
    storage_identifier: String,
    relative_file_paths: Vec<String>,
    compression: CompressionSpec,
    topics: Vec<TopicInformation>,
    topic_index: HashMap<String, usize>,
    starting_time: i64,
    duration: i64,
    message_count: u64,
}

impl MetadataWriter {
    pub fn new(
        storage_identifier: impl Into<String>,
        relative_file_paths: Vec<String>,
        compression: CompressionSpec,
    ) -> Self {
        Self {
            storage_identifier: storage_identifier.into(),
            relative_file_paths,
            compression,
            topics: Vec::new(),
            topic_index: HashMap::new(),
            starting_time: 0,
            duration: 0,
            message_count: 0,
        }
    }

    pub fn set_starting_time(&mut self, nanoseconds_since_epoch: i64) {
        self.starting_time = nanoseconds_since_epoch;
    }

    pub fn set_duration(&mut self, nanoseconds: i64) {
        self.duration = nanoseconds;
    }

    /// Recompute the total message count from the merged topics
    pub fn finalize_message_count(&mut self) -> u64 {
        self.message_count = self.topics.iter().map(|t| t.message_count).sum();
        self.message_count
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Snapshot of the descriptor as it would be persisted
    pub fn to_metadata(&self) -> BagMetadata {
        BagMetadata {
            version: BAG_METADATA_VERSION,
            storage_identifier: self.storage_identifier.clone(),
            relative_file_paths: self.relative_file_paths.clone(),
            duration: Duration {
                nanoseconds: self.duration,
            },
            starting_time: StartingTime {
                nanoseconds_since_epoch: self.starting_time,
            },
            message_count: self.message_count,
            topics_with_message_count: self.topics.clone(),
            compression_format: self.compression.format.as_metadata_str().to_string(),
            compression_mode: self.compression.mode.as_metadata_str().to_string(),
        }
    }

    /// Write `metadata.yaml` into `dir`, replacing any existing descriptor
    pub fn persist(&self, dir: &Path) -> Result<PathBuf, ReindexError> {
        if !dir.is_dir() {
            return Err(ReindexError::invalid_path(dir, "not a directory"));
        }

        let yaml = self.to_metadata().to_yaml()?;
        let target = dir.join(METADATA_FILENAME);
        let staging = dir.join(format!("{}.tmp", METADATA_FILENAME));

        fs::write(&staging, yaml)?;
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        debug!(path = %target.display(), "metadata written");
        Ok(target)
    }
}

impl TopicSink for MetadataWriter {
    /// Merge by topic name: counts are summed, descriptive fields must agree
    fn add_topic(&mut self, stat: TopicStat) -> Result<(), ReindexError> {
        let Some(idx) = self.topic_index.get(&stat.name).copied() else {
            self.topic_index.insert(stat.name.clone(), self.topics.len());
            self.topics.push(TopicInformation {
                message_count: stat.message_count,
                topic_metadata: TopicMetadata {
                    name: stat.name,
                    topic_type: stat.topic_type,
                    serialization_format: stat.serialization_format,
                    offered_qos_profiles: stat.offered_qos_profiles,
                },
            });
            return Ok(());
        };

        let existing = &mut self.topics[idx];
        let meta = &existing.topic_metadata;
        for (field, expected, found) in [
            ("type", &meta.topic_type, &stat.topic_type),
            (
                "serialization_format",
                &meta.serialization_format,
                &stat.serialization_format,
            ),
            (
                "offered_qos_profiles",
                &meta.offered_qos_profiles,
                &stat.offered_qos_profiles,
            ),
        ] {
            if expected != found {
                return Err(ReindexError::TopicMismatch {
                    topic: stat.name,
                    field,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }

        existing.message_count += stat.message_count;
        Ok(())
    }
}
