//! Shard file builder for tests
//!
//! Creates shard files with the standard sqlite3 bag schema. Only compiled
//! with the `test-fixtures` feature.

use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::connection::ShardError;

/// Schema written by the sqlite3 storage plugin
pub const SHARD_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS topics (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        serialization_format TEXT NOT NULL,
        offered_qos_profiles TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY,
        topic_id INTEGER NOT NULL,
        timestamp INTEGER NOT NULL,
        data BLOB NOT NULL
    );
    CREATE INDEX IF NOT EXISTS timestamp_idx ON messages (timestamp ASC);";

pub const DEFAULT_TYPE: &str = "std_msgs/msg/String";
pub const DEFAULT_SERIALIZATION: &str = "cdr";

/// Writes topics and messages into a new shard file
pub struct ShardBuilder {
    conn: Connection,
    path: PathBuf,
    topic_ids: HashMap<String, i64>,
}

impl ShardBuilder {
    /// Create the shard file and its schema
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ShardError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        conn.execute_batch(SHARD_SCHEMA)?;
        Ok(Self {
            conn,
            path,
            topic_ids: HashMap::new(),
        })
    }

    /// Declare a topic with explicit type, serialization format and QoS
    pub fn topic(
        &mut self,
        name: &str,
        topic_type: &str,
        serialization_format: &str,
        qos: &str,
    ) -> Result<&mut Self, ShardError> {
        self.conn.execute(
            "INSERT INTO topics (name, type, serialization_format, offered_qos_profiles)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, topic_type, serialization_format, qos],
        )?;
        let id = self.conn.last_insert_rowid();
        self.topic_ids.insert(name.to_string(), id);
        Ok(self)
    }

    /// Append messages to a topic, declaring it with defaults if needed
    pub fn messages<I>(&mut self, topic: &str, timestamps: I) -> Result<&mut Self, ShardError>
    where
        I: IntoIterator<Item = i64>,
    {
        if !self.topic_ids.contains_key(topic) {
            self.topic(topic, DEFAULT_TYPE, DEFAULT_SERIALIZATION, "")?;
        }
        let topic_id = self.topic_ids[topic];

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO messages (topic_id, timestamp, data) VALUES (?1, ?2, ?3)",
            )?;
            for timestamp in timestamps {
                stmt.execute(params![topic_id, timestamp, &[0u8; 4][..]])?;
            }
        }
        tx.commit()?;
        Ok(self)
    }

    /// Close the connection and return the shard path
    pub fn finish(self) -> PathBuf {
        self.path
    }
}
