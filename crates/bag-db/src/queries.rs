//! Per-topic statistics query

use bag_core::{ShardStats, TimeBounds, TopicStat};
use std::path::Path;
use tracing::debug;

use crate::connection::{ShardDb, ShardError};

/// One row of the grouped topic query
#[derive(Debug, Clone)]
struct TopicRow {
    name: String,
    topic_type: String,
    serialization_format: String,
    message_count: i64,
    min_timestamp: i64,
    max_timestamp: i64,
    offered_qos_profiles: String,
}

const TOPIC_STATS_SQL: &str = r#"
    SELECT
        topics.name AS name,
        topics.type AS type,
        topics.serialization_format AS serialization_format,
        COUNT(messages.id) AS message_count,
        MIN(messages.timestamp) AS min_timestamp,
        MAX(messages.timestamp) AS max_timestamp,
        topics.offered_qos_profiles AS offered_qos_profiles
    FROM messages
    JOIN topics ON topics.id = messages.topic_id
    GROUP BY topics.name
    ORDER BY topics.name
"#;

impl ShardDb {
    /// Collect per-topic statistics and the shard's timestamp bounds
    ///
    /// Topics without messages are not reported. A shard without messages
    /// yields no topics and no bounds.
    pub fn extract(&self) -> Result<ShardStats, ShardError> {
        let mut stmt = self.conn.prepare(TOPIC_STATS_SQL)?;
        let rows = stmt.query_map([], row_to_topic_row)?;

        let mut stats = ShardStats::default();
        for row in rows {
            let row = row?;
            debug!(
                shard = %self.path().display(),
                topic = %row.name,
                count = row.message_count,
                min = row.min_timestamp,
                max = row.max_timestamp,
                "topic row"
            );

            let bounds = TimeBounds::new(row.min_timestamp, row.max_timestamp);
            stats.bounds = TimeBounds::merge_opt(stats.bounds, Some(bounds));
            stats.topics.push(row.into_topic_stat()?);
        }

        Ok(stats)
    }
}

impl TopicRow {
    fn into_topic_stat(self) -> Result<TopicStat, ShardError> {
        let message_count =
            u64::try_from(self.message_count).map_err(|_| ShardError::InvalidValue {
                column: "message_count",
                value: self.message_count,
            })?;

        Ok(TopicStat {
            name: self.name,
            topic_type: self.topic_type,
            serialization_format: self.serialization_format,
            message_count,
            offered_qos_profiles: self.offered_qos_profiles,
        })
    }
}

fn row_to_topic_row(row: &rusqlite::Row) -> Result<TopicRow, rusqlite::Error> {
    Ok(TopicRow {
        name: row.get("name")?,
        topic_type: row.get("type")?,
        serialization_format: row.get("serialization_format")?,
        message_count: row.get("message_count")?,
        min_timestamp: row.get("min_timestamp")?,
        max_timestamp: row.get("max_timestamp")?,
        offered_qos_profiles: row.get("offered_qos_profiles")?,
    })
}

/// Open a shard, verify its schema, extract its statistics and close it
pub fn extract_shard(path: &Path) -> Result<ShardStats, ShardError> {
    let db = ShardDb::open_checked(path)?;
    db.extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    const SCHEMA: &str = "
        CREATE TABLE topics (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            serialization_format TEXT NOT NULL,
            offered_qos_profiles TEXT NOT NULL
        );
        CREATE TABLE messages (
            id INTEGER PRIMARY KEY,
            topic_id INTEGER NOT NULL,
            timestamp INTEGER NOT NULL,
            data BLOB NOT NULL
        );";

    fn write_shard(path: &Path, sql: &str) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(sql).unwrap();
    }

    #[test]
    fn test_extract_two_topics() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bag_0.db3");
        write_shard(
            &path,
            "INSERT INTO topics VALUES (1, '/a', 'std_msgs/msg/String', 'cdr', 'qos-a');
             INSERT INTO topics VALUES (2, '/b', 'std_msgs/msg/Int32', 'cdr', 'qos-b');
             INSERT INTO messages (topic_id, timestamp, data) VALUES
                (1, 10, x''), (1, 20, x''), (1, 30, x''), (1, 40, x''), (1, 50, x''),
                (2, 20, x''), (2, 30, x''), (2, 40, x'');",
        );

        let stats = extract_shard(&path).unwrap();
        assert_eq!(stats.topics.len(), 2);
        assert_eq!(stats.topics[0].name, "/a");
        assert_eq!(stats.topics[0].message_count, 5);
        assert_eq!(stats.topics[0].topic_type, "std_msgs/msg/String");
        assert_eq!(stats.topics[0].offered_qos_profiles, "qos-a");
        assert_eq!(stats.topics[1].name, "/b");
        assert_eq!(stats.topics[1].message_count, 3);
        assert_eq!(stats.min_timestamp(), Some(10));
        assert_eq!(stats.max_timestamp(), Some(50));
        assert_eq!(stats.message_count(), 8);
    }

    #[test]
    fn test_topic_without_messages_is_omitted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bag_0.db3");
        write_shard(
            &path,
            "INSERT INTO topics VALUES (1, '/a', 'std_msgs/msg/String', 'cdr', '');
             INSERT INTO topics VALUES (2, '/silent', 'std_msgs/msg/String', 'cdr', '');
             INSERT INTO messages (topic_id, timestamp, data) VALUES (1, 7, x'00');",
        );

        let stats = extract_shard(&path).unwrap();
        assert_eq!(stats.topics.len(), 1);
        assert_eq!(stats.topics[0].name, "/a");
        assert_eq!(stats.bounds, Some(TimeBounds::at(7)));
    }

    #[test]
    fn test_empty_shard_has_no_bounds() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bag_0.db3");
        write_shard(
            &path,
            "INSERT INTO topics VALUES (1, '/a', 'std_msgs/msg/String', 'cdr', '');",
        );

        let stats = extract_shard(&path).unwrap();
        assert!(stats.is_empty());
        assert_eq!(stats.bounds, None);
    }

    #[test]
    fn test_missing_qos_column_is_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bag_0.db3");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE topics (id INTEGER PRIMARY KEY, name TEXT, type TEXT,
                                      serialization_format TEXT);
                 CREATE TABLE messages (id INTEGER PRIMARY KEY, topic_id INTEGER,
                                        timestamp INTEGER, data BLOB);",
            )
            .unwrap();
        }

        let result = extract_shard(&path);
        assert!(matches!(result, Err(ShardError::Sqlite(_))));
    }
}
