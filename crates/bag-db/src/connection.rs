//! Shard connection management

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Shard database errors
#[derive(Error, Debug)]
pub enum ShardError {
    #[error("Shard not found at {0}")]
    NotFound(PathBuf),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Shard is missing required tables: {}", .0.join(", "))]
    MissingTables(Vec<String>),

    #[error("Invalid value in column {column}: {value}")]
    InvalidValue { column: &'static str, value: i64 },
}

/// Tables every sqlite3 shard must contain
pub const REQUIRED_TABLES: &[&str] = &["messages", "topics"];

/// File extension of sqlite3 shard files
pub const SHARD_EXTENSION: &str = "db3";

/// Read-only connection to one shard file
///
/// The underlying SQLite handle is released when this value is dropped.
pub struct ShardDb {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl ShardDb {
    /// Open a shard file read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ShardError> {
        let path = path.as_ref().to_path_buf();

        if !path.is_file() {
            return Err(ShardError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(Self { conn, path })
    }

    /// Open a shard and verify it has the expected tables
    pub fn open_checked<P: AsRef<Path>>(path: P) -> Result<Self, ShardError> {
        let db = Self::open(path)?;
        db.check_schema()?;
        Ok(db)
    }

    /// Get the shard path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the tables present in the shard
    pub fn tables(&self) -> Result<Vec<String>, ShardError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tables = Vec::new();
        for row in rows {
            tables.push(row?);
        }
        Ok(tables)
    }

    /// Verify that all required tables exist
    pub fn check_schema(&self) -> Result<(), ShardError> {
        let tables = self.tables()?;
        debug!(shard = %self.path.display(), ?tables, "shard tables");

        let missing: Vec<String> = REQUIRED_TABLES
            .iter()
            .filter(|required| !tables.iter().any(|t| t == *required))
            .map(|t| t.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ShardError::MissingTables(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let result = ShardDb::open(tmp.path().join("missing.db3"));
        assert!(matches!(result, Err(ShardError::NotFound(_))));
    }

    #[test]
    fn test_open_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let result = ShardDb::open(tmp.path());
        assert!(matches!(result, Err(ShardError::NotFound(_))));
    }

    #[test]
    fn test_missing_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("partial.db3");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("CREATE TABLE topics (id INTEGER PRIMARY KEY, name TEXT)")
                .unwrap();
        }

        let result = ShardDb::open_checked(&path);
        match result {
            Err(ShardError::MissingTables(missing)) => {
                assert_eq!(missing, vec!["messages".to_string()]);
            }
            other => panic!("expected MissingTables, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_not_a_database() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("compressed.db3");
        fs::write(&path, b"\x28\xb5\x2f\xfd this is not an sqlite file at all").unwrap();

        let result = ShardDb::open_checked(&path);
        assert!(matches!(result, Err(ShardError::Sqlite(_))));
    }

    #[test]
    fn test_tables_are_listed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("shard.db3");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE topics (id INTEGER PRIMARY KEY);
                 CREATE TABLE messages (id INTEGER PRIMARY KEY);",
            )
            .unwrap();
        }

        let db = ShardDb::open_checked(&path).unwrap();
        assert_eq!(db.tables().unwrap(), vec!["messages", "topics"]);
    }
}
