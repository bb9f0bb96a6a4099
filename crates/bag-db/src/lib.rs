//! bag-db - Read-only SQLite access to bag shard files
//!
//! Each shard of a sqlite3 bag is a standalone database with a `topics` table
//! and a `messages` table. This crate opens one shard at a time and extracts
//! per-topic statistics from it. It never writes to a shard.

pub mod connection;
#[cfg(feature = "test-fixtures")]
pub mod fixture;
pub mod queries;

pub use connection::*;
pub use queries::*;
