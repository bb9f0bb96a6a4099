//! bag-core - Core types and compression policy for bag reindexing
//!
//! This crate provides the data model shared by the shard reader, the
//! aggregator and the CLI. It performs no I/O.

pub mod compression;
pub mod options;
pub mod types;

pub use compression::*;
pub use options::*;
pub use types::*;
