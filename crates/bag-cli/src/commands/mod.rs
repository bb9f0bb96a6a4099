//! CLI command implementations

pub mod doctor;
pub mod info;
pub mod reindex;
