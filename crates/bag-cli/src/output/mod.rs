//! Output formatting helpers

pub mod colors;
pub mod human;
