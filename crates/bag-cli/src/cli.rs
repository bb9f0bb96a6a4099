//! CLI argument definitions

use bag_core::{CompressionFormat, CompressionMode, DEFAULT_STORAGE_ID};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rebuild and inspect the metadata of sqlite3 recording bags
#[derive(Parser, Debug)]
#[command(name = "bag")]
#[command(version)]
#[command(about = "Rebuild and inspect the metadata of sqlite3 recording bags")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// Minimal text output
    Minimal,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconstruct metadata.yaml from the shard files of a bag
    Reindex {
        /// Bag directory to reindex
        #[arg(value_parser = existing_path)]
        bag: PathBuf,

        /// Storage identifier written into the metadata
        #[arg(short, long, default_value = DEFAULT_STORAGE_ID, env = "BAG_STORAGE_ID")]
        storage: String,

        /// Compression format of the bag ("" or zstd)
        #[arg(short = 'c', long, default_value_t = CompressionFormat::None)]
        compression_format: CompressionFormat,

        /// Whether the bag is compressed by file or by message
        #[arg(short = 'm', long, default_value_t = CompressionMode::None)]
        compression_mode: CompressionMode,

        /// Write metadata.yaml to this directory instead of the bag directory
        #[arg(short = 't', long)]
        test_output_dir: Option<PathBuf>,
    },

    /// Show the metadata descriptor of a bag
    Info {
        /// Bag directory
        #[arg(value_parser = existing_path)]
        bag: PathBuf,
    },

    /// Diagnose whether a bag can be reindexed
    Doctor {
        /// Bag directory
        bag: PathBuf,
    },
}

fn existing_path(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("path does not exist: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindex_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let bag = tmp.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["bag", "reindex", bag]).unwrap();
        match cli.command {
            Command::Reindex {
                storage,
                compression_format,
                compression_mode,
                test_output_dir,
                ..
            } => {
                assert_eq!(storage, "sqlite3");
                assert_eq!(compression_format, CompressionFormat::None);
                assert_eq!(compression_mode, CompressionMode::None);
                assert!(test_output_dir.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_reindex_compression_flags() {
        let tmp = tempfile::tempdir().unwrap();
        let bag = tmp.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["bag", "reindex", bag, "-c", "zstd", "-m", "message"])
            .unwrap();
        match cli.command {
            Command::Reindex {
                compression_format,
                compression_mode,
                ..
            } => {
                assert_eq!(compression_format, CompressionFormat::Zstd);
                assert_eq!(compression_mode, CompressionMode::Message);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_compression_mode_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let bag = tmp.path().to_str().unwrap();

        let result = Cli::try_parse_from(["bag", "reindex", bag, "-m", "chunk"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_bag_is_rejected() {
        let result = Cli::try_parse_from(["bag", "reindex", "/nonexistent/bag"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_counts() {
        let tmp = tempfile::tempdir().unwrap();
        let bag = tmp.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["bag", "-vv", "info", bag]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
