//! Reindex command - rebuild metadata.yaml for a bag

use anyhow::{Context, Result};
use bag_core::{CompressionFormat, CompressionMode, CompressionSpec, ReindexOptions};
use std::path::Path;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human};

pub fn run(
    cli: &Cli,
    bag: &Path,
    storage: &str,
    compression_format: CompressionFormat,
    compression_mode: CompressionMode,
    output_dir: Option<&Path>,
) -> Result<()> {
    let mut options = ReindexOptions::new()
        .with_storage_identifier(storage)
        .with_compression(CompressionSpec::new(compression_format, compression_mode));
    if let Some(dir) = output_dir {
        options = options.with_output_dir(dir);
    }
    debug!(?options, bag = %bag.display(), "reindex options");

    let summary = bag_reindexer::reindex(bag, &options)
        .with_context(|| format!("Failed to reindex bag {}", bag.display()))?;

    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Reindex Complete"));
            println!();
            println!(
                "  {}: {}",
                colors::label("Metadata"),
                summary.metadata_path.display()
            );
            println!(
                "  {}: {}",
                colors::label("Shards"),
                colors::format_count(summary.shard_count as u64)
            );
            println!(
                "  {}: {}",
                colors::label("Topics"),
                colors::format_count(summary.topic_count as u64)
            );
            println!(
                "  {}: {}",
                colors::label("Messages"),
                colors::format_count(summary.message_count)
            );
            println!(
                "  {}: {}",
                colors::label("Start"),
                colors::value(&human::format_timestamp(summary.starting_time))
            );
            println!(
                "  {}: {}",
                colors::label("Duration"),
                colors::value(&human::format_duration(summary.duration))
            );
            println!();
            if summary.message_count == 0 {
                println!("{}", colors::warning("Bag contains no messages"));
            } else {
                println!("{}", colors::success("Metadata rebuilt"));
            }
        }

        OutputFormat::Json => {
            let output = serde_json::json!({
                "metadata_path": summary.metadata_path.to_string_lossy(),
                "shard_count": summary.shard_count,
                "topic_count": summary.topic_count,
                "message_count": summary.message_count,
                "starting_time": summary.starting_time,
                "duration": summary.duration,
                "status": "ok"
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        OutputFormat::Minimal => {
            println!("{}", summary.metadata_path.display());
        }
    }

    Ok(())
}
