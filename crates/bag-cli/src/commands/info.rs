//! Info command - show an existing metadata descriptor

use anyhow::{Context, Result};
use bag_reindexer::BagMetadata;
use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, human};

pub fn run(cli: &Cli, bag: &Path) -> Result<()> {
    let meta = BagMetadata::load(bag)
        .with_context(|| format!("Failed to read metadata of bag {}", bag.display()))?;

    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Bag Information"));
            println!();
            println!("  {}: {}", colors::label("Path"), bag.display());
            println!(
                "  {}: {}",
                colors::label("Version"),
                colors::value(&meta.version.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("Storage"),
                colors::value(&meta.storage_identifier)
            );
            println!(
                "  {}: {}",
                colors::label("Files"),
                colors::value(&meta.relative_file_paths.join(", "))
            );
            println!(
                "  {}: {}/{}",
                colors::label("Compression"),
                display_or_none(&meta.compression_format),
                display_or_none(&meta.compression_mode)
            );
            println!(
                "  {}: {}",
                colors::label("Start"),
                colors::value(&human::format_timestamp(
                    meta.starting_time.nanoseconds_since_epoch
                ))
            );
            println!(
                "  {}: {}",
                colors::label("Duration"),
                colors::value(&human::format_duration(meta.duration.nanoseconds))
            );
            println!(
                "  {}: {}",
                colors::label("Messages"),
                colors::format_count(meta.message_count)
            );
            println!();

            for topic in &meta.topics_with_message_count {
                println!(
                    "  {} {} [{}] {}",
                    colors::topic(&topic.topic_metadata.name),
                    colors::value(&topic.topic_metadata.topic_type),
                    topic.topic_metadata.serialization_format,
                    colors::format_count(topic.message_count)
                );
            }
        }

        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }

        OutputFormat::Minimal => {
            for topic in &meta.topics_with_message_count {
                println!("{}\t{}", topic.topic_metadata.name, topic.message_count);
            }
        }
    }

    Ok(())
}

fn display_or_none(s: &str) -> &str {
    if s.is_empty() {
        "none"
    } else {
        s
    }
}
