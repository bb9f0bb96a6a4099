//! Doctor command - diagnose whether a bag can be reindexed

use anyhow::{bail, Result};
use bag_core::CompressionSpec;
use bag_db::extract_shard;
use bag_reindexer::{find_shard_files, relative_paths, BagMetadata, METADATA_FILENAME};
use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::output::colors;

pub fn run(cli: &Cli, bag: &Path) -> Result<()> {
    let checks = collect_checks(bag);
    let all_passed = checks.iter().all(|c| c.passed);

    match cli.format {
        OutputFormat::Human => {
            println!("{}", colors::header("Bag Doctor"));
            println!();

            for check in &checks {
                let status = if check.passed {
                    colors::success(&check.name)
                } else {
                    colors::error(&check.name)
                };
                println!("  {} - {}", status, check.details);
            }

            println!();
            if all_passed {
                println!("{}", colors::success("All checks passed"));
            } else {
                println!("{}", colors::error("Some checks failed"));
            }
        }

        OutputFormat::Json => {
            let output = serde_json::json!({
                "checks": checks.iter().map(|c| serde_json::json!({
                    "name": c.name,
                    "passed": c.passed,
                    "details": c.details
                })).collect::<Vec<_>>(),
                "all_passed": all_passed
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        OutputFormat::Minimal => {
            let failed: Vec<_> = checks.iter().filter(|c| !c.passed).collect();
            if failed.is_empty() {
                println!("ok");
            } else {
                for c in failed {
                    println!("FAIL: {}", c.name);
                }
            }
        }
    }

    if !all_passed {
        bail!("bag {} failed diagnostics", bag.display());
    }
    Ok(())
}

#[derive(Debug)]
struct Check {
    name: String,
    passed: bool,
    details: String,
}

impl Check {
    fn new(name: impl Into<String>, passed: bool, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            details: details.into(),
        }
    }
}

fn collect_checks(bag: &Path) -> Vec<Check> {
    let mut checks = Vec::new();

    // Check 1: Bag directory
    if !bag.is_dir() {
        checks.push(Check::new(
            "Bag directory",
            false,
            format!("{} is not a directory", bag.display()),
        ));
        return checks;
    }
    checks.push(Check::new(
        "Bag directory",
        true,
        format!("Found at {}", bag.display()),
    ));

    // Check 2: Shard discovery
    let shards = match find_shard_files(bag) {
        Ok(shards) => shards,
        Err(e) => {
            checks.push(Check::new("Shard files", false, e.to_string()));
            return checks;
        }
    };
    checks.push(Check::new(
        "Shard files",
        !shards.is_empty(),
        format!("{} shard file(s)", shards.len()),
    ));

    let names = match relative_paths(bag, &shards) {
        Ok(names) => names,
        Err(e) => {
            checks.push(Check::new("Shard names", false, e.to_string()));
            return checks;
        }
    };

    // Check 3: Each shard can be queried
    for (shard, rel) in shards.iter().zip(&names) {
        let name = format!("Shard {}", rel);
        match extract_shard(shard) {
            Ok(stats) => checks.push(Check::new(
                name,
                true,
                format!(
                    "{} topic(s), {} message(s)",
                    stats.topics.len(),
                    stats.message_count()
                ),
            )),
            Err(e) => checks.push(Check::new(name, false, e.to_string())),
        }
    }

    // Check 4: Existing descriptor
    if bag.join(METADATA_FILENAME).exists() {
        match BagMetadata::load(bag) {
            Ok(meta) => {
                let consistent = meta.relative_file_paths == names;
                checks.push(Check::new(
                    "Metadata",
                    consistent,
                    if consistent {
                        format!("{} lists all shard files", METADATA_FILENAME)
                    } else {
                        format!("{} is out of date (run: bag reindex)", METADATA_FILENAME)
                    },
                ));

                // Check 5: Declared compression can be reindexed
                checks.push(compression_check(&meta));
            }
            Err(e) => checks.push(Check::new("Metadata", false, e.to_string())),
        }
    } else {
        checks.push(Check::new(
            "Metadata",
            false,
            format!("{} missing (run: bag reindex)", METADATA_FILENAME),
        ));
    }

    checks
}

fn compression_check(meta: &BagMetadata) -> Check {
    let declared = CompressionSpec::parse(&meta.compression_format, &meta.compression_mode);
    match declared {
        Ok(spec) => match spec.validate() {
            Ok(_) => Check::new("Compression", true, format!("{} can be reindexed", spec)),
            Err(e) => Check::new("Compression", false, e.to_string()),
        },
        Err(e) => Check::new("Compression", false, e.to_string()),
    }
}
