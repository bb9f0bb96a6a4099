//! bag - CLI for reindexing sqlite3 recording bags

mod cli;
mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match &cli.command {
        Command::Reindex {
            bag,
            storage,
            compression_format,
            compression_mode,
            test_output_dir,
        } => commands::reindex::run(
            &cli,
            bag,
            storage,
            *compression_format,
            *compression_mode,
            test_output_dir.as_deref(),
        ),

        Command::Info { bag } => commands::info::run(&cli, bag),

        Command::Doctor { bag } => commands::doctor::run(&cli, bag),
    }
}
