//! Log subscriber setup
//!
//! Logs go to stderr so that `--format json` output on stdout stays parseable.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber; `RUST_LOG` takes precedence over `-v`
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
