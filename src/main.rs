//! Music Aggregator - one search gateway in front of several music APIs.
//!
//! The gateway normalizes search, detail, lyric and cover-art lookups from a
//! fixed set of providers behind `/api/manager`. The playback engine resolves
//! search hits into playable songs and keeps queue, history and favorites.
//! Run without a subcommand to serve the gateway.

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod platform;
pub mod playback;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("music_aggregator=info".parse()?))
        .init();

    // Try to run a CLI command
    if cli::run_command(&args)? {
        // A command was executed, exit normally
        return Ok(());
    }

    // No command specified, serve the gateway
    cli::serve_default(&args)
}
