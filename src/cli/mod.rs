//! Command-line interface for music-aggregator.
//!
//! This module provides CLI commands for running the gateway, querying it
//! in-process, and resolving songs from a terminal.

mod commands;

pub use commands::{Cli, Commands, run_command, serve_default};
