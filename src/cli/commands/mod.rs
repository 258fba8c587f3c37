//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `serve`: Run the gateway HTTP server
//! - `search`: Query one provider through the gateway
//! - `detail`: Fetch a track's detail, lyric or cover art
//! - `play`: Search, resolve and record a song
//! - `history`: Show or edit play history and favorites
//! - `config`: Show or write the configuration file

mod configure;
mod detail;
mod history;
mod play;
mod search;
mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::gateway::Gateway;
use crate::platform::{PlatformKey, Platforms};
use crate::playback::{
    HttpManager, JsonFileStore, LocalManager, ManagerApi, MemoryStore, Notifier, PlaybackEngine,
    Storage,
};

pub use configure::cmd_config;
pub use detail::cmd_detail;
pub use history::cmd_history;
pub use play::cmd_play;
pub use search::cmd_search;
pub use serve::cmd_serve;

/// Music Aggregator CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: OS config directory)
    #[arg(long, global = true, env = "MUSIC_AGGREGATOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway HTTP server
    Serve {
        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Search one provider
    Search {
        /// Free-text query
        term: String,
        /// Provider: gdstudio, cenguigui, xfabe
        #[arg(short, long)]
        platform: Option<PlatformKey>,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
        /// Result page
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Print the raw response envelope
        #[arg(long)]
        json: bool,
    },
    /// Fetch a track's detail, lyric or cover art
    Detail {
        /// Track, cover or lyric identifier
        term: String,
        /// Provider: gdstudio, cenguigui, xfabe
        #[arg(short, long)]
        platform: Option<PlatformKey>,
        /// Fetch `pic` or `lyric` instead of the playable detail
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Bitrate in kbps
        #[arg(short, long)]
        quality: Option<u32>,
        /// Search position (cenguigui)
        #[arg(long)]
        index: Option<u32>,
        /// Cover edge length in pixels
        #[arg(long)]
        size: Option<u32>,
    },
    /// Search, resolve and record a song in history
    Play {
        /// Free-text query
        term: String,
        /// Provider: gdstudio, cenguigui, xfabe
        #[arg(short, long)]
        platform: Option<PlatformKey>,
        /// Which search result to play (0 = first)
        #[arg(short = 'n', long, default_value_t = 0)]
        index: usize,
        /// Bitrate in kbps
        #[arg(short, long)]
        quality: Option<u32>,
        /// Mark the song as a favorite once resolved
        #[arg(long)]
        favorite: bool,
    },
    /// Show play history
    History {
        /// Show favorites instead
        #[arg(long)]
        favorites: bool,
        /// Remove the history entry at this position
        #[arg(long)]
        remove: Option<usize>,
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the effective configuration
    Config {
        /// Write it to the config file, filling in defaults
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified
/// (meaning the gateway should be served with configured defaults).
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let Some(command) = &cli.command else {
        return Ok(false);
    };

    let rt = Runtime::new()?;
    let config = load_config(cli);

    match command {
        Commands::Serve { bind } => cmd_serve(&rt, &config, bind.as_deref())?,
        Commands::Search {
            term,
            platform,
            limit,
            page,
            json,
        } => cmd_search(&rt, &config, term, *platform, *limit, *page, *json)?,
        Commands::Detail {
            term,
            platform,
            kind,
            quality,
            index,
            size,
        } => cmd_detail(
            &rt,
            &config,
            term,
            *platform,
            kind.as_deref(),
            *quality,
            *index,
            *size,
        )?,
        Commands::Play {
            term,
            platform,
            index,
            quality,
            favorite,
        } => cmd_play(&rt, &config, term, *platform, *index, *quality, *favorite)?,
        Commands::History {
            favorites,
            remove,
            limit,
        } => cmd_history(&config, *favorites, *remove, *limit)?,
        Commands::Config { init } => cmd_config(&config, cli.config.as_deref(), *init)?,
    }
    Ok(true)
}

/// Serve the gateway when no subcommand was given.
pub fn serve_default(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    cmd_serve(&rt, &load_config(cli), None)
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
}

/// In-process gateway over the real provider clients.
pub(crate) fn build_gateway(config: &Config) -> Gateway {
    Gateway::new(Platforms::from_config(&config.upstream))
}

/// Storage under the configured data directory, or memory if there is none.
pub(crate) fn build_storage(config: &Config) -> Arc<dyn Storage> {
    match config.storage.resolve_data_dir() {
        Some(dir) => Arc::new(JsonFileStore::new(dir)),
        None => {
            tracing::warn!("Could not determine data directory, history will not be saved");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Engine talking to `manager_url` when configured, otherwise in-process.
pub(crate) fn build_engine(config: &Config, notifier: Arc<dyn Notifier>) -> PlaybackEngine {
    let manager: Arc<dyn ManagerApi> = match &config.playback.manager_url {
        Some(url) => Arc::new(HttpManager::with_timeout(url, config.upstream.request_timeout())),
        None => Arc::new(LocalManager::new(Arc::new(build_gateway(config)))),
    };

    PlaybackEngine::new(manager, notifier)
        .with_storage(build_storage(config))
        .with_default_platform(config.playback.default_platform)
        .with_quality(config.playback.default_quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_serve() {
        let cli = Cli::try_parse_from(["music-aggregator"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_search() {
        let cli =
            Cli::try_parse_from(["music-aggregator", "search", "晴天", "-p", "xfabe", "-l", "5"])
                .unwrap();
        match cli.command {
            Some(Commands::Search {
                term,
                platform,
                limit,
                page,
                json,
            }) => {
                assert_eq!(term, "晴天");
                assert_eq!(platform, Some(PlatformKey::Xfabe));
                assert_eq!(limit, 5);
                assert_eq!(page, 1);
                assert!(!json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_unknown_platform_rejected() {
        assert!(Cli::try_parse_from(["music-aggregator", "search", "x", "-p", "spotify"]).is_err());
    }

    #[test]
    fn test_parse_detail_type() {
        let cli = Cli::try_parse_from(["music-aggregator", "detail", "123", "--type", "lyric"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Detail { kind: Some(ref k), .. }) if k == "lyric"
        ));
    }

    #[test]
    fn test_build_storage_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());

        let storage = build_storage(&config);
        storage.set("sample", &serde_json::json!(1)).unwrap();
        assert!(dir.path().join("sample.json").exists());
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["music-aggregator", "config", "--init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { init: true })));
    }
}
