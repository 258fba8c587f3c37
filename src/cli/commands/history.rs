//! Play history and favorites commands.

use std::sync::Arc;

use super::build_engine;
use crate::config::Config;
use crate::playback::{Song, TracingNotifier};

/// List history or favorites, or remove one history entry
pub fn cmd_history(
    config: &Config,
    favorites: bool,
    remove: Option<usize>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let engine = build_engine(config, Arc::new(TracingNotifier));
    engine.restore();
    let state = engine.snapshot();

    if let Some(position) = remove {
        let Some(song) = state.history.entries().get(position) else {
            anyhow::bail!("No history entry at position {}", position);
        };
        engine.remove_from_history(song);
        println!("Removed {}", song.label());
        return Ok(());
    }

    let (title, entries) = if favorites {
        ("Favorites", state.favorites.entries())
    } else {
        ("Play history", state.history.entries())
    };

    if entries.is_empty() {
        println!("{}: empty", title);
        return Ok(());
    }

    println!("{} ({} songs)", title, entries.len());
    println!("{}", "=".repeat(title.len()));
    for (i, song) in entries.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        println!("{:>3}. {}", i, describe(song));
    }
    Ok(())
}

fn describe(song: &Song) -> String {
    let played = song
        .played_at
        .map(|t| format!("  {}", t.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    format!("{} ({}){}", song.label(), song.platform, played)
}
