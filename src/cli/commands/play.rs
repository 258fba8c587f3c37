//! Resolve-and-play command.

use std::sync::Arc;

use tokio::runtime::Runtime;

use super::build_engine;
use crate::config::Config;
use crate::platform::PlatformKey;
use crate::playback::{ConsoleNotifier, Lyrics, PlayOutcome, Song};

/// Number of lyric lines previewed after a successful resolution
const LYRIC_PREVIEW: usize = 5;

/// Search, resolve one result and record it in history
pub fn cmd_play(
    rt: &Runtime,
    config: &Config,
    term: &str,
    platform: Option<PlatformKey>,
    index: usize,
    quality: Option<u32>,
    favorite: bool,
) -> anyhow::Result<()> {
    let engine = build_engine(config, Arc::new(ConsoleNotifier));
    engine.restore();

    rt.block_on(async {
        let results = engine.search(term, platform).await?;
        let Some(song) = results.get(index).cloned() else {
            anyhow::bail!(
                "No result #{} for {:?} ({} found)",
                index,
                term,
                results.len()
            );
        };

        let search_index = song.search_index;
        if let PlayOutcome::Ready(song) = engine.play(song, search_index, quality, false).await? {
            print_song(&song);
            if favorite && !engine.is_favorite(&song) {
                engine.toggle_favorite(song);
                println!("Added to favorites");
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn print_song(song: &Song) {
    println!("Now playing: {}", song.label());
    if !song.album.is_empty() {
        println!("  Album:    {}", song.album);
    }
    println!("  Platform: {}", song.platform);
    if let Some(url) = song.playable_url() {
        println!("  Audio:    {}", url);
    }
    if let Some(cover) = &song.cover {
        println!("  Cover:    {}", cover);
    }
    if let Some(quality) = song.quality {
        println!("  Quality:  {} kbps", quality);
    }

    match &song.lyrics {
        lyrics if lyrics.is_empty() => println!("  Lyrics:   none"),
        Lyrics::Cues(cues) => {
            println!("  Lyrics:   {} lines", cues.len());
            for cue in cues.iter().take(LYRIC_PREVIEW) {
                println!("    [{:>8}] {}", cue.time_label(), cue.text);
            }
        }
        Lyrics::Raw(_) => println!("  Lyrics:   provider format"),
    }
}
