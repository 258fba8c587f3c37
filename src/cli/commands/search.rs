//! Provider search command.

use tokio::runtime::Runtime;

use super::build_gateway;
use crate::config::Config;
use crate::gateway::{GatewayData, ManagerQuery};
use crate::platform::PlatformKey;

/// Search one provider through the in-process gateway
pub fn cmd_search(
    rt: &Runtime,
    config: &Config,
    term: &str,
    platform: Option<PlatformKey>,
    limit: u32,
    page: u32,
    json: bool,
) -> anyhow::Result<()> {
    let platform = platform.unwrap_or(config.playback.default_platform);
    let gateway = build_gateway(config);
    let query = ManagerQuery::from_pairs([
        ("action", "search".to_string()),
        ("platform", platform.to_string()),
        ("term", term.to_string()),
        ("limit", limit.to_string()),
        ("page", page.to_string()),
    ]);

    let (status, envelope) = rt.block_on(gateway.respond(&query));

    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    match envelope.data {
        Some(GatewayData::Songs(songs)) if songs.is_empty() => {
            println!("No results for {:?} on {}", term, platform);
        }
        Some(GatewayData::Songs(songs)) => {
            println!("Results for {:?} on {}:", term, platform);
            for (i, song) in songs.iter().enumerate() {
                let album = if song.album.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", song.album)
                };
                println!("{:>3}. {} - {}{}  (id {})", i, song.title, song.artist, album, song.id);
            }
        }
        _ => anyhow::bail!(
            "{} (HTTP {})",
            envelope.error.unwrap_or_else(|| "Search failed".to_string()),
            status
        ),
    }
    Ok(())
}
