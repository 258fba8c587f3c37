//! Track detail command.

use tokio::runtime::Runtime;

use super::build_gateway;
use crate::config::Config;
use crate::gateway::ManagerQuery;
use crate::platform::PlatformKey;

/// Fetch a detail, lyric or picture and print the response envelope
#[allow(clippy::too_many_arguments)]
pub fn cmd_detail(
    rt: &Runtime,
    config: &Config,
    term: &str,
    platform: Option<PlatformKey>,
    kind: Option<&str>,
    quality: Option<u32>,
    index: Option<u32>,
    size: Option<u32>,
) -> anyhow::Result<()> {
    let platform = platform.unwrap_or(config.playback.default_platform);

    let mut pairs = vec![
        ("action", "detail".to_string()),
        ("platform", platform.to_string()),
        ("term", term.to_string()),
    ];
    if let Some(kind) = kind {
        pairs.push(("type", kind.to_string()));
    }
    if let Some(quality) = quality {
        pairs.push(("quality", quality.to_string()));
    }
    if let Some(index) = index {
        pairs.push(("index", index.to_string()));
    }
    if let Some(size) = size {
        pairs.push(("size", size.to_string()));
    }

    let gateway = build_gateway(config);
    let (status, envelope) = rt.block_on(gateway.respond(&ManagerQuery::from_pairs(pairs)));

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    if !envelope.success {
        anyhow::bail!("Gateway returned HTTP {}", status);
    }
    Ok(())
}
