//! Adapter layer: Convert Cenguigui payloads to domain models

use serde_json::Value;

use super::dto;
use crate::platform::domain::{NormalizedSong, PlatformKey, TrackDetail};

const SOURCE: PlatformKey = PlatformKey::Cenguigui;

/// Convert a search payload; the hit number doubles as ID and index
pub fn to_search_results(payload: &Value) -> Vec<NormalizedSong> {
    let response: dto::SearchResponse = match serde_json::from_value(payload.clone()) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Unexpected cenguigui search payload: {}", e);
            return Vec::new();
        }
    };

    response
        .data
        .into_iter()
        .map(|item| {
            let n = item.n.unwrap_or_default();
            NormalizedSong {
                index: n.parse().ok(),
                id: n,
                title: item.title.unwrap_or_default(),
                artist: item.singer.unwrap_or_default(),
                album: String::new(),
                cover: item.cover,
                cover_id: None,
                lyric_id: None,
                duration: None,
                source: SOURCE,
            }
        })
        .collect()
}

/// Convert a detail payload; `None` when there is no playable URL
pub fn to_detail(payload: &Value) -> Option<TrackDetail> {
    let response: dto::DetailResponse = serde_json::from_value(payload.clone()).ok()?;
    let item = response.data?;
    let url = item.url.filter(|u| !u.is_empty())?;

    Some(TrackDetail {
        url,
        id: item.title.clone(),
        title: item.title,
        artist: item.singer,
        album: Some(String::new()),
        cover: item.cover,
        lyric: item.lrc,
        quality: None,
        size: None,
        duration: None,
        pay: None,
        source: SOURCE,
    })
}
