//! Adapter layer: Convert XF Netease payloads to domain models

use serde_json::Value;

use super::dto;
use crate::platform::domain::{LyricPayload, NormalizedSong, PlatformKey, TrackDetail};

const SOURCE: PlatformKey = PlatformKey::Xfabe;

/// Convert a search payload (`data.songs`)
pub fn to_search_results(payload: &Value) -> Vec<NormalizedSong> {
    let response: dto::SearchResponse = match serde_json::from_value(payload.clone()) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Unexpected xfabe search payload: {}", e);
            return Vec::new();
        }
    };

    response
        .data
        .songs
        .into_iter()
        .map(|song| NormalizedSong {
            id: song.id.unwrap_or_default(),
            title: song.name.unwrap_or_default(),
            artist: song.artistsname.unwrap_or_default(),
            album: song.album.unwrap_or_default(),
            cover: None,
            cover_id: None,
            lyric_id: None,
            duration: song.duration,
            source: SOURCE,
            index: None,
        })
        .collect()
}

/// Convert a music payload; `None` when there is no playable URL
pub fn to_detail(payload: &Value) -> Option<TrackDetail> {
    let response: dto::MusicResponse = serde_json::from_value(payload.clone()).ok()?;
    let music = response.data?;
    let url = music.url.filter(|u| !u.is_empty())?;

    Some(TrackDetail {
        url,
        id: music.id,
        title: music.name,
        artist: music.artistsname,
        album: music.album,
        cover: music.picurl,
        lyric: None,
        quality: None,
        size: None,
        duration: music.duration,
        pay: music.pay,
        source: SOURCE,
    })
}

/// Lyrics are handed back exactly as the API sent them
pub fn to_lyric(payload: Value) -> Option<LyricPayload> {
    if payload.is_null() {
        None
    } else {
        Some(LyricPayload::Raw(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_results() {
        let songs = to_search_results(&json!({"data": {"songs": [
            {"id": 1, "name": "N", "artistsname": "A", "album": "B", "duration": 1000}
        ]}}));
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, "1");
        assert_eq!(songs[0].duration, Some(1000));
        assert_eq!(songs[0].source, PlatformKey::Xfabe);
    }

    #[test]
    fn test_search_results_tolerate_missing_songs() {
        assert!(to_search_results(&json!({"data": {}})).is_empty());
        assert!(to_search_results(&json!({"code": 500})).is_empty());
    }

    #[test]
    fn test_detail_maps_cover_and_pay() {
        let detail = to_detail(&json!({"data": {
            "id": 7, "name": "N", "artistsname": "A", "picurl": "https://p/c.jpg",
            "url": "https://m/a.mp3", "pay": 1
        }}))
        .unwrap();
        assert_eq!(detail.cover.as_deref(), Some("https://p/c.jpg"));
        assert_eq!(detail.id.as_deref(), Some("7"));
        assert_eq!(detail.pay, Some(json!(1)));
    }

    #[test]
    fn test_lyric_passthrough() {
        let raw = json!({"code": 200, "lrc": {"lyric": "[00:01.00]x"}});
        assert_eq!(to_lyric(raw.clone()), Some(LyricPayload::Raw(raw)));
        assert!(to_lyric(Value::Null).is_none());
    }
}
