//! Adapter layer: Convert GD Studio payloads to domain models
//!
//! Conversion is tolerant: a payload that is missing or not the expected
//! container yields an empty list or `None`, never an error.

use serde_json::Value;

use super::dto;
use crate::platform::domain::{
    LyricPayload, LyricText, NormalizedSong, Picture, PlatformKey, TrackDetail,
};

const SOURCE: PlatformKey = PlatformKey::Gdstudio;

/// Convert a `types=search` payload into search results
pub fn to_search_results(payload: &Value) -> Vec<NormalizedSong> {
    if !payload.is_array() {
        return Vec::new();
    }

    let items: Vec<dto::SearchItem> = match serde_json::from_value(payload.clone()) {
        Ok(items) => items,
        Err(e) => {
            tracing::debug!("Unexpected gdstudio search payload: {}", e);
            return Vec::new();
        }
    };

    items.into_iter().map(to_song).collect()
}

fn to_song(item: dto::SearchItem) -> NormalizedSong {
    let artist = match item.artist {
        Some(dto::ArtistField::One(name)) => name,
        Some(dto::ArtistField::Many(names)) => names.join(", "),
        None => String::new(),
    };

    NormalizedSong {
        id: item.id.unwrap_or_default(),
        title: item.name.unwrap_or_default(),
        artist,
        album: item.album.unwrap_or_default(),
        cover: None,
        cover_id: item.pic_id,
        lyric_id: item.lyric_id,
        duration: None,
        source: SOURCE,
        index: None,
    }
}

/// Convert a `types=url` payload; `None` when no stream URL was provided
pub fn to_detail(payload: &Value) -> Option<TrackDetail> {
    let response: dto::UrlResponse = serde_json::from_value(payload.clone()).ok()?;
    let url = response.url.filter(|u| !u.is_empty())?;

    Some(TrackDetail {
        url,
        id: None,
        title: None,
        artist: None,
        album: None,
        cover: None,
        lyric: None,
        quality: response.br.as_ref().and_then(as_u64).map(|br| br as u32),
        size: response.size.as_ref().and_then(as_u64),
        duration: None,
        pay: None,
        source: SOURCE,
    })
}

/// Convert a `types=pic` payload; `None` when no image URL was provided
pub fn to_picture(payload: &Value) -> Option<Picture> {
    let response: dto::PicResponse = serde_json::from_value(payload.clone()).ok()?;
    let url = response.url.filter(|u| !u.is_empty())?;
    Some(Picture {
        url,
        source: SOURCE,
    })
}

/// Convert a `types=lyric` payload, defaulting missing tracks to empty text
pub fn to_lyric(payload: &Value) -> Option<LyricPayload> {
    if payload.is_null() {
        return None;
    }
    let response: dto::LyricResponse = serde_json::from_value(payload.clone()).ok()?;
    Some(LyricPayload::Text(LyricText {
        lyric: response.lyric.unwrap_or_default(),
        tlyric: response.tlyric.unwrap_or_default(),
        source: SOURCE,
    }))
}

/// Numbers arrive as integers, floats or numeric strings depending on the backend
fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_results_join_artists() {
        let payload = json!([
            {"id": 1, "name": "A", "artist": ["X", "Y"], "album": "Al", "pic_id": "p1", "lyric_id": 1},
            {"id": "2", "name": "B", "artist": "Z"}
        ]);
        let songs = to_search_results(&payload);
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].artist, "X, Y");
        assert_eq!(songs[0].cover_id.as_deref(), Some("p1"));
        assert_eq!(songs[0].lyric_id.as_deref(), Some("1"));
        assert_eq!(songs[1].id, "2");
        assert_eq!(songs[1].source, PlatformKey::Gdstudio);
    }

    #[test]
    fn test_search_results_tolerate_wrong_container() {
        assert!(to_search_results(&json!({"error": "busy"})).is_empty());
        assert!(to_search_results(&json!(null)).is_empty());
        assert!(to_search_results(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_detail_requires_url() {
        assert!(to_detail(&json!({"br": 320})).is_none());
        assert!(to_detail(&json!({"url": ""})).is_none());

        let detail = to_detail(&json!({"url": "https://a/b.mp3", "br": 128.0, "size": "1024"}))
            .expect("detail with url");
        assert_eq!(detail.quality, Some(128));
        assert_eq!(detail.size, Some(1024));
    }

    #[test]
    fn test_lyric_defaults_to_empty_strings() {
        let lyric = to_lyric(&json!({"lyric": "[00:01.00]a"})).unwrap();
        match lyric {
            LyricPayload::Text(text) => {
                assert_eq!(text.lyric, "[00:01.00]a");
                assert_eq!(text.tlyric, "");
            }
            LyricPayload::Raw(_) => panic!("expected structured lyric"),
        }
        assert!(to_lyric(&json!(null)).is_none());
    }

    #[test]
    fn test_picture() {
        assert_eq!(
            to_picture(&json!({"url": "https://p/x.jpg"})).map(|p| p.url),
            Some("https://p/x.jpg".to_string())
        );
        assert!(to_picture(&json!({})).is_none());
    }
}
