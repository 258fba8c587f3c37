//! GD Studio API Data Transfer Objects
//!
//! These types match what `music-api.gdstudio.xyz/api.php` returns.
//! DO NOT use these types outside the gdstudio module - convert to domain types.
//!
//! The API is a single endpoint switched by the `types` query parameter
//! (`search`, `url`, `pic`, `lyric`).

use serde::{Deserialize, Serialize};

use crate::platform::domain::string_or_number;

/// One entry of the bare array returned by `types=search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchItem {
    /// Track ID (number or string depending on the backing source)
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Track title
    #[serde(default)]
    pub name: Option<String>,
    /// One artist or a list of artists
    #[serde(default)]
    pub artist: Option<ArtistField>,
    /// Album title
    #[serde(default)]
    pub album: Option<String>,
    /// ID to pass to `types=pic`
    #[serde(default, deserialize_with = "string_or_number")]
    pub pic_id: Option<String>,
    /// ID to pass to `types=lyric`
    #[serde(default, deserialize_with = "string_or_number")]
    pub lyric_id: Option<String>,
    /// Backing source (always "netease" for our queries)
    #[serde(default)]
    pub source: Option<String>,
}

/// Artist credit, which the API sends either as a string or an array
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArtistField {
    One(String),
    Many(Vec<String>),
}

/// Response of `types=url`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UrlResponse {
    #[serde(default)]
    pub url: Option<String>,
    /// Bitrate actually served (kbps)
    #[serde(default)]
    pub br: Option<serde_json::Value>,
    /// File size in bytes
    #[serde(default)]
    pub size: Option<serde_json::Value>,
}

/// Response of `types=pic`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PicResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of `types=lyric`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LyricResponse {
    /// Original LRC text
    #[serde(default)]
    pub lyric: Option<String>,
    /// Translated LRC text
    #[serde(default)]
    pub tlyric: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_search_item_with_artist_array() {
        let json = r#"{
            "id": 186016,
            "name": "晴天",
            "artist": ["周杰伦"],
            "album": "叶惠美",
            "pic_id": "109951163200249252",
            "url_id": 186016,
            "lyric_id": 186016,
            "source": "netease"
        }"#;

        let item: SearchItem = serde_json::from_str(json).expect("Should parse search item");
        assert_eq!(item.id.as_deref(), Some("186016"));
        assert_eq!(item.lyric_id.as_deref(), Some("186016"));
        assert!(matches!(item.artist, Some(ArtistField::Many(ref a)) if a.len() == 1));
    }

    #[test]
    fn test_parse_search_item_with_artist_string() {
        let json = r#"{"id": "abc", "name": "Song", "artist": "Someone"}"#;
        let item: SearchItem = serde_json::from_str(json).expect("Should parse search item");
        assert!(matches!(item.artist, Some(ArtistField::One(ref a)) if a == "Someone"));
        assert!(item.pic_id.is_none());
    }

    #[test]
    fn test_parse_url_response() {
        let json = r#"{"url": "https://m701.music.126.net/a.mp3", "br": 320, "size": 11354812}"#;
        let response: UrlResponse = serde_json::from_str(json).expect("Should parse url response");
        assert!(response.url.is_some());
        assert_eq!(response.br, Some(serde_json::json!(320)));
    }

    #[test]
    fn test_parse_lyric_response_without_translation() {
        let json = r#"{"lyric": "[00:01.00]hi"}"#;
        let response: LyricResponse = serde_json::from_str(json).expect("Should parse lyric");
        assert!(response.tlyric.is_none());
    }
}
