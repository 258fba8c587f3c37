//! The client-side song record.
//!
//! Built from a search hit, enriched by resolution, then stored in history,
//! favorites and the queue. Serialized in camelCase so records persisted by
//! earlier clients still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lyrics::TimedCue;
use super::request_url;
use crate::platform::domain::string_or_number;
use crate::platform::{NormalizedSong, PlatformKey};

/// Lyrics attached to a song.
///
/// Usually parsed cues; providers that return their own lyric structure are
/// kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lyrics {
    Cues(Vec<TimedCue>),
    Raw(serde_json::Value),
}

impl Default for Lyrics {
    fn default() -> Self {
        Self::Cues(Vec::new())
    }
}

impl Lyrics {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Cues(cues) => cues.is_empty(),
            Self::Raw(value) => value.is_null(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub singer: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub platform: PlatformKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub lyric_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Gateway detail URL this song resolves through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,
    /// Position in the search results it came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// Resolved audio URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub lyrics: Lyrics,
    /// Raw detail payload from the last resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_at: Option<DateTime<Utc>>,
}

impl Song {
    /// Build a record from a search hit.
    pub fn from_search_result(hit: &NormalizedSong, search_index: usize, search_term: &str) -> Self {
        // cenguigui re-selects by position, everyone else by ID
        let term = match (hit.source, hit.index) {
            (PlatformKey::Cenguigui, Some(_)) => search_term.to_string(),
            _ => hit.id.clone(),
        };
        let mut request_url = request_url::detail_url(hit.source, &term);
        if let (PlatformKey::Cenguigui, Some(index)) = (hit.source, hit.index) {
            request_url.push_str(&format!("&index={}", index));
        }

        Self {
            id: Some(hit.id.clone()),
            name: hit.title.clone(),
            singer: hit.artist.clone(),
            album: hit.album.clone(),
            platform: hit.source,
            cover: hit.cover.clone(),
            cover_id: hit.cover_id.clone(),
            lyric_id: hit.lyric_id.clone(),
            duration: hit.duration,
            request_url: Some(request_url),
            search_index: Some(search_index),
            search_term: Some(search_term.to_string()),
            ..Self::default()
        }
    }

    /// Identity rule shared by history, queue and favorites: same name,
    /// singer and platform, and equal request URLs when both have one.
    pub fn is_same_song(&self, other: &Song) -> bool {
        if self.name != other.name || self.singer != other.singer || self.platform != other.platform {
            return false;
        }
        match (self.stored_request_url(), other.stored_request_url()) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Request URL, treating an empty string as absent.
    pub fn stored_request_url(&self) -> Option<&str> {
        self.request_url.as_deref().filter(|u| !u.is_empty())
    }

    /// Audio URL, treating an empty string as absent.
    pub fn playable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// "name - singer" label for notices and listings.
    pub fn label(&self) -> String {
        if self.singer.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.singer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{normalized_song, song};
    use proptest::prelude::*;

    #[test]
    fn test_from_search_result() {
        let hit = normalized_song(PlatformKey::Gdstudio, "1974443814", "晴天", "周杰伦");
        let record = Song::from_search_result(&hit, 2, "晴天");

        assert_eq!(record.name, "晴天");
        assert_eq!(record.singer, "周杰伦");
        assert_eq!(record.search_index, Some(2));
        assert_eq!(
            record.request_url.as_deref(),
            Some("/api/manager?action=detail&platform=gdstudio&term=1974443814")
        );
    }

    #[test]
    fn test_from_cenguigui_result_keeps_index() {
        let mut hit = normalized_song(PlatformKey::Cenguigui, "3", "晴天", "周杰伦");
        hit.index = Some(3);
        let record = Song::from_search_result(&hit, 2, "晴天");
        assert_eq!(
            record.request_url.as_deref(),
            Some("/api/manager?action=detail&platform=cenguigui&term=%E6%99%B4%E5%A4%A9&index=3")
        );
    }

    #[test]
    fn test_identity_ignores_missing_request_url() {
        let a = song("晴天", "周杰伦", PlatformKey::Gdstudio, Some("/api/manager?term=1"));
        let mut b = a.clone();
        b.request_url = None;
        assert!(a.is_same_song(&b));

        b.request_url = Some(String::new());
        assert!(a.is_same_song(&b));

        b.request_url = Some("/api/manager?term=2".to_string());
        assert!(!a.is_same_song(&b));

        let other_platform = song("晴天", "周杰伦", PlatformKey::Xfabe, None);
        assert!(!a.is_same_song(&other_platform));
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "id": 1974443814,
            "name": "晴天",
            "singer": "周杰伦",
            "platform": "gdstudio",
            "requestUrl": "/api/sby?term=%E6%99%B4%E5%A4%A9",
            "lyrics": [{"time": "1.500", "text": "故事的小黄花"}]
        }"#;
        let record: Song = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("1974443814"));
        assert!(matches!(record.lyrics, Lyrics::Cues(ref c) if c.len() == 1));
        assert!(record.url.is_none());
    }

    #[test]
    fn test_serialize_camel_case() {
        let mut record = song("晴天", "周杰伦", PlatformKey::Gdstudio, Some("/api/manager?term=1"));
        record.search_index = Some(0);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("requestUrl").is_some());
        assert!(json.get("searchIndex").is_some());
        assert_eq!(json["lyrics"], serde_json::json!([]));
    }

    /// Playback fields that identity must not look at.
    #[derive(Debug, Clone)]
    struct Resolved {
        url: Option<String>,
        cover: Option<String>,
        lyrics: Lyrics,
    }

    impl Resolved {
        fn apply(&self, song: &Song) -> Song {
            Song {
                url: self.url.clone(),
                cover: self.cover.clone(),
                lyrics: self.lyrics.clone(),
                ..song.clone()
            }
        }
    }

    fn arb_lyrics() -> impl Strategy<Value = Lyrics> {
        prop_oneof![
            Just(Lyrics::default()),
            (0u32..600, "[a-z]{1,8}").prop_map(|(secs, text)| {
                Lyrics::Cues(vec![TimedCue { time: f64::from(secs), text }])
            }),
            Just(Lyrics::Raw(serde_json::json!({"lrc": {"lyric": "[00:01.00]x"}}))),
        ]
    }

    fn arb_resolved() -> impl Strategy<Value = Resolved> {
        (
            prop::option::of(prop_oneof!["", "https://cdn.example.com/a.mp3", "not a url"]),
            prop::option::of(prop_oneof!["https://img.example.com/1.jpg", "https://img.example.com/2.jpg"]),
            arb_lyrics(),
        )
            .prop_map(|(url, cover, lyrics)| Resolved { url, cover, lyrics })
    }

    fn arb_song() -> impl Strategy<Value = Song> {
        (
            prop_oneof!["a", "b"],
            prop_oneof!["x", "y"],
            0usize..3,
            prop::option::of(prop_oneof!["", "/u1", "/u2"]),
            arb_resolved(),
        )
            .prop_map(|(name, singer, p, request, resolved)| {
                resolved.apply(&song(&name, &singer, PlatformKey::ALL[p], request.as_deref()))
            })
    }

    proptest! {
        #[test]
        fn prop_identity_is_symmetric(a in arb_song(), b in arb_song()) {
            prop_assert_eq!(a.is_same_song(&b), b.is_same_song(&a));
            prop_assert!(a.is_same_song(&a));
        }

        #[test]
        fn prop_identity_ignores_resolved_fields(
            a in arb_song(),
            b in arb_song(),
            ra in arb_resolved(),
            rb in arb_resolved(),
        ) {
            let expected = a.is_same_song(&b);
            let (a2, b2) = (ra.apply(&a), rb.apply(&b));
            prop_assert_eq!(a2.is_same_song(&b2), expected);
            prop_assert_eq!(b2.is_same_song(&a2), expected);
            prop_assert!(a.is_same_song(&a2));
        }
    }
}
