//! Test utilities and fixtures.
//!
//! Factories for search hits and song records, plus a gateway wired to mock
//! adapters so nothing in the test suite touches a real upstream.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{mock_gateway, song};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let gateway = mock_gateway();
//!     let record = song("晴天", "周杰伦", PlatformKey::Gdstudio, None);
//!     // ... test logic
//! }
//! ```

use std::sync::Arc;

use crate::gateway::Gateway;
use crate::platform::traits::mocks::MockPlatform;
use crate::platform::{NormalizedSong, PlatformKey, Platforms};
use crate::playback::Song;

/// Audio URL served by the mock gdstudio adapter.
pub const MOCK_AUDIO_URL: &str = "https://cdn.example.com/qingtian.mp3";

/// Creates a search hit with cover and lyric IDs derived from `id`.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let hit = NormalizedSong {
///     index: Some(3),
///     ..normalized_song(PlatformKey::Cenguigui, "3", "晴天", "周杰伦")
/// };
/// ```
pub fn normalized_song(key: PlatformKey, id: &str, title: &str, artist: &str) -> NormalizedSong {
    NormalizedSong {
        id: id.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        album: "Test Album".to_string(),
        cover: None,
        cover_id: Some(format!("pic-{}", id)),
        lyric_id: Some(id.to_string()),
        duration: None,
        source: key,
        index: None,
    }
}

/// Creates an unresolved song record.
pub fn song(name: &str, singer: &str, platform: PlatformKey, request_url: Option<&str>) -> Song {
    Song {
        name: name.to_string(),
        singer: singer.to_string(),
        platform,
        request_url: request_url.map(str::to_string),
        ..Song::default()
    }
}

/// A gateway whose adapters are mocks:
/// - gdstudio returns one hit and resolves it to [`MOCK_AUDIO_URL`]
/// - cenguigui returns nothing
/// - xfabe fails every call with "upstream unreachable"
pub fn mock_gateway() -> Gateway {
    Gateway::new(Platforms::new(
        Arc::new(MockPlatform::with_song(
            PlatformKey::Gdstudio,
            "晴天",
            "周杰伦",
            MOCK_AUDIO_URL,
        )),
        Arc::new(MockPlatform::empty(PlatformKey::Cenguigui)),
        Arc::new(MockPlatform::with_error(
            PlatformKey::Xfabe,
            "upstream unreachable",
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_song_defaults() {
        let hit = normalized_song(PlatformKey::Gdstudio, "42", "Title", "Artist");
        assert_eq!(hit.cover_id.as_deref(), Some("pic-42"));
        assert_eq!(hit.lyric_id.as_deref(), Some("42"));
        assert_eq!(hit.source, PlatformKey::Gdstudio);
    }

    #[test]
    fn test_song_is_unresolved() {
        let record = song("晴天", "周杰伦", PlatformKey::Xfabe, None);
        assert!(record.playable_url().is_none());
        assert!(record.stored_request_url().is_none());
    }
}
