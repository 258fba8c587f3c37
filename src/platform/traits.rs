//! The adapter contract shared by every provider.
//!
//! The gateway talks to providers only through [`PlatformApi`], which keeps
//! routing independent of provider payloads and lets tests substitute mocks.
//! Operations a provider does not offer fall back to an "unsupported" error.

use async_trait::async_trait;

use super::cenguigui::CenguiguiClient;
use super::domain::{
    DetailOptions, LyricPayload, NormalizedSong, Operation, Picture, PictureOptions,
    PlatformError, PlatformKey, SearchOptions, TrackDetail,
};
use super::gdstudio::GdstudioClient;
use super::xfabe::XfabeClient;

/// Operations every platform adapter exposes.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Which provider this adapter talks to.
    fn key(&self) -> PlatformKey;

    /// Free-text search. Malformed upstream payloads yield an empty list.
    async fn search(
        &self,
        term: &str,
        options: SearchOptions,
    ) -> Result<Vec<NormalizedSong>, PlatformError>;

    /// Resolve a playable stream URL; `None` when upstream has no URL.
    async fn get_detail(
        &self,
        id: &str,
        options: DetailOptions,
    ) -> Result<Option<TrackDetail>, PlatformError>;

    /// Fetch lyrics by lyric ID.
    async fn get_lyric(&self, _id: &str) -> Result<Option<LyricPayload>, PlatformError> {
        Err(PlatformError::unsupported(self.key(), Operation::Lyric))
    }

    /// Fetch cover art by picture ID.
    async fn get_picture(
        &self,
        _id: &str,
        _options: PictureOptions,
    ) -> Result<Option<Picture>, PlatformError> {
        Err(PlatformError::unsupported(self.key(), Operation::Picture))
    }
}

// Implement the contract for the real clients

#[async_trait]
impl PlatformApi for GdstudioClient {
    fn key(&self) -> PlatformKey {
        PlatformKey::Gdstudio
    }

    async fn search(
        &self,
        term: &str,
        options: SearchOptions,
    ) -> Result<Vec<NormalizedSong>, PlatformError> {
        self.search(term, options).await
    }

    async fn get_detail(
        &self,
        id: &str,
        options: DetailOptions,
    ) -> Result<Option<TrackDetail>, PlatformError> {
        self.get_detail(id, options).await
    }

    async fn get_lyric(&self, id: &str) -> Result<Option<LyricPayload>, PlatformError> {
        self.get_lyric(id).await
    }

    async fn get_picture(
        &self,
        id: &str,
        options: PictureOptions,
    ) -> Result<Option<Picture>, PlatformError> {
        self.get_picture(id, options).await
    }
}

#[async_trait]
impl PlatformApi for CenguiguiClient {
    fn key(&self) -> PlatformKey {
        PlatformKey::Cenguigui
    }

    async fn search(
        &self,
        term: &str,
        options: SearchOptions,
    ) -> Result<Vec<NormalizedSong>, PlatformError> {
        self.search(term, options).await
    }

    async fn get_detail(
        &self,
        id: &str,
        options: DetailOptions,
    ) -> Result<Option<TrackDetail>, PlatformError> {
        self.get_detail(id, options).await
    }
}

#[async_trait]
impl PlatformApi for XfabeClient {
    fn key(&self) -> PlatformKey {
        PlatformKey::Xfabe
    }

    async fn search(
        &self,
        term: &str,
        options: SearchOptions,
    ) -> Result<Vec<NormalizedSong>, PlatformError> {
        self.search(term, options).await
    }

    async fn get_detail(
        &self,
        id: &str,
        _options: DetailOptions,
    ) -> Result<Option<TrackDetail>, PlatformError> {
        self.get_detail(id).await
    }

    async fn get_lyric(&self, id: &str) -> Result<Option<LyricPayload>, PlatformError> {
        self.get_lyric(id).await
    }
}
