//! GD Studio HTTP client
//!
//! Netease-backed aggregator with separate endpoints for stream URL,
//! cover art and lyrics. No API key required.
//!
//! API: https://music-api.gdstudio.xyz/api.php

use std::time::Duration;

use super::adapter;
use crate::platform::domain::{
    DetailOptions, LyricPayload, NormalizedSong, Operation, Picture, PictureOptions,
    PlatformError, PlatformKey, SearchOptions, TrackDetail,
};
use crate::platform::http;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://music-api.gdstudio.xyz/api.php";

/// Backing catalogue queried through the aggregator
const CATALOGUE: &str = "netease";

/// GD Studio API client
pub struct GdstudioClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GdstudioClient {
    /// Create a new client against the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, http::DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client against a custom endpoint
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: http::build_client(timeout),
            base_url: base_url.into(),
        }
    }

    pub(crate) fn search_url(&self, term: &str, options: SearchOptions) -> String {
        format!(
            "{}?types=search&name={}&count={}&pages={}&source={}",
            self.base_url,
            http::encode(term),
            options.limit,
            options.page,
            CATALOGUE
        )
    }

    pub(crate) fn detail_url(&self, track_id: &str, options: DetailOptions) -> String {
        format!(
            "{}?types=url&id={}&br={}&source={}",
            self.base_url,
            http::encode(track_id),
            options.quality,
            CATALOGUE
        )
    }

    pub(crate) fn picture_url(&self, pic_id: &str, options: PictureOptions) -> String {
        format!(
            "{}?types=pic&id={}&size={}&source={}",
            self.base_url,
            http::encode(pic_id),
            options.size,
            CATALOGUE
        )
    }

    pub(crate) fn lyric_url(&self, lyric_id: &str) -> String {
        format!(
            "{}?types=lyric&id={}&source={}",
            self.base_url,
            http::encode(lyric_id),
            CATALOGUE
        )
    }

    /// Search the catalogue
    pub async fn search(
        &self,
        term: &str,
        options: SearchOptions,
    ) -> Result<Vec<NormalizedSong>, PlatformError> {
        let payload = self.fetch(&self.search_url(term, options), Operation::Search).await?;
        Ok(adapter::to_search_results(&payload))
    }

    /// Resolve the stream URL for a track
    pub async fn get_detail(
        &self,
        track_id: &str,
        options: DetailOptions,
    ) -> Result<Option<TrackDetail>, PlatformError> {
        let payload = self
            .fetch(&self.detail_url(track_id, options), Operation::Detail)
            .await?;
        Ok(adapter::to_detail(&payload))
    }

    /// Fetch original and translated lyrics
    pub async fn get_lyric(&self, lyric_id: &str) -> Result<Option<LyricPayload>, PlatformError> {
        let payload = self.fetch(&self.lyric_url(lyric_id), Operation::Lyric).await?;
        Ok(adapter::to_lyric(&payload))
    }

    /// Fetch the cover art URL
    pub async fn get_picture(
        &self,
        pic_id: &str,
        options: PictureOptions,
    ) -> Result<Option<Picture>, PlatformError> {
        let payload = self
            .fetch(&self.picture_url(pic_id, options), Operation::Picture)
            .await?;
        Ok(adapter::to_picture(&payload))
    }

    async fn fetch(&self, url: &str, operation: Operation) -> Result<serde_json::Value, PlatformError> {
        http::get_json(&self.http_client, url)
            .await
            .map_err(|e| PlatformError::request(PlatformKey::Gdstudio, operation, e.to_string()))
    }
}

impl Default for GdstudioClient {
    fn default() -> Self {
        Self::new()
    }
}
