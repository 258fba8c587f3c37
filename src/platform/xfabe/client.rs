//! XF Netease HTTP client
//!
//! Netease catalogue proxy with search, stream URL and raw lyrics.
//! Cover art comes back inline with the stream URL.
//!
//! API: https://node.api.xfabe.com/api/wangyi

use std::time::Duration;

use super::adapter;
use crate::platform::domain::{
    LyricPayload, NormalizedSong, Operation, PlatformError, PlatformKey, SearchOptions,
    TrackDetail,
};
use crate::platform::http;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://node.api.xfabe.com/api/wangyi";

/// XF Netease API client
pub struct XfabeClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl XfabeClient {
    /// Create a new client against the public endpoint
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, http::DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client against a custom API root
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client: http::build_client(timeout),
            base_url: base_url.into(),
        }
    }

    pub(crate) fn search_url(&self, term: &str, options: SearchOptions) -> String {
        format!(
            "{}/search?search={}&limit={}",
            self.base_url,
            http::encode(term),
            options.limit
        )
    }

    pub(crate) fn detail_url(&self, track_id: &str) -> String {
        format!("{}/music?type=json&id={}", self.base_url, http::encode(track_id))
    }

    pub(crate) fn lyric_url(&self, track_id: &str) -> String {
        format!("{}/lyrics?id={}", self.base_url, http::encode(track_id))
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

    /// Resolve the stream URL; quality is fixed upstream
    pub async fn get_detail(&self, track_id: &str) -> Result<Option<TrackDetail>, PlatformError> {
        let payload = self.fetch(&self.detail_url(track_id), Operation::Detail).await?;
        Ok(adapter::to_detail(&payload))
    }

    /// Fetch lyrics in the API's own format
    pub async fn get_lyric(&self, track_id: &str) -> Result<Option<LyricPayload>, PlatformError> {
        let payload = self.fetch(&self.lyric_url(track_id), Operation::Lyric).await?;
        Ok(adapter::to_lyric(payload))
    }

    async fn fetch(&self, url: &str, operation: Operation) -> Result<serde_json::Value, PlatformError> {
        http::get_json(&self.http_client, url)
            .await
            .map_err(|e| PlatformError::request(PlatformKey::Xfabe, operation, e.to_string()))
    }
}

impl Default for XfabeClient {
    fn default() -> Self {
        Self::new()
    }
}
