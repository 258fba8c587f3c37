//! Cenguigui HTTP client
//!
//! Douyin (Qishui) music search. Stream URL, cover and lyrics all come
//! back from the detail call, so there is no separate picture or lyric API.
//!
//! API: https://api.cenguigui.cn/api/douyin/music/

use std::time::Duration;

use super::adapter;
use crate::platform::domain::{
    DetailOptions, NormalizedSong, Operation, PlatformError, PlatformKey, SearchOptions,
    TrackDetail,
};
use crate::platform::http;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.cenguigui.cn/api/douyin/music/";

/// Cenguigui API client
pub struct CenguiguiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl CenguiguiClient {
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
            "{}?msg={}&limit={}&type=json",
            self.base_url,
            http::encode(term),
            options.limit
        )
    }

    pub(crate) fn detail_url(&self, term: &str, options: DetailOptions) -> String {
        let mut url = format!("{}?msg={}&type=json", self.base_url, http::encode(term));
        if let Some(index) = options.index {
            url.push_str(&format!("&n={}", index));
        }
        url
    }

    /// Search by free text
    pub async fn search(
        &self,
        term: &str,
        options: SearchOptions,
    ) -> Result<Vec<NormalizedSong>, PlatformError> {
        let payload = self.fetch(&self.search_url(term, options), Operation::Search).await?;
        Ok(adapter::to_search_results(&payload))
    }

    /// Resolve the `index`-th hit for `term`
    pub async fn get_detail(
        &self,
        term: &str,
        options: DetailOptions,
    ) -> Result<Option<TrackDetail>, PlatformError> {
        let payload = self.fetch(&self.detail_url(term, options), Operation::Detail).await?;
        Ok(adapter::to_detail(&payload))
    }

    async fn fetch(&self, url: &str, operation: Operation) -> Result<serde_json::Value, PlatformError> {
        http::get_json(&self.http_client, url)
            .await
            .map_err(|e| PlatformError::request(PlatformKey::Cenguigui, operation, e.to_string()))
    }
}

impl Default for CenguiguiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let client = CenguiguiClient::new();
        assert_eq!(
            client.search_url("晴天", SearchOptions { limit: 5, page: 1 }),
            "https://api.cenguigui.cn/api/douyin/music/?msg=%E6%99%B4%E5%A4%A9&limit=5&type=json"
        );
    }

    #[test]
    fn test_detail_url_with_and_without_index() {
        let client = CenguiguiClient::new();
        let with_index = client.detail_url(
            "晴天",
            DetailOptions {
                quality: 320,
                index: Some(2),
            },
        );
        assert!(with_index.ends_with("&type=json&n=2"));

        let without = client.detail_url("晴天", DetailOptions::default());
        assert!(without.ends_with("&type=json"));
    }

    #[tokio::test]
    async fn test_detail_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/music/")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"{"data": {"title": "T", "singer": "S", "url": "https://a/b.mp3"}}"#)
            .create_async()
            .await;

        let client = CenguiguiClient::with_base_url(
            format!("{}/music/", server.url()),
            http::DEFAULT_REQUEST_TIMEOUT,
        );
        let detail = client
            .get_detail("T", DetailOptions::default())
            .await
            .unwrap()
            .expect("detail");
        assert_eq!(detail.url, "https://a/b.mp3");
    }

    #[tokio::test]
    async fn test_failures_are_tagged_with_operation() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/music/")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = CenguiguiClient::with_base_url(
            format!("{}/music/", server.url()),
            http::DEFAULT_REQUEST_TIMEOUT,
        );
        let err = client
            .search("晴天", SearchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cenguigui search failed: HTTP 500: Internal Server Error"
        );

        let err = client
            .get_detail("晴天", DetailOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Cenguigui get detail failed: HTTP 500"));
    }
}
