//! Shared HTTP plumbing for the provider clients.

use std::time::Duration;

/// User agent sent to every upstream.
const USER_AGENT: &str = concat!("MusicAggregator/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout for upstream calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the reqwest client used by an adapter.
///
/// Falls back to a default client if the builder rejects the settings, so
/// adapter construction never fails.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client, using defaults: {}", e);
            reqwest::Client::new()
        })
}

/// Failure of a single upstream GET.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Connection, TLS or timeout failure
    #[error("{0}")]
    Transport(reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: &'static str },

    /// Body was not JSON
    #[error("{0}")]
    Decode(reqwest::Error),
}

/// GET a URL and decode the body as JSON.
///
/// Callers tag the error with the provider and operation.
pub async fn get_json(client: &reqwest::Client, url: &str) -> Result<serde_json::Value, HttpError> {
    tracing::debug!("GET {}", url);

    let response = client.get(url).send().await.map_err(HttpError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(HttpError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown"),
        });
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(HttpError::Decode)
}

/// Percent-encode a free-text query value.
pub fn encode(term: &str) -> String {
    urlencoding::encode(term).into_owned()
}
