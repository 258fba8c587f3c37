//! How the playback engine reaches the gateway.
//!
//! [`HttpManager`] talks to a running gateway over HTTP; [`LocalManager`]
//! dispatches straight into an in-process [`Gateway`]. Both hand back the
//! decoded envelope whatever the status code, since failures carry their
//! message inside it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::{Envelope, Gateway, ManagerQuery};
use crate::platform::http;

/// Transport-level failure talking to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    /// Blocked by a TLS or cross-origin policy
    #[error("security error: {0}")]
    Security(String),

    #[error("invalid gateway response: {0}")]
    Decode(String),
}

/// Fetches a gateway request URL such as `/api/manager?action=detail&...`.
#[async_trait]
pub trait ManagerApi: Send + Sync {
    async fn fetch(&self, request_url: &str) -> Result<Envelope<Value>, FetchError>;
}

/// Gateway reached over HTTP.
pub struct HttpManager {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpManager {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, http::DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client: http::build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, request_url: &str) -> String {
        if request_url.starts_with("http://") || request_url.starts_with("https://") {
            request_url.to_string()
        } else if request_url.starts_with('/') {
            format!("{}{}", self.base_url, request_url)
        } else {
            format!("{}/{}", self.base_url, request_url)
        }
    }
}

#[async_trait]
impl ManagerApi for HttpManager {
    async fn fetch(&self, request_url: &str) -> Result<Envelope<Value>, FetchError> {
        let url = self.absolute(request_url);
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(classify_transport_error)?;

        serde_json::from_slice::<Envelope<Value>>(&body)
            .map_err(|e| FetchError::Decode(format!("HTTP {}: {}", status.as_u16(), e)))
    }
}

/// Walk the source chain; reqwest keeps the TLS cause a few levels down.
fn classify_transport_error(err: reqwest::Error) -> FetchError {
    let mut chain = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }

    let lower = chain.to_lowercase();
    if lower.contains("certificate") || lower.contains("tls") || lower.contains("cors") {
        FetchError::Security(chain)
    } else {
        FetchError::Network(chain)
    }
}

/// In-process gateway.
#[derive(Clone)]
pub struct LocalManager {
    gateway: Arc<Gateway>,
}

impl LocalManager {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ManagerApi for LocalManager {
    async fn fetch(&self, request_url: &str) -> Result<Envelope<Value>, FetchError> {
        let query = ManagerQuery::from_url(request_url)
            .map_err(|e| FetchError::Decode(format!("bad request URL {}: {}", request_url, e)))?;

        let (_status, envelope) = self.gateway.respond(&query).await;
        let data = envelope
            .data
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| FetchError::Decode(e.to_string()))?
            .filter(|v| !v.is_null());

        Ok(Envelope {
            success: envelope.success,
            data,
            error: envelope.error,
        })
    }
}

/// Mock implementations for testing.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;

    struct Route {
        fragment: String,
        delay: Duration,
        response: Result<Envelope<Value>, FetchError>,
    }

    /// Answers by the first route whose fragment occurs in the request URL.
    /// Unrouted requests get a failure envelope.
    #[derive(Default)]
    pub struct MockManager {
        routes: Mutex<Vec<Route>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(self, fragment: &str, response: Result<Envelope<Value>, FetchError>) -> Self {
            self.route_delayed(fragment, Duration::ZERO, response)
        }

        pub fn route_delayed(
            self,
            fragment: &str,
            delay: Duration,
            response: Result<Envelope<Value>, FetchError>,
        ) -> Self {
            self.routes.lock().push(Route {
                fragment: fragment.to_string(),
                delay,
                response,
            });
            self
        }

        /// Request URLs seen so far, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ManagerApi for MockManager {
        async fn fetch(&self, request_url: &str) -> Result<Envelope<Value>, FetchError> {
            self.calls.lock().push(request_url.to_string());

            let matched = self
                .routes
                .lock()
                .iter()
                .find(|r| request_url.contains(&r.fragment))
                .map(|r| (r.delay, r.response.clone()));

            match matched {
                Some((delay, response)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    response
                }
                None => Ok(Envelope::err(format!("no route for {}", request_url))),
            }
        }
    }
}
