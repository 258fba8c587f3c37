//! Aggregation gateway - one routing entry point in front of every provider.
//!
//! The gateway validates the request, picks the adapter by platform key,
//! dispatches to the matching adapter operation and wraps the outcome in an
//! [`Envelope`]. It performs no caching, rate limiting or retries.

pub mod envelope;
pub mod request;
pub mod server;

pub use envelope::{Envelope, GatewayData};
pub use request::{GatewayRequest, ManagerQuery, RequestOp, ValidationError};

use crate::platform::{PlatformError, Platforms};

/// Everything that can go wrong while handling a gateway request.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Bad action/platform/term; never retried
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Adapter transport or parsing failure, original message preserved
    #[error(transparent)]
    Upstream(#[from] PlatformError),
}

impl GatewayError {
    /// HTTP status for this failure class.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Upstream(_) => 500,
        }
    }
}

/// Request router over the fixed provider set.
#[derive(Clone)]
pub struct Gateway {
    platforms: Platforms,
}

impl Gateway {
    pub fn new(platforms: Platforms) -> Self {
        Self { platforms }
    }

    /// Validate and dispatch a raw query.
    pub async fn handle(&self, query: &ManagerQuery) -> Result<GatewayData, GatewayError> {
        let request = GatewayRequest::try_from(query).inspect_err(|e| {
            tracing::debug!("Rejected gateway request {:?}: {}", query, e);
        })?;

        let result = self.dispatch(&request).await;
        match &result {
            Ok(_) => tracing::info!(
                platform = %request.platform,
                op = ?request.op,
                "Gateway request served"
            ),
            Err(e) => tracing::error!(platform = %request.platform, "API Error: {}", e),
        }
        result
    }

    /// Handle a query and shape the result into `(status, envelope)`.
    pub async fn respond(&self, query: &ManagerQuery) -> (u16, Envelope<GatewayData>) {
        match self.handle(query).await {
            Ok(data) => (200, Envelope::ok(data)),
            Err(e) => (e.status_code(), Envelope::err(e.to_string())),
        }
    }

    async fn dispatch(&self, request: &GatewayRequest) -> Result<GatewayData, GatewayError> {
        let api = self.platforms.get(request.platform);
        let term = request.term.as_str();

        let data = match request.op {
            RequestOp::Search(options) => GatewayData::Songs(api.search(term, options).await?),
            RequestOp::Detail(options) => GatewayData::Detail(api.get_detail(term, options).await?),
            RequestOp::Lyric => GatewayData::Lyric(api.get_lyric(term).await?),
            RequestOp::Picture(options) => {
                GatewayData::Picture(api.get_picture(term, options).await?)
            }
        };
        Ok(data)
    }
}
