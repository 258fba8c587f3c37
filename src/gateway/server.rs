//! HTTP surface for the gateway, served with axum.
//!
//! `GET /api/manager` carries every operation; `GET /health` is a liveness probe.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use super::{Envelope, Gateway, GatewayData, GatewayError, ManagerQuery};
use crate::error::{Error, Result, ResultExt};

/// Build the router with all gateway endpoints
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/api/manager", get(manager))
        .route("/health", get(health))
        .with_state(gateway)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(gateway: Arc<Gateway>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(format!("binding {}", bind))?;

    tracing::info!("Gateway listening on http://{}", bind);

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::server(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down gateway");
}

// ============ Handlers ============

async fn manager(
    State(gateway): State<Arc<Gateway>>,
    RawQuery(raw): RawQuery,
) -> std::result::Result<Json<Envelope<GatewayData>>, GatewayError> {
    // Parsed by hand so malformed or repeated keys still get an envelope
    let query = ManagerQuery::from_query_string(raw.as_deref().unwrap_or_default());
    let data = gateway.handle(&query).await?;
    Ok(Json(Envelope::ok(data)))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Envelope<GatewayData> = Envelope::err(self.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mock_gateway;

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::new(mock_gateway()));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_search_over_http() {
        let base = spawn_server().await;
        let response = reqwest::get(format!(
            "{}/api/manager?action=search&platform=gdstudio&term=%E5%91%A8%E6%9D%B0%E4%BC%A6",
            base
        ))
        .await
        .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert!(body["data"].as_array().is_some_and(|songs| !songs.is_empty()));
    }

    #[tokio::test]
    async fn test_bad_request_over_http() {
        let base = spawn_server().await;
        let response = reqwest::get(format!("{}/api/manager?action=play", base))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(
            body["error"],
            "Invalid action parameter, must be \"search\" or \"detail\""
        );
    }

    #[tokio::test]
    async fn test_repeated_key_still_gets_envelope() {
        let base = spawn_server().await;
        let response = reqwest::get(format!(
            "{}/api/manager?action=search&platform=gdstudio&term=a&term=b",
            base
        ))
        .await
        .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_missing_query_is_enveloped_400() {
        let base = spawn_server().await;
        let response = reqwest::get(format!("{}/api/manager", base)).await.unwrap();

        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_upstream_error_over_http() {
        let base = spawn_server().await;
        let response = reqwest::get(format!(
            "{}/api/manager?action=search&platform=xfabe&term=x",
            base
        ))
        .await
        .unwrap();

        assert_eq!(response.status().as_u16(), 500);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("upstream unreachable"));
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_server().await;
        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }
}
