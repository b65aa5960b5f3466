//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub review_store: StoreHealth,
}

/// Review store health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreHealth {
    pub available: bool,
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

async fn probe_store(state: &AppState) -> StoreHealth {
    let start = std::time::Instant::now();
    let result = state.service.check_store().await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(true) => StoreHealth {
            available: true,
            latency_ms: Some(latency_ms),
            error: None,
        },
        Ok(false) => StoreHealth {
            available: false,
            latency_ms: Some(latency_ms),
            error: Some("review table does not exist".to_string()),
        },
        Err(err) => {
            tracing::warn!(error = %err, "Review store health probe failed");
            StoreHealth {
                available: false,
                latency_ms: None,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Full health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let review_store = probe_store(&state).await;
    let status = if review_store.available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if review_store.available { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        review_store,
    };

    (status, Json(response))
}

/// Liveness probe endpoint.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint. 503 while the review store is unreachable.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    if probe_store(&state).await.available {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
