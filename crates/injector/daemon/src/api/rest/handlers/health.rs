//! Health and readiness handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Liveness response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

/// Liveness endpoint. Answers ok whenever the process is serving.
pub async fn health_check() -> Json<HealthCheckResponse> {
    tracing::debug!("Health check endpoint hit");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}

/// Readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// `healthy` or `degraded`
    pub status: String,
    /// `reachable` or `unreachable`
    pub store: String,
    pub backend: String,
    pub cached_entries: usize,
    pub version: String,
    pub uptime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Readiness endpoint. Pings the store; an unreachable store reports the
/// daemon as degraded with 503.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let probe = state.registry.ping_store().await;

    let (code, status, store, error) = match probe {
        Ok(()) => (StatusCode::OK, "healthy", "reachable", None),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "degraded",
                "unreachable",
                Some(err.to_string()),
            )
        }
    };

    (
        code,
        Json(ReadinessResponse {
            status: status.to_string(),
            store: store.to_string(),
            backend: state.registry.store_backend().to_string(),
            cached_entries: state.registry.cache().len(),
            version: state.version.clone(),
            uptime: state.uptime(),
            error,
        }),
    )
}
