use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Rows in the catalog, absent when the store could not be queried.
    pub games: Option<u64>,
}

/// Health endpoint. Reports the catalog size, or `degraded` when the store
/// cannot answer.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let games = match state.store.call(|store| store.count()).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not query the store");
            None
        },
    };

    Json(HealthResponse {
        status: if games.is_some() { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        games,
    })
}

/// Readiness check: the store must answer a query.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.call(|store| store.count()).await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: store unavailable"),
    }
}
