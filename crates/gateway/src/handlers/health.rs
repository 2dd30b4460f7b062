//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::AppState;
use quillpress_common::db::Repository;

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": quillpress_common::VERSION,
    }))
}

/// Readiness probe: verifies database connectivity
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let repo = Repository::new(state.db.clone());

    match repo.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready", "database": "unreachable" })),
            )
        }
    }
}
