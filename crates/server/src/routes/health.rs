use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use crate::telemetry::metrics_handle;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use realeader::Storage;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Pin the start time; called when the router is built.
pub(crate) fn mark_started() {
    once_cell::sync::Lazy::force(&SERVER_START_TIME);
}

pub(crate) fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "realeader-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
/// Returns 200 once the directory is readable
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let therapists = state.pipeline.storage().all_therapists()?;
    let indexed = state.pipeline.storage().therapist_embeddings()?.len();

    Ok(Json(json!({
        "status": "ready",
        "service": "realeader-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "store": "ready",
            "embedder": state.pipeline.embedder().config().model_name,
            "matcher": state.pipeline.matcher().config().metric.as_str(),
        },
        "therapists": therapists.len(),
        "therapists_with_embeddings": indexed,
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    if !state.config.metrics_enabled {
        return Err(ServerError::NotFound("metrics are disabled".to_string()));
    }
    let body = match metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    };
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
