//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `health`: Health checks, readiness, and metrics
//! - `therapists`: Directory listings (therapists, communities)
//! - `matching`: Text, vector, similar-therapist and intake-form matching
//! - `analytics`: Dashboard figures

pub mod analytics;
pub mod health;
pub mod matching;
pub mod therapists;

use crate::error::{ServerError, ServerResult};
use crate::state::{ServerMetadata, ServerState};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// API version and base info
///
/// Returns server information including version and available endpoints.
///
/// # Response
///
/// ```json
/// {
///   "name": "realeader Server",
///   "version": "0.1.0",
///   "metadata": { "model": "seeded-lcg-384", "metric": "cosine", ... },
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let metadata = ServerMetadata {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: health::uptime_seconds(),
        model: state.pipeline.embedder().config().model_name.clone(),
        metric: state.pipeline.matcher().config().metric.to_string(),
    };

    Ok(Json(json!({
        "name": "realeader Server",
        "version": env!("CARGO_PKG_VERSION"),
        "metadata": serde_json::to_value(metadata)?,
        "endpoints": [
            "/api/therapists",
            "/api/therapists/{id}",
            "/api/match/search",
            "/api/match/vector",
            "/api/match/similar/{id}",
            "/api/match/form",
            "/api/communities",
            "/api/analytics",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound("route".to_string())
}
