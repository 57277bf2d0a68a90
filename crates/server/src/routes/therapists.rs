use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use realeader::{RecordId, Storage};
use std::sync::Arc;

/// Parse a numeric path id, rejecting anything else with 400.
pub(crate) fn parse_id(raw: &str, kind: &str) -> ServerResult<RecordId> {
    raw.trim()
        .parse::<RecordId>()
        .map_err(|_| ServerError::BadRequest(format!("Invalid {kind} ID: {raw}")))
}

/// List every therapist (embeddings are never serialized)
pub async fn list_therapists(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    Ok(Json(state.pipeline.storage().all_therapists()?))
}

/// Fetch one therapist by numeric id
pub async fn get_therapist(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let id = parse_id(&id, "therapist")?;
    let therapist = state
        .pipeline
        .storage()
        .get_therapist(id)?
        .ok_or_else(|| ServerError::NotFound(format!("therapist {id}")))?;
    Ok(Json(therapist))
}

/// List every community
pub async fn list_communities(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    Ok(Json(state.pipeline.storage().all_communities()?))
}
