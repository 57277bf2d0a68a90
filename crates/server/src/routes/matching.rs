use crate::error::ServerResult;
use crate::routes::therapists::parse_id;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use realeader::{MatchForm, Metric};
use serde::Deserialize;
use std::sync::Arc;

/// Text search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text description of what the user is looking for
    #[serde(default)]
    pub query: String,

    /// Maximum results to return
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Closeness measure; the pipeline default when omitted
    #[serde(default)]
    pub metric: Option<Metric>,
}

/// Precomputed-vector search request
#[derive(Debug, Deserialize)]
pub struct VectorSearchRequest {
    pub vector: Vec<f32>,

    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default)]
    pub metric: Option<Metric>,
}

/// Similar-therapist request; the body is optional
#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    #[serde(default = "default_similar_limit")]
    pub limit: usize,
}

impl Default for SimilarRequest {
    fn default() -> Self {
        Self {
            limit: default_similar_limit(),
        }
    }
}

fn default_limit() -> usize {
    10
}

fn default_similar_limit() -> usize {
    5
}

/// Rank therapists against a free-text query.
///
/// The query is embedded with the configured embedder and compared against
/// every therapist that has an embedding. Responds with the therapist rows
/// plus a rank-based `match` percentage.
pub async fn search(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(request) = payload?;
    let matches = state
        .pipeline
        .search_text(&request.query, Some(request.limit), request.metric)?;
    Ok(Json(matches))
}

/// Rank therapists against a caller-supplied vector.
pub async fn search_vector(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<VectorSearchRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(request) = payload?;
    let matches = state
        .pipeline
        .search_vector(&request.vector, Some(request.limit), request.metric)?;
    Ok(Json(matches))
}

/// Therapists closest to the given therapist, excluding that therapist.
pub async fn similar(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ServerResult<impl IntoResponse> {
    let id = parse_id(&id, "therapist")?;
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        SimilarRequest::default()
    } else {
        serde_json::from_slice::<SimilarRequest>(&body)?
    };
    let matches = state.pipeline.similar_to(id, Some(request.limit))?;
    Ok(Json(matches))
}

/// Match the intake form: similarity ranking refined by goals and preferences.
pub async fn match_form(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<MatchForm>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(form) = payload?;
    let matches = state.pipeline.match_form(&form)?;
    Ok(Json(matches))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;

    #[test]
    fn search_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": "stress"}"#).unwrap();
        assert_eq!(req.limit, 10);
        assert!(req.metric.is_none());
    }

    #[test]
    fn search_request_parses_metric() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"query": "stress", "metric": "euclidean", "limit": 2}"#)
                .unwrap();
        assert_eq!(req.metric, Some(Metric::Euclidean));
        assert_eq!(req.limit, 2);
    }

    #[test]
    fn similar_request_defaults_to_five() {
        let req: SimilarRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.limit, 5);
        assert_eq!(SimilarRequest::default().limit, 5);
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let err: ServerError = serde_json::from_str::<SimilarRequest>("{")
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(err, ServerError::BadRequest(_)));
    }
}
