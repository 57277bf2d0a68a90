use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use realeader::{MatchError, PipelineError, StoreError};
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Pipeline(err) => pipeline_status(err),
            ServerError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServerError::Store(StoreError::Poisoned(_))
            | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NotFound(_) => "NOT_FOUND",
            ServerError::Pipeline(err) => pipeline_code(err),
            ServerError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
            ServerError::Store(StoreError::Poisoned(_)) => "STORE_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
        }
    }
}

fn pipeline_status(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::EmptyQuery
        | PipelineError::InvalidForm(_)
        | PipelineError::Match(MatchError::InvalidK(_)) => StatusCode::BAD_REQUEST,
        PipelineError::TherapistNotFound(_)
        | PipelineError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        PipelineError::MissingEmbedding(_)
        | PipelineError::Match(MatchError::DimensionMismatch { .. })
        | PipelineError::Match(MatchError::TooManyCandidates { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PipelineError::Match(MatchError::InvalidConfig(_))
        | PipelineError::Semantic(_)
        | PipelineError::Store(StoreError::Poisoned(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn pipeline_code(err: &PipelineError) -> &'static str {
    match err {
        PipelineError::EmptyQuery => "EMPTY_QUERY",
        PipelineError::InvalidForm(_) => "INVALID_FORM",
        PipelineError::TherapistNotFound(_) => "THERAPIST_NOT_FOUND",
        PipelineError::MissingEmbedding(_) => "MISSING_EMBEDDING",
        PipelineError::Match(MatchError::InvalidK(_)) => "INVALID_LIMIT",
        PipelineError::Match(MatchError::DimensionMismatch { .. }) => "DIMENSION_MISMATCH",
        PipelineError::Match(MatchError::TooManyCandidates { .. }) => "TOO_MANY_CANDIDATES",
        PipelineError::Match(MatchError::InvalidConfig(_)) => "MATCH_ERROR",
        PipelineError::Semantic(_) => "SEMANTIC_ERROR",
        PipelineError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
        PipelineError::Store(StoreError::Poisoned(_)) => "STORE_ERROR",
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code = %error_code, error = %message, "request failed");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: error_code,
                message,
            },
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(err: JsonRejection) -> Self {
        ServerError::BadRequest(err.body_text())
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<realeader::ConfigLoadError> for ServerError {
    fn from(err: realeader::ConfigLoadError) -> Self {
        ServerError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_client_statuses() {
        let cases = [
            (PipelineError::EmptyQuery, StatusCode::BAD_REQUEST),
            (
                PipelineError::Match(MatchError::InvalidK(0)),
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::InvalidForm("goals".into()),
                StatusCode::BAD_REQUEST,
            ),
            (PipelineError::TherapistNotFound(9), StatusCode::NOT_FOUND),
            (
                PipelineError::Match(MatchError::DimensionMismatch {
                    expected: 384,
                    actual: 3,
                    candidate: Some("1".into()),
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                PipelineError::Match(MatchError::TooManyCandidates { actual: 2, max: 1 }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                PipelineError::Semantic(realeader::SemanticError::Inference("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status_code(), status);
        }
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            ServerError::from(PipelineError::EmptyQuery).error_code(),
            "EMPTY_QUERY"
        );
        assert_eq!(
            ServerError::NotFound("therapist".into()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            ServerError::from(StoreError::NotFound { kind: "user", id: 1 }).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn pipeline_message_is_passed_through() {
        let err = ServerError::from(PipelineError::TherapistNotFound(4));
        assert_eq!(err.to_string(), "therapist 4 not found");
    }
}
