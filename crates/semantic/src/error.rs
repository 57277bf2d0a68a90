use thiserror::Error;

/// Errors surfaced by embedders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// Configuration is inconsistent.
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The embedder ran but could not produce a vector.
    #[error("inference failure: {0}")]
    Inference(String),
}
