use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metric::Metric;

/// Fixed-length embedding. Every vector in one ranking must share a length.
pub type Vector = Vec<f32>;

/// An opaque identifier paired with one vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate<Id> {
    pub id: Id,
    pub vector: Vector,
}

impl<Id> Candidate<Id> {
    pub fn new(id: Id, vector: Vector) -> Self {
        Self { id, vector }
    }
}

impl<Id> From<(Id, Vector)> for Candidate<Id> {
    fn from((id, vector): (Id, Vector)) -> Self {
        Self { id, vector }
    }
}

/// A single ranked hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult<Id> {
    /// Identifier of the matched candidate.
    pub id: Id,
    /// Zero-based position in the ranking.
    pub rank: usize,
    /// Rank-derived match percentage in `[50, 100]`.
    pub score: u8,
    /// Raw metric value (similarity or distance, depending on the metric).
    pub raw: f32,
    /// Metric that produced `raw`.
    pub metric: Metric,
}

/// Configuration for a [`crate::Matcher`].
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// YAML configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Metric used when the caller does not pick one.
    #[serde(default)]
    pub metric: Metric,
    /// Limit used when the caller does not pass one.
    #[serde(default = "MatchConfig::default_limit")]
    pub default_limit: usize,
    /// Upper bound on the number of candidates accepted per call.
    #[serde(default = "MatchConfig::default_max_candidates")]
    pub max_candidates: usize,
}

impl MatchConfig {
    pub(crate) fn default_limit() -> usize {
        10
    }

    pub(crate) fn default_max_candidates() -> usize {
        10_000
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.default_limit == 0 {
            return Err(MatchError::InvalidConfig(
                "default_limit must be greater than zero".into(),
            ));
        }
        if self.max_candidates == 0 {
            return Err(MatchError::InvalidConfig(
                "max_candidates must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            default_limit: Self::default_limit(),
            max_candidates: Self::default_max_candidates(),
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// `k` was zero.
    #[error("k must be at least 1, got {0}")]
    InvalidK(usize),
    /// A candidate vector disagrees with the query on length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        /// Display form of the offending candidate id, when known.
        candidate: Option<String>,
    },
    /// More candidates than the configured ceiling.
    #[error("candidate set of {actual} exceeds the limit of {max}")]
    TooManyCandidates { actual: usize, max: usize },
    /// Invalid configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
