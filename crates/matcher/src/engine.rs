use std::fmt;
use std::time::Instant;

use crate::metric::Metric;
use crate::types::{Candidate, MatchConfig, MatchError, MatchResult};


/// Rank-based match percentage for the item at zero-based `rank` out of a
/// requested limit of `k`: `max(50, round(100 - rank * 50 / k))`.
///
/// Rounding is half away from zero, so rank 1 of 4 scores 88.
pub fn rank_score(rank: usize, k: usize) -> u8 {
    let k = k.max(1) as f64;
    let raw = 100.0 - rank as f64 * (50.0 / k);
    raw.round().clamp(50.0, 100.0) as u8
}

/// Rank `candidates` against `query` with `metric` and keep the best `k`.
///
/// Returns at most `min(k, candidates.len())` results, closest first. Ties
/// keep their input order. An empty candidate list yields an empty result.
pub fn find_top_k<Id>(
    query: &[f32],
    candidates: &[Candidate<Id>],
    k: usize,
    metric: Metric,
) -> Result<Vec<MatchResult<Id>>, MatchError>
where
    Id: Clone + fmt::Display,
{
    if k == 0 {
        return Err(MatchError::InvalidK(k));
    }
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored: Vec<(usize, f32)> = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        let raw = metric
            .measure(query, &candidate.vector)
            .map_err(|err| match err {
                MatchError::DimensionMismatch {
                    expected, actual, ..
                } => MatchError::DimensionMismatch {
                    expected,
                    actual,
                    candidate: Some(candidate.id.to_string()),
                },
                other => other,
            })?;
        scored.push((idx, raw));
    }

    // `sort_by` is stable: equal scores stay in candidate order.
    scored.sort_by(|a, b| metric.closer_first(a.1, b.1));
    scored.truncate(k);

    Ok(scored
        .into_iter()
        .enumerate()
        .map(|(rank, (idx, raw))| MatchResult {
            id: candidates[idx].id.clone(),
            rank,
            score: rank_score(rank, k),
            raw,
            metric,
        })
        .collect())
}

/// Ranking front-end carrying a validated [`MatchConfig`].
///
/// Holds no candidate state; share it freely across requests.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Build a matcher after validating `cfg`.
    pub fn new(cfg: MatchConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Rank with the configured metric. `k = None` uses the configured default limit.
    pub fn find_top_k<Id>(
        &self,
        query: &[f32],
        candidates: &[Candidate<Id>],
        k: Option<usize>,
    ) -> Result<Vec<MatchResult<Id>>, MatchError>
    where
        Id: Clone + fmt::Display,
    {
        self.find_top_k_with(query, candidates, k, self.cfg.metric)
    }

    /// Rank with an explicit metric for this call.
    pub fn find_top_k_with<Id>(
        &self,
        query: &[f32],
        candidates: &[Candidate<Id>],
        k: Option<usize>,
        metric: Metric,
    ) -> Result<Vec<MatchResult<Id>>, MatchError>
    where
        Id: Clone + fmt::Display,
    {
        if candidates.len() > self.cfg.max_candidates {
            return Err(MatchError::TooManyCandidates {
                actual: candidates.len(),
                max: self.cfg.max_candidates,
            });
        }

        let k = k.unwrap_or(self.cfg.default_limit);
        let start = Instant::now();
        let hits = find_top_k(query, candidates, k, metric)?;

        tracing::debug!(
            metric = %metric,
            dim = query.len(),
            candidates = candidates.len(),
            k,
            returned = hits.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "ranked candidates"
        );

        Ok(hits)
    }
}
