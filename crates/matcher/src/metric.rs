use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::MatchError;

/// Chunk size for the auto-vectorized accumulation loops.
const SIMD_CHUNK_SIZE: usize = 32;

/// Closeness measure used for a single ranking.
///
/// A ranking never mixes metrics: the metric chosen for a call decides both
/// how each candidate is measured and which direction the sort runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Cosine similarity in `[-1, 1]`; higher is closer.
    #[default]
    Cosine,
    /// Euclidean (L2) distance in `[0, inf)`; lower is closer.
    Euclidean,
}

impl Metric {
    /// Measure `a` against `b` with this metric.
    pub fn measure(self, a: &[f32], b: &[f32]) -> Result<f32, MatchError> {
        match self {
            Metric::Cosine => cosine_similarity(a, b),
            Metric::Euclidean => euclidean_distance(a, b),
        }
    }

    /// `true` when larger values mean closer vectors.
    pub fn higher_is_closer(self) -> bool {
        matches!(self, Metric::Cosine)
    }

    /// Order two raw values so that the closer one sorts first.
    ///
    /// NaN always sorts last regardless of direction.
    pub fn closer_first(self, a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if self.higher_is_closer() => b.total_cmp(&a),
            (false, false) => a.total_cmp(&b),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Metric::Cosine),
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            other => Err(MatchError::InvalidConfig(format!(
                "unknown metric `{other}` (expected `cosine` or `euclidean`)"
            ))),
        }
    }
}

#[inline]
fn check_dims(a: &[f32], b: &[f32]) -> Result<(), MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
            candidate: None,
        });
    }
    Ok(())
}

/// Cosine similarity between two equal-length vectors.
///
/// A zero-norm operand yields `0.0` rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, MatchError> {
    check_dims(a, b)?;

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (ca, cb) in a.chunks(SIMD_CHUNK_SIZE).zip(b.chunks(SIMD_CHUNK_SIZE)) {
        let (d, na, nb) = dot_and_norms_chunk(ca, cb);
        dot += d;
        norm_a += na;
        norm_b += nb;
    }

    let norm_a = norm_a.sqrt();
    let norm_b = norm_b.sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Euclidean distance between two equal-length vectors.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32, MatchError> {
    check_dims(a, b)?;

    let sum_sq: f32 = a
        .chunks(SIMD_CHUNK_SIZE)
        .zip(b.chunks(SIMD_CHUNK_SIZE))
        .map(|(ca, cb)| squared_diff_chunk(ca, cb))
        .sum();

    Ok(sum_sq.sqrt())
}

#[inline(always)]
fn dot_and_norms_chunk(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
    a.iter()
        .zip(b.iter())
        .fold((0.0, 0.0, 0.0), |(dot, na, nb), (&x, &y)| {
            (dot + x * y, na + x * x, nb + y * y)
        })
}

#[inline(always)]
fn squared_diff_chunk(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo_vector(len: usize, salt: u32) -> Vec<f32> {
        (0..len)
            .map(|i| (((i as u32).wrapping_mul(2_654_435_761) ^ salt) % 1000) as f32 / 500.0 - 1.0)
            .collect()
    }

    #[test]
    fn cosine_of_vector_with_itself_is_one() {
        for salt in [1, 7, 42, 9001] {
            let v = pseudo_vector(384, salt);
            let sim = cosine_similarity(&v, &v).unwrap();
            assert!((sim - 1.0).abs() < 1e-6, "salt={salt} sim={sim}");
        }
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[-1.0, -2.0, -3.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let sim = cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn euclidean_matches_hand_computation() {
        let d = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
        assert!((d - 5.0).abs() < 1e-6);
        assert_eq!(euclidean_distance(&[1.5, -2.0], &[1.5, -2.0]).unwrap(), 0.0);
    }

    #[test]
    fn chunked_cosine_agrees_with_naive_formula() {
        // 100 is not a multiple of the chunk size, so the tail chunk is exercised.
        let a = pseudo_vector(100, 3);
        let b = pseudo_vector(100, 11);
        let dot: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - dot / (na * nb)).abs() < 1e-5);
    }

    #[test]
    fn unequal_lengths_are_rejected_by_both_metrics() {
        for metric in [Metric::Cosine, Metric::Euclidean] {
            let err = metric.measure(&[1.0, 2.0], &[1.0]).unwrap_err();
            assert!(matches!(
                err,
                MatchError::DimensionMismatch {
                    expected: 2,
                    actual: 1,
                    ..
                }
            ));
        }
    }

    #[test]
    fn closer_first_respects_direction() {
        assert_eq!(Metric::Cosine.closer_first(0.9, 0.1), Ordering::Less);
        assert_eq!(Metric::Euclidean.closer_first(0.9, 0.1), Ordering::Greater);
        assert_eq!(Metric::Cosine.closer_first(f32::NAN, -1.0), Ordering::Greater);
        assert_eq!(Metric::Euclidean.closer_first(f32::NAN, 1e9), Ordering::Greater);
    }

    #[test]
    fn metric_parses_and_serializes_lowercase() {
        assert_eq!("Cosine".parse::<Metric>().unwrap(), Metric::Cosine);
        assert_eq!("l2".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert!("manhattan".parse::<Metric>().is_err());
        assert_eq!(
            serde_json::to_string(&Metric::Euclidean).unwrap(),
            "\"euclidean\""
        );
    }
}
