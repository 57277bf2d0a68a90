//! # realeader Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` ranks a set of candidate vectors against a query vector and
//! returns the top-k. It is the only piece of the matching flow that does
//! arithmetic; embedding the query, loading candidates and refining scores
//! with profile data all happen in the callers (`realeader` and the server).
//!
//! Every call is a pure function of its inputs. Candidates are passed in on
//! each call and nothing is cached between calls, so concurrent requests
//! never observe each other's candidate sets.
//!
//! ## Core Types
//!
//! - [`Metric`]: selects how closeness is measured:
//!   - `Cosine`: `dot(a,b) / (|a| * |b|)`, higher is closer.
//!   - `Euclidean`: `sqrt(sum((a_i - b_i)^2))`, lower is closer.
//! - [`Candidate`]: an opaque id paired with one vector.
//! - [`MatchResult`]: candidate id, rank, raw metric value and the
//!   rank-based `score` in `[50, 100]`.
//! - [`MatchConfig`]: default metric, default limit and the ceiling on the
//!   number of candidates accepted per call.
//! - [`Matcher`]: a validated config plus the ranking entry points.
//!
//! ## Scoring
//!
//! The score is derived from rank position, not from the metric value:
//! `max(50, round(100 - rank * 50 / k))` where `k` is the requested limit.
//! The top hit always scores 100 no matter how far away it actually is.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{find_top_k, Candidate, Metric};
//!
//! let candidates = vec![
//!     Candidate::new(1u64, vec![1.0, 0.0, 0.0]),
//!     Candidate::new(2u64, vec![0.0, 1.0, 0.0]),
//!     Candidate::new(3u64, vec![0.7, 0.7, 0.0]),
//! ];
//!
//! let hits = find_top_k(&[0.0, 1.0, 0.0], &candidates, 2, Metric::Cosine).unwrap();
//! assert_eq!(hits[0].id, 2);
//! assert_eq!(hits[0].score, 100);
//! assert_eq!(hits[1].id, 3);
//! assert_eq!(hits[1].score, 75);
//! ```

pub mod engine;
pub mod metric;
pub mod types;

pub use crate::engine::{find_top_k, rank_score, Matcher};
pub use crate::metric::{cosine_similarity, euclidean_distance, Metric};
pub use crate::types::{Candidate, MatchConfig, MatchError, MatchResult, Vector};
