//! Workspace umbrella crate for realeader therapist matching.
//!
//! This crate stitches the embedder, the directory store and the matcher
//! together so callers can go from free text (or a precomputed vector) to a
//! ranked list of therapists with a single API entry point.
//!
//! Every call snapshots the candidate set from the store; nothing is cached
//! between calls, so therapists added at runtime are visible immediately.
//!
//! ```
//! use std::sync::Arc;
//! use realeader::{MatchPipeline, Matcher, MemStorage, SeedConfig, SeededEmbedder};
//!
//! let storage = Arc::new(MemStorage::seeded(&SeedConfig::default()).unwrap());
//! let embedder = Arc::new(SeededEmbedder::default());
//! let pipeline = MatchPipeline::new(storage, embedder, Matcher::default());
//! let matches = pipeline.search_text("I feel anxious before exams", Some(2), None).unwrap();
//! assert_eq!(matches.len(), 2);
//! assert_eq!(matches[0].score, 100);
//! ```

pub mod config;

pub use matcher::{
    cosine_similarity, euclidean_distance, find_top_k, rank_score, Candidate, MatchConfig,
    MatchError, MatchResult, Matcher, Metric, Vector,
};
pub use semantic::{Embedder, SeededEmbedder, SemanticConfig, SemanticError};
pub use store::{
    Community, CommunityStatus, MemStorage, NewCommunity, NewTherapist, NewUser, RecordId,
    SeedConfig, Storage, StoreError, Therapist, User,
};

pub use crate::config::{ConfigLoadError, PipelineConfig};

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Result limit used by [`MatchPipeline::match_form`] before refinement.
pub const FORM_MATCH_LIMIT: usize = 10;

/// Errors that can occur while running a match through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Match(MatchError),
    Semantic(SemanticError),
    Store(StoreError),
    EmptyQuery,
    TherapistNotFound(RecordId),
    MissingEmbedding(RecordId),
    InvalidForm(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Match(err) => write!(f, "matching failed: {err}"),
            PipelineError::Semantic(err) => write!(f, "embedding failed: {err}"),
            PipelineError::Store(err) => write!(f, "storage failure: {err}"),
            PipelineError::EmptyQuery => write!(f, "search query is required"),
            PipelineError::TherapistNotFound(id) => write!(f, "therapist {id} not found"),
            PipelineError::MissingEmbedding(id) => {
                write!(f, "therapist {id} has no vector embedding")
            }
            PipelineError::InvalidForm(reason) => write!(f, "invalid matching form: {reason}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Match(err) => Some(err),
            PipelineError::Semantic(err) => Some(err),
            PipelineError::Store(err) => Some(err),
            PipelineError::EmptyQuery
            | PipelineError::TherapistNotFound(_)
            | PipelineError::MissingEmbedding(_)
            | PipelineError::InvalidForm(_) => None,
        }
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

impl From<SemanticError> for PipelineError {
    fn from(value: SemanticError) -> Self {
        PipelineError::Semantic(value)
    }
}

impl From<StoreError> for PipelineError {
    fn from(value: StoreError) -> Self {
        PipelineError::Store(value)
    }
}

/// Which entry point produced a ranking. Used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Text,
    Vector,
    Similar,
    Form,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Text => "text",
            MatchKind::Vector => "vector",
            MatchKind::Similar => "similar",
            MatchKind::Form => "form",
        }
    }
}

/// Observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_embed(&self, latency: Duration, result: Result<(), SemanticError>);
    /// `result` carries the number of matches returned.
    fn record_match(
        &self,
        kind: MatchKind,
        latency: Duration,
        result: Result<usize, PipelineError>,
    );
}

/// A therapist row joined with its match percentage.
///
/// Serializes as the therapist's own fields plus `match`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TherapistMatch {
    #[serde(flatten)]
    pub therapist: Therapist,
    #[serde(rename = "match")]
    pub score: u8,
}

/// Intake form submitted by a user looking for a therapist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchForm {
    pub feeling: String,
    pub prev_therapy: String,
    pub goals: Vec<String>,
    #[serde(default)]
    pub preferences: Option<String>,
}

impl MatchForm {
    /// Checks the form before it is embedded.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.goals.is_empty() {
            return Err(PipelineError::InvalidForm(
                "at least one goal is required".into(),
            ));
        }
        Ok(())
    }

    /// Flattens the form into the text that gets embedded.
    pub fn query_text(&self) -> String {
        let preferences = match self.preferences.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "None",
        };
        format!(
            "Feeling: {}. Previous therapy experience: {}. Goals: {}. Preferences: {}",
            self.feeling,
            self.prev_therapy,
            self.goals.join(", "),
            preferences
        )
    }
}

/// Applies the form boosts to a ranked list and re-sorts it.
///
/// Each goal found inside any specialty adds 5; a bio containing the
/// preferences (case-insensitive) adds 10. Scores are clamped to 100 and the
/// re-sort is stable, so equal scores keep their similarity order.
pub fn refine_matches(mut matches: Vec<TherapistMatch>, form: &MatchForm) -> Vec<TherapistMatch> {
    let preferences = form
        .preferences
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase);

    for m in &mut matches {
        let mut boost: u32 = 0;
        for goal in &form.goals {
            if m.therapist
                .specialties
                .iter()
                .any(|s| s.contains(goal.as_str()))
            {
                boost += 5;
            }
        }
        if let Some(prefs) = &preferences {
            if m.therapist.bio.to_lowercase().contains(prefs.as_str()) {
                boost += 10;
            }
        }
        m.score = (u32::from(m.score) + boost).min(100) as u8;
    }

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Embed → snapshot candidates → rank → join, over a shared store.
pub struct MatchPipeline<S, E> {
    storage: Arc<S>,
    embedder: Arc<E>,
    matcher: Matcher,
    metrics: Option<Arc<dyn PipelineMetrics>>,
}

impl<S, E> Clone for MatchPipeline<S, E> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            embedder: Arc::clone(&self.embedder),
            matcher: self.matcher.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: Storage, E: Embedder> MatchPipeline<S, E> {
    pub fn new(storage: Arc<S>, embedder: Arc<E>, matcher: Matcher) -> Self {
        Self {
            storage,
            embedder,
            matcher,
            metrics: None,
        }
    }

    /// Attach a stage observer.
    pub fn with_metrics(mut self, metrics: Arc<dyn PipelineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Rank therapists against free text.
    pub fn search_text(
        &self,
        query: &str,
        limit: Option<usize>,
        metric: Option<Metric>,
    ) -> Result<Vec<TherapistMatch>, PipelineError> {
        self.observe(MatchKind::Text, || {
            if query.trim().is_empty() {
                return Err(PipelineError::EmptyQuery);
            }
            let embedding = self.embed(query)?;
            self.rank(&embedding, None, limit, metric)
        })
    }

    /// Rank therapists against a precomputed vector.
    pub fn search_vector(
        &self,
        vector: &[f32],
        limit: Option<usize>,
        metric: Option<Metric>,
    ) -> Result<Vec<TherapistMatch>, PipelineError> {
        self.observe(MatchKind::Vector, || self.rank(vector, None, limit, metric))
    }

    /// Rank the other therapists against `therapist_id`'s embedding.
    pub fn similar_to(
        &self,
        therapist_id: RecordId,
        limit: Option<usize>,
    ) -> Result<Vec<TherapistMatch>, PipelineError> {
        self.observe(MatchKind::Similar, || {
            let therapist = self
                .storage
                .get_therapist(therapist_id)?
                .ok_or(PipelineError::TherapistNotFound(therapist_id))?;
            let embedding = therapist
                .vector_embedding
                .ok_or(PipelineError::MissingEmbedding(therapist_id))?;
            self.rank(&embedding, Some(therapist_id), limit, None)
        })
    }

    /// Embed the intake form, rank the top [`FORM_MATCH_LIMIT`] and apply
    /// [`refine_matches`].
    pub fn match_form(&self, form: &MatchForm) -> Result<Vec<TherapistMatch>, PipelineError> {
        self.observe(MatchKind::Form, || {
            form.validate()?;
            let embedding = self.embed(&form.query_text())?;
            let ranked = self.rank(&embedding, None, Some(FORM_MATCH_LIMIT), None)?;
            Ok(refine_matches(ranked, form))
        })
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let start = Instant::now();
        let result = self.embedder.embed(text);
        if let Some(metrics) = &self.metrics {
            let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
            metrics.record_embed(start.elapsed(), outcome);
        }
        Ok(result?)
    }

    fn candidates(
        &self,
        exclude: Option<RecordId>,
    ) -> Result<Vec<Candidate<RecordId>>, PipelineError> {
        Ok(self
            .storage
            .therapist_embeddings()?
            .into_iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .map(Candidate::from)
            .collect())
    }

    fn rank(
        &self,
        query: &[f32],
        exclude: Option<RecordId>,
        limit: Option<usize>,
        metric: Option<Metric>,
    ) -> Result<Vec<TherapistMatch>, PipelineError> {
        let candidates = self.candidates(exclude)?;
        let metric = metric.unwrap_or(self.matcher.config().metric);
        let hits = self
            .matcher
            .find_top_k_with(query, &candidates, limit, metric)?;

        let mut matches = Vec::with_capacity(hits.len());
        for hit in hits {
            // Rows are never deleted, but a miss is skipped rather than failing the call.
            if let Some(therapist) = self.storage.get_therapist(hit.id)? {
                matches.push(TherapistMatch {
                    therapist,
                    score: hit.score,
                });
            }
        }
        Ok(matches)
    }

    fn observe<F>(&self, kind: MatchKind, run: F) -> Result<Vec<TherapistMatch>, PipelineError>
    where
        F: FnOnce() -> Result<Vec<TherapistMatch>, PipelineError>,
    {
        let start = Instant::now();
        let result = run();
        if let Some(metrics) = &self.metrics {
            let outcome = result.as_ref().map(Vec::len).map_err(Clone::clone);
            metrics.record_match(kind, start.elapsed(), outcome);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    fn seeded_pipeline() -> MatchPipeline<MemStorage, SeededEmbedder> {
        let storage = Arc::new(MemStorage::seeded(&SeedConfig::default()).unwrap());
        MatchPipeline::new(storage, Arc::new(SeededEmbedder::default()), Matcher::default())
    }

    fn axis_pipeline() -> MatchPipeline<MemStorage, SeededEmbedder> {
        let storage = Arc::new(MemStorage::new());
        for (name, v) in [
            ("one", vec![1.0, 0.0, 0.0]),
            ("two", vec![0.0, 1.0, 0.0]),
            ("three", vec![0.0, 0.0, 1.0]),
        ] {
            storage
                .create_therapist(NewTherapist {
                    name: name.into(),
                    title: "t".into(),
                    bio: "b".into(),
                    photo: String::new(),
                    specialties: vec![],
                    rating: 4.0,
                    reviews: 1,
                    available: true,
                    vector_embedding: Some(v),
                })
                .unwrap();
        }
        MatchPipeline::new(storage, Arc::new(SeededEmbedder::default()), Matcher::default())
    }

    fn therapist_match(specialties: &[&str], bio: &str, score: u8) -> TherapistMatch {
        let storage = MemStorage::new();
        let therapist = storage
            .create_therapist(NewTherapist {
                name: format!("score-{score}"),
                title: "t".into(),
                bio: bio.into(),
                photo: String::new(),
                specialties: specialties.iter().map(|s| s.to_string()).collect(),
                rating: 4.0,
                reviews: 1,
                available: true,
                vector_embedding: None,
            })
            .unwrap();
        TherapistMatch { therapist, score }
    }

    fn form(goals: &[&str], preferences: Option<&str>) -> MatchForm {
        MatchForm {
            feeling: "anxious".into(),
            prev_therapy: "none".into(),
            goals: goals.iter().map(|g| g.to_string()).collect(),
            preferences: preferences.map(str::to_string),
        }
    }

    #[test]
    fn search_text_ranks_all_seeded_therapists() {
        let pipeline = seeded_pipeline();
        let matches = pipeline.search_text("exam stress", None, None).unwrap();
        assert_eq!(matches.len(), 3);
        let scores: Vec<_> = matches.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![100, 95, 90]);
    }

    #[test]
    fn search_text_is_deterministic() {
        let pipeline = seeded_pipeline();
        let a = pipeline.search_text("sleep problems", Some(3), None).unwrap();
        let b = pipeline.search_text("sleep problems", Some(3), None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn search_text_rejects_blank_query() {
        let pipeline = seeded_pipeline();
        assert_eq!(
            pipeline.search_text("   ", None, None),
            Err(PipelineError::EmptyQuery)
        );
    }

    #[test]
    fn search_vector_finds_exact_match_first() {
        let pipeline = axis_pipeline();
        for metric in [Metric::Cosine, Metric::Euclidean] {
            let matches = pipeline
                .search_vector(&[0.0, 1.0, 0.0], Some(3), Some(metric))
                .unwrap();
            assert_eq!(matches[0].therapist.name, "two");
            assert_eq!(matches[0].score, 100);
        }
    }

    #[test]
    fn search_vector_rejects_wrong_dimension() {
        let pipeline = axis_pipeline();
        let err = pipeline.search_vector(&[1.0, 0.0], None, None).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Match(MatchError::DimensionMismatch { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn similar_to_excludes_the_therapist_itself() {
        let pipeline = seeded_pipeline();
        let matches = pipeline.similar_to(1, Some(5)).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.therapist.id != 1));
    }

    #[test]
    fn similar_to_unknown_therapist() {
        let pipeline = seeded_pipeline();
        assert_eq!(
            pipeline.similar_to(99, None),
            Err(PipelineError::TherapistNotFound(99))
        );
    }

    #[test]
    fn similar_to_therapist_without_embedding() {
        let pipeline = axis_pipeline();
        let id = pipeline
            .storage()
            .create_therapist(NewTherapist {
                name: "no vector".into(),
                title: "t".into(),
                bio: "b".into(),
                photo: String::new(),
                specialties: vec![],
                rating: 3.0,
                reviews: 0,
                available: true,
                vector_embedding: None,
            })
            .unwrap()
            .id;
        assert_eq!(
            pipeline.similar_to(id, None),
            Err(PipelineError::MissingEmbedding(id))
        );
    }

    #[test]
    fn runtime_inserts_are_visible_without_rebuild() {
        let pipeline = axis_pipeline();
        pipeline
            .storage()
            .create_therapist(NewTherapist {
                name: "four".into(),
                title: "t".into(),
                bio: "b".into(),
                photo: String::new(),
                specialties: vec![],
                rating: 4.0,
                reviews: 1,
                available: true,
                vector_embedding: Some(vec![0.5, 0.5, 0.0]),
            })
            .unwrap();
        let matches = pipeline
            .search_vector(&[0.5, 0.5, 0.0], Some(1), None)
            .unwrap();
        assert_eq!(matches[0].therapist.name, "four");
    }

    #[test]
    fn query_text_layout() {
        let f = form(&["anxiety", "sleep"], None);
        assert_eq!(
            f.query_text(),
            "Feeling: anxious. Previous therapy experience: none. \
             Goals: anxiety, sleep. Preferences: None"
        );
        let f = form(&["anxiety"], Some("calm"));
        assert!(f.query_text().ends_with("Preferences: calm"));
    }

    #[test]
    fn refine_boosts_goals_and_preferences() {
        let ranked = vec![
            therapist_match(&["career"], "Career coaching.", 100),
            therapist_match(&["anxiety", "academic_stress"], "Calm CBT sessions.", 88),
        ];
        let refined = refine_matches(ranked, &form(&["anxiety", "academic"], Some("calm cbt")));
        // 88 + 5 + 5 + 10 clamps to 100; the stable sort keeps the first row ahead.
        assert_eq!(refined[0].therapist.name, "score-100");
        assert_eq!(refined[0].score, 100);
        assert_eq!(refined[1].score, 100);
    }

    #[test]
    fn refine_resorts_by_boosted_score() {
        let ranked = vec![
            therapist_match(&["career"], "Career coaching.", 75),
            therapist_match(&["trauma"], "Trauma informed care.", 63),
        ];
        let refined = refine_matches(ranked, &form(&["trauma"], Some("Informed")));
        assert_eq!(refined[0].therapist.specialties, vec!["trauma"]);
        assert_eq!(refined[0].score, 78);
        assert_eq!(refined[1].score, 75);
    }

    #[test]
    fn refine_ignores_empty_preferences() {
        let ranked = vec![therapist_match(&["career"], "Career coaching.", 60)];
        let refined = refine_matches(ranked, &form(&["sleep"], Some("")));
        assert_eq!(refined[0].score, 60);
    }

    #[test]
    fn match_form_requires_goals() {
        let pipeline = seeded_pipeline();
        let err = pipeline.match_form(&form(&[], None)).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidForm(_)));
    }

    #[test]
    fn match_form_returns_refined_matches() {
        let pipeline = seeded_pipeline();
        let matches = pipeline
            .match_form(&form(&["anxiety"], Some("academic stress")))
            .unwrap();
        assert_eq!(matches.len(), 3);
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
        let sarah = matches
            .iter()
            .find(|m| m.therapist.name == "Dr. Sarah Johnson")
            .unwrap();
        // anxiety goal (+5) and a bio mentioning academic stress (+10) push her to the cap.
        assert_eq!(sarah.score, 100);
    }

    #[test]
    fn therapist_match_serializes_flat_with_match_field() {
        let value = serde_json::to_value(therapist_match(&["anxiety"], "bio", 88)).unwrap();
        assert_eq!(value["match"], 88);
        assert_eq!(value["name"], "score-88");
        assert!(value.get("therapist").is_none());
        assert!(value.get("vectorEmbedding").is_none());
    }

    #[derive(Default)]
    struct CountingMetrics {
        events: RwLock<Vec<String>>,
    }

    impl PipelineMetrics for CountingMetrics {
        fn record_embed(&self, _latency: Duration, result: Result<(), SemanticError>) {
            let label = if result.is_ok() { "embed_ok" } else { "embed_err" };
            self.events.write().unwrap().push(label.to_string());
        }

        fn record_match(
            &self,
            kind: MatchKind,
            _latency: Duration,
            result: Result<usize, PipelineError>,
        ) {
            let label = match result {
                Ok(n) => format!("{}_ok_{n}", kind.as_str()),
                Err(_) => format!("{}_err", kind.as_str()),
            };
            self.events.write().unwrap().push(label);
        }
    }

    #[test]
    fn metrics_observer_tracks_stage_outcomes() {
        let metrics = Arc::new(CountingMetrics::default());
        let pipeline = seeded_pipeline().with_metrics(metrics.clone());

        pipeline.search_text("hello", Some(2), None).unwrap();
        pipeline.similar_to(42, None).unwrap_err();

        let events = metrics.events.read().unwrap().clone();
        assert_eq!(events, vec!["embed_ok", "text_ok_2", "similar_err"]);
    }
}
