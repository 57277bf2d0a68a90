//! realeader text embedding
//!
//! Turns free text into fixed-length vectors the matcher can rank. There is
//! no model behind it: [`SeededEmbedder`] derives a seed from the text and
//! expands it with a small linear congruential generator, so the same text
//! always gives the same vector and different texts usually give different
//! ones. That is enough to drive the matching flow end to end.
//!
//! Anything that can produce vectors plugs in through the [`Embedder`] trait.
//!
//! ## Quick example
//!
//! ```
//! use semantic::{Embedder, SeededEmbedder, SemanticConfig};
//!
//! let embedder = SeededEmbedder::new(SemanticConfig::default()).unwrap();
//! let v = embedder.embed("trouble sleeping before exams").unwrap();
//! assert_eq!(v.len(), 384);
//! assert_eq!(v, embedder.embed("trouble sleeping before exams").unwrap());
//! ```

pub mod config;
pub mod error;

mod normalize;
mod seeded;

pub use crate::config::SemanticConfig;
pub use crate::error::SemanticError;
pub use crate::normalize::l2_normalize_in_place;
pub use crate::seeded::{text_seed, SeededEmbedder};

/// Source of query and document vectors.
pub trait Embedder: Send + Sync {
    /// Embed `text` into a vector of [`Embedder::dim`] entries.
    fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError>;

    /// Length of every vector this embedder produces.
    fn dim(&self) -> usize;

    /// Label surfaced in logs and service metadata.
    fn model_name(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        (**self).embed(text)
    }

    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
