use crate::normalize::l2_normalize_in_place;
use crate::{Embedder, SemanticConfig, SemanticError};

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233_280;

/// Seed derived from `text`: for each character, the first UTF-16 code
/// unit of its encoding, summed. Characters outside the BMP contribute
/// their high surrogate.
///
/// Anagrams share a seed and therefore a vector.
pub fn text_seed(text: &str) -> u64 {
    text.chars()
        .map(|c| {
            let mut units = [0u16; 2];
            u64::from(c.encode_utf16(&mut units)[0])
        })
        .sum()
}

/// Linear congruential generator yielding values in `[0, 1)`.
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        // Reducing first keeps the multiply in range; the sequence is unchanged.
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    fn next_unit(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }
}

/// Deterministic embedder: same text, same vector.
///
/// Components are uniform-ish in `[-1, 1)` unless `normalize` is set.
#[derive(Debug, Clone)]
pub struct SeededEmbedder {
    cfg: SemanticConfig,
}

impl SeededEmbedder {
    pub fn new(cfg: SemanticConfig) -> Result<Self, SemanticError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &SemanticConfig {
        &self.cfg
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut rng = Lcg::new(text_seed(text));
        let mut v: Vec<f32> = (0..self.cfg.dim)
            .map(|_| (rng.next_unit() * 2.0 - 1.0) as f32)
            .collect();
        if self.cfg.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

impl Default for SeededEmbedder {
    fn default() -> Self {
        Self {
            cfg: SemanticConfig::default(),
        }
    }
}

impl Embedder for SeededEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        let v = self.generate(text);
        tracing::trace!(chars = text.chars().count(), dim = v.len(), "embedded text");
        Ok(v)
    }

    fn dim(&self) -> usize {
        self.cfg.dim
    }

    fn model_name(&self) -> &str {
        &self.cfg.model_name
    }
}
