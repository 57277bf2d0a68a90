use serde::{Deserialize, Serialize};

use crate::SemanticError;

/// Runtime configuration for the embedder.
///
/// # Example
/// ```
/// use semantic::SemanticConfig;
///
/// let cfg = SemanticConfig {
///     normalize: true,
///     ..Default::default()
/// };
/// assert_eq!(cfg.dim, 384);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticConfig {
    /// Friendly label surfaced in logs and service metadata.
    #[serde(default = "SemanticConfig::default_model_name")]
    pub model_name: String,
    /// Vector length. 384 mirrors common small sentence-embedding models.
    #[serde(default = "SemanticConfig::default_dim")]
    pub dim: usize,
    /// L2-normalize every vector to unit length.
    #[serde(default)]
    pub normalize: bool,
}

impl SemanticConfig {
    fn default_model_name() -> String {
        "seeded-lcg-384".into()
    }

    fn default_dim() -> usize {
        384
    }

    pub fn validate(&self) -> Result<(), SemanticError> {
        if self.dim == 0 {
            return Err(SemanticError::InvalidConfig(
                "dim must be greater than zero".into(),
            ));
        }
        if self.model_name.trim().is_empty() {
            return Err(SemanticError::InvalidConfig(
                "model_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model_name: Self::default_model_name(),
            dim: Self::default_dim(),
            normalize: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = SemanticConfig::default();
        assert_eq!(cfg.model_name, "seeded-lcg-384");
        assert_eq!(cfg.dim, 384);
        assert!(!cfg.normalize);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_dim_rejected() {
        let cfg = SemanticConfig {
            dim: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("dim"));
    }

    #[test]
    fn blank_model_name_rejected() {
        let cfg = SemanticConfig {
            model_name: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SemanticError::InvalidConfig(_))
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SemanticConfig = serde_json::from_str(r#"{"normalize":true}"#).unwrap();
        assert!(cfg.normalize);
        assert_eq!(cfg.dim, 384);
        assert_eq!(cfg.model_name, "seeded-lcg-384");
    }
}
