//! YAML configuration file support for the realeader pipeline.
//!
//! All stage settings (semantic, matcher, store) live in a single YAML file
//! that is loaded and validated at startup.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "demo"
//!
//! semantic:
//!   model_name: "seeded-lcg-384"
//!   dim: 384
//!   normalize: false
//!
//! matcher:
//!   metric: "cosine"
//!   default_limit: 10
//!   max_candidates: 10000
//!
//! store:
//!   seed: 42
//!   seed_demo_data: true
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    MatchConfig, MatchPipeline, Matcher, MemStorage, SeedConfig, SeededEmbedder, SemanticConfig,
};

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),

    #[error("failed to build pipeline: {0}")]
    Build(String),
}

/// Top-level YAML configuration for the matching pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub store: StoreYamlConfig,
}

impl PipelineConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.semantic
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("semantic: {err}")))?;
        self.matcher
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))?;

        Ok(())
    }

    /// Seed settings for the store, with the embedding length taken from
    /// the semantic section so stored and query vectors always agree.
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            seed: self.store.seed,
            seed_demo_data: self.store.seed_demo_data,
            embedding_dim: self.semantic.dim,
        }
    }

    /// Build the in-memory pipeline described by this configuration.
    pub fn build_pipeline(
        &self,
    ) -> Result<MatchPipeline<MemStorage, SeededEmbedder>, ConfigLoadError> {
        let embedder = SeededEmbedder::new(self.semantic.clone())
            .map_err(|err| ConfigLoadError::Build(err.to_string()))?;
        let matcher = Matcher::new(self.matcher.clone())
            .map_err(|err| ConfigLoadError::Build(err.to_string()))?;
        let storage = MemStorage::seeded(&self.seed_config())
            .map_err(|err| ConfigLoadError::Build(err.to_string()))?;

        info!(
            config = self.name.as_deref().unwrap_or("default"),
            model = %self.semantic.model_name,
            dim = self.semantic.dim,
            metric = %self.matcher.metric,
            "pipeline built"
        );

        Ok(MatchPipeline::new(
            Arc::new(storage),
            Arc::new(embedder),
            matcher,
        ))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            semantic: SemanticConfig::default(),
            matcher: MatchConfig::default(),
            store: StoreYamlConfig::default(),
        }
    }
}

/// Store YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreYamlConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "true_value")]
    pub seed_demo_data: bool,
}

impl Default for StoreYamlConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            seed_demo_data: true,
        }
    }
}

fn default_seed() -> u64 {
    SeedConfig::default().seed
}
fn true_value() -> bool {
    true
}
