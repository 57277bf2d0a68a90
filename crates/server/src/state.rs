use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::telemetry::{init_metrics, PrometheusPipelineMetrics};
use realeader::{MatchPipeline, MemStorage, PipelineConfig, SeededEmbedder};
use std::sync::Arc;

/// The concrete pipeline served over HTTP.
pub type Pipeline = MatchPipeline<MemStorage, SeededEmbedder>;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Matching pipeline over the in-memory directory (shared across requests)
    pub pipeline: Pipeline,
}

impl ServerState {
    /// Create new server state, building the pipeline from
    /// `config.pipeline_config` when set and from defaults otherwise.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let pipeline_cfg = match &config.pipeline_config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        let mut pipeline = pipeline_cfg.build_pipeline()?;

        if config.metrics_enabled {
            match init_metrics() {
                Ok(_) => {
                    pipeline = pipeline.with_metrics(Arc::new(PrometheusPipelineMetrics));
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        "metrics recorder unavailable, continuing without it"
                    );
                }
            }
        }

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Wrap an already-built pipeline.
    pub fn with_pipeline(config: ServerConfig, pipeline: Pipeline) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
        }
    }
}

/// Server metadata for the root endpoint
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
    pub model: String,
    pub metric: String,
}
