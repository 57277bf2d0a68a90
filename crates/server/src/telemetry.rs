//! Prometheus recorder and pipeline metrics.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use realeader::{MatchKind, PipelineError, PipelineMetrics, SemanticError};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once per process and return its handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        register_metric_descriptions();
        tracing::info!("Prometheus metrics recorder initialized");
        Ok(handle)
    })
}

/// The installed handle, if [`init_metrics`] has run.
pub fn metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

fn register_metric_descriptions() {
    describe_counter!(
        "realeader_http_requests_total",
        "Total number of HTTP requests by method and status"
    );
    describe_counter!(
        "realeader_match_requests_total",
        "Match requests by entry point and outcome"
    );
    describe_histogram!(
        "realeader_match_latency_seconds",
        "End-to-end match latency in seconds"
    );
    describe_histogram!(
        "realeader_embed_latency_seconds",
        "Query embedding latency in seconds"
    );
}

/// Count one finished HTTP request.
pub fn record_http_request(method: &str, status: u16) {
    counter!(
        "realeader_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Forwards pipeline stage outcomes to the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusPipelineMetrics;

impl PipelineMetrics for PrometheusPipelineMetrics {
    fn record_embed(&self, latency: Duration, result: Result<(), SemanticError>) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        histogram!("realeader_embed_latency_seconds", "outcome" => outcome)
            .record(latency.as_secs_f64());
    }

    fn record_match(
        &self,
        kind: MatchKind,
        latency: Duration,
        result: Result<usize, PipelineError>,
    ) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!(
            "realeader_match_requests_total",
            "kind" => kind.as_str(),
            "outcome" => outcome
        )
        .increment(1);
        histogram!("realeader_match_latency_seconds", "kind" => kind.as_str())
            .record(latency.as_secs_f64());
    }
}
