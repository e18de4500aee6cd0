//! Pipeline metrics and Prometheus export.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;
use std::time::Duration;

pub const PIPELINE_RUNS_TOTAL: &str = "tour_pipeline_runs_total";
pub const PIPELINE_FAILURES_TOTAL: &str = "tour_pipeline_failures_total";
pub const STAGE_DURATION_SECONDS: &str = "tour_stage_duration_seconds";

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Must run once at startup, before any
/// metric is recorded.
pub fn init_metrics() -> Result<(), AppError> {
    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))
    })?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| AppError::ConfigError(anyhow::anyhow!("Metrics recorder already initialized")))
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_stage(stage: &'static str, elapsed: Duration) {
    histogram!(STAGE_DURATION_SECONDS, "stage" => stage).record(elapsed.as_secs_f64());
}

/// `outcome` is `success` or `failure`.
pub fn record_run(outcome: &'static str) {
    counter!(PIPELINE_RUNS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_failure(kind: &'static str) {
    counter!(PIPELINE_FAILURES_TOTAL, "kind" => kind).increment(1);
}
