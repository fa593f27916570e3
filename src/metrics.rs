//! Prometheus wiring: recorder install, series registration, and the
//! `/metrics` route.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn describe_pipeline_metrics() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("sanitize_rows_total", "Candidate rows consumed by the filter.");
        describe_counter!("sanitize_accepted_total", "Rows accepted for persistence.");
        describe_counter!(
            "sanitize_duplicates_total",
            "Rows dropped as in-batch duplicates."
        );
        describe_counter!("sanitize_invalid_total", "Rows dropped for invalid emails.");
        describe_counter!(
            "sanitize_suspicious_total",
            "Rows dropped for hash-like local parts."
        );
        describe_counter!("sanitize_optout_total", "Rows dropped by opt-out suppression.");
        describe_counter!("upsert_inserted_total", "Contacts the backend inserted.");
        describe_counter!("upsert_updated_total", "Contacts the backend updated.");
        describe_counter!("upsert_chunk_errors_total", "Upsert chunk failures.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when a sanitization run last finished."
        );
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Call once at startup, before the
    /// first pipeline run.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");
        describe_pipeline_metrics();
        Self { handle }
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
