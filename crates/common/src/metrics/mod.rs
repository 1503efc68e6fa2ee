//! Metrics utilities
//!
//! Prometheus-style metrics with standardized naming.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all StudyPoint metrics
pub const METRICS_PREFIX: &str = "studypoint";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_catalog_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of browse/filter queries"
    );

    describe_gauge!(
        format!("{}_catalog_results_count", METRICS_PREFIX),
        Unit::Count,
        "Number of resources matching the last browse query"
    );

    describe_counter!(
        format!("{}_taxonomy_reloads_total", METRICS_PREFIX),
        Unit::Count,
        "Total taxonomy cache reloads"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record a browse/filter query
pub fn record_catalog_query(duration_secs: f64, result_count: usize) {
    counter!(format!("{}_catalog_queries_total", METRICS_PREFIX)).increment(1);

    histogram!(format!("{}_request_duration_seconds", METRICS_PREFIX), "endpoint" => "catalog")
        .record(duration_secs);

    gauge!(format!("{}_catalog_results_count", METRICS_PREFIX)).set(result_count as f64);
}

/// Record a taxonomy cache reload
pub fn record_taxonomy_reload() {
    counter!(format!("{}_taxonomy_reloads_total", METRICS_PREFIX)).increment(1);
}
