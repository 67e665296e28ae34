//! Metrics and observability utilities
//!
//! Prometheus metrics with SLO-aligned histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Acado metrics
pub const METRICS_PREFIX: &str = "acado";

/// SLO-aligned histogram buckets for request latency (in seconds)
/// Targets: P50 < 50ms, P99 < 250ms
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms - P50 target
    0.100,  // 100ms
    0.250,  // 250ms - P99 target
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
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

    // Domain metrics
    describe_counter!(
        format!("{}_university_mutations_total", METRICS_PREFIX),
        Unit::Count,
        "University creates, updates and deletes"
    );

    describe_counter!(
        format!("{}_university_delete_conflicts_total", METRICS_PREFIX),
        Unit::Count,
        "University deletes refused because courses still reference them"
    );

    describe_counter!(
        format!("{}_course_mutations_total", METRICS_PREFIX),
        Unit::Count,
        "Course creates, updates and deletes"
    );

    describe_counter!(
        format!("{}_dropped_inputs_total", METRICS_PREFIX),
        Unit::Count,
        "Invalid filter or update values silently omitted"
    );

    describe_counter!(
        format!("{}_form_transitions_total", METRICS_PREFIX),
        Unit::Count,
        "Application form lifecycle transitions"
    );

    describe_counter!(
        format!("{}_publish_checks_total", METRICS_PREFIX),
        Unit::Count,
        "Event and scholarship publish checklist evaluations"
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

/// Record a university create/update/delete
pub fn record_university_mutation(op: &'static str) {
    counter!(
        format!("{}_university_mutations_total", METRICS_PREFIX),
        "op" => op
    )
    .increment(1);
}

/// Record a delete refused because of referencing courses
pub fn record_delete_conflict() {
    counter!(format!("{}_university_delete_conflicts_total", METRICS_PREFIX)).increment(1);
}

pub fn record_course_mutation(op: &'static str) {
    counter!(
        format!("{}_course_mutations_total", METRICS_PREFIX),
        "op" => op
    )
    .increment(1);
}

/// Record an input value that was omitted instead of rejected
pub fn record_dropped_input(field: &'static str) {
    counter!(
        format!("{}_dropped_inputs_total", METRICS_PREFIX),
        "field" => field
    )
    .increment(1);
}

pub fn record_form_transition(to: &'static str) {
    counter!(
        format!("{}_form_transitions_total", METRICS_PREFIX),
        "to" => to
    )
    .increment(1);
}

pub fn record_publish_check(kind: &'static str, publishable: bool) {
    counter!(
        format!("{}_publish_checks_total", METRICS_PREFIX),
        "kind" => kind,
        "publishable" => publishable.to_string()
    )
    .increment(1);
}
