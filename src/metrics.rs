/// Metrics and telemetry for Lostpaw
///
/// Prometheus-compatible counters for:
/// - HTTP request counts and latencies
/// - Intake submissions by kind and outcome
/// - Report mutations
/// - Orphaned image sweeps

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    // ========== HTTP Metrics ==========

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latencies in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // ========== Intake Metrics ==========

    /// Intake submissions by report kind and outcome
    pub static ref INTAKE_SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "intake_submissions_total",
        "Total number of intake submissions",
        &["kind", "outcome"]
    )
    .unwrap();

    /// Bytes of image data written to object storage
    pub static ref INTAKE_IMAGE_BYTES_TOTAL: IntCounter = register_int_counter!(
        "intake_image_bytes_total",
        "Total bytes of images stored by intake"
    )
    .unwrap();

    // ========== Mutation Metrics ==========

    /// Report mutations by outcome
    pub static ref REPORT_MUTATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "report_mutations_total",
        "Total number of report mutations",
        &["kind", "outcome"]
    )
    .unwrap();

    // ========== Sweep Metrics ==========

    /// Orphaned images handled by the sweep, by result
    pub static ref ORPHAN_SWEEP_TOTAL: IntCounterVec = register_int_counter_vec!(
        "orphan_sweep_total",
        "Upload intents processed by the orphan sweep",
        &["result"]
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration);
}

/// Record an intake outcome ("ok", "missing_image", "invalid", "storage_error", ...)
pub fn record_intake(kind: &str, outcome: &str) {
    INTAKE_SUBMISSIONS_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
}

/// Record stored image bytes
pub fn record_image_bytes(bytes: usize) {
    INTAKE_IMAGE_BYTES_TOTAL.inc_by(bytes as u64);
}

/// Record a mutation outcome
pub fn record_mutation(kind: &str, outcome: &str) {
    REPORT_MUTATIONS_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
}

/// Record a sweep result ("deleted", "kept", "failed")
pub fn record_sweep(result: &str) {
    ORPHAN_SWEEP_TOTAL.with_label_values(&[result]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/reports", 200, 0.05);
        let metrics = render_metrics();
        assert!(metrics.contains("http_requests_total"));
        assert!(metrics.contains("http_request_duration_seconds"));
    }

    #[test]
    fn test_record_intake_and_mutation() {
        record_intake("found", "ok");
        record_image_bytes(1024);
        record_mutation("found", "ok");
        let metrics = render_metrics();
        assert!(metrics.contains("intake_submissions_total"));
        assert!(metrics.contains("intake_image_bytes_total"));
        assert!(metrics.contains("report_mutations_total"));
    }

    #[test]
    fn test_record_sweep() {
        record_sweep("deleted");
        assert!(render_metrics().contains("orphan_sweep_total"));
    }
}
