//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "trueframe_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "trueframe_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "trueframe_http_requests_in_flight";

    // Analysis metrics
    pub const ANALYSES_TOTAL: &str = "trueframe_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "trueframe_analysis_duration_seconds";
    pub const ANALYSIS_FAILURES_TOTAL: &str = "trueframe_analysis_failures_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a completed analysis with its verdict.
pub fn record_analysis(verdict: &str, duration_secs: f64) {
    let labels = [("verdict", verdict.to_string())];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS).record(duration_secs);
}

/// Record a failed analysis.
pub fn record_analysis_failure(kind: &str) {
    let labels = [("kind", kind.to_string())];
    counter!(names::ANALYSIS_FAILURES_TOTAL, &labels).increment(1);
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
