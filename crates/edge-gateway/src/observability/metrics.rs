//! Metrics definitions for the edge gateway.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gw_` prefix for the gateway
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: 7 values max (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS)
//! - `endpoint`: backend route families plus the operational endpoints
//! - `status`: 3 values (success, error, timeout)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus metrics recorder and return the handle for
/// serving metrics via HTTP.
///
/// Must be called once, before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if the recorder fails to install (e.g., already
/// installed by an earlier call).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("gw_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record HTTP request completion
///
/// Metric: `gw_http_requests_total`, `gw_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
///
/// Captures ALL responses, including the 401s written by the auth
/// middleware and framework-level 404/405/408.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    // Normalize endpoint to prevent cardinality explosion
    let normalized_endpoint = normalize_endpoint(endpoint);

    let status = categorize_status_code(status_code);

    histogram!("gw_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("gw_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize a request path to a bounded endpoint label.
///
/// Proxied paths collapse to their backend route family; everything
/// unrecognized collapses to `/other`.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/metrics" => path.to_string(),
        _ => normalize_service_endpoint(path),
    }
}

/// Collapse a proxied path onto its backend route family.
fn normalize_service_endpoint(path: &str) -> String {
    for family in ["/api/auth", "/api/user", "/api/artist", "/api/event"] {
        if path.starts_with(family) {
            return format!("{family}/*");
        }
    }

    "/other".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(204), "success");
        assert_eq!(categorize_status_code(401), "error");
        assert_eq!(categorize_status_code(502), "error");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(504), "timeout");
    }

    #[test]
    fn test_normalize_endpoint_static_paths() {
        assert_eq!(normalize_endpoint("/health"), "/health");
        assert_eq!(normalize_endpoint("/metrics"), "/metrics");
        assert_eq!(normalize_endpoint("/"), "/");
    }

    #[test]
    fn test_normalize_endpoint_route_families() {
        assert_eq!(normalize_endpoint("/api/user/42"), "/api/user/*");
        assert_eq!(normalize_endpoint("/api/auth/login"), "/api/auth/*");
        assert_eq!(
            normalize_endpoint("/api/artist/public/list"),
            "/api/artist/*"
        );
        assert_eq!(normalize_endpoint("/api/event/7/attendees"), "/api/event/*");
    }

    #[test]
    fn test_normalize_endpoint_unknown_is_bounded() {
        assert_eq!(normalize_endpoint("/totally/unknown/path"), "/other");
        assert_eq!(normalize_endpoint("/api/unknown"), "/other");
    }

    #[test]
    fn test_record_http_request_does_not_panic_without_recorder() {
        // The metrics facade no-ops when no recorder is installed.
        record_http_request("GET", "/api/user/1", 200, Duration::from_millis(5));
    }
}
