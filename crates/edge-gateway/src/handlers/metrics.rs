//! Prometheus metrics endpoint handler.
//!
//! # Security
//!
//! This endpoint exposes only operational data with bounded cardinality
//! labels, never principals, tokens, or request payloads.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Returns Prometheus-formatted metrics for scraping.
#[tracing::instrument(skip_all, name = "gw.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
