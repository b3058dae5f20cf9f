//! Health check handler.

use axum::Json;
use serde::Serialize;
use tracing::instrument;

/// Liveness probe response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process is serving.
    pub status: String,

    /// Service identifier for fleet dashboards.
    pub service: String,
}

/// Handler for GET /health
///
/// The gateway holds no connections of its own to probe; if the process
/// answers, it is healthy. Backend health is each backend's concern.
#[instrument(skip_all, name = "gw.health.check")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "edge-gateway".to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let Json(response) = health_check().await;

        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "edge-gateway");
    }
}
