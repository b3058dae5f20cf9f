//! Edge gateway error types.
//!
//! These cover the routing/forwarding plumbing only; the authentication
//! core rejects through its own response writer and never constructs a
//! `GatewayError`. Clients see a bare status code; detail is logged
//! server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Edge gateway error type.
///
/// Maps to HTTP status codes:
/// - NoRoute: 404 Not Found
/// - Upstream: 502 Bad Gateway
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No configured backend serves the requested path.
    #[error("No upstream route for path: {0}")]
    NoRoute(String),

    /// The upstream service could not be reached or failed mid-request.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NoRoute(_) => StatusCode::NOT_FOUND,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            GatewayError::NoRoute(path) => {
                tracing::debug!(target: "gw.errors", %path, "No upstream route for path");
            }
            GatewayError::Upstream(reason) => {
                tracing::error!(target: "gw.errors", %reason, "Upstream request failed");
            }
            GatewayError::Internal(reason) => {
                tracing::error!(target: "gw.errors", %reason, "Internal error");
            }
        }

        // Status only; no body that could aid probing.
        self.status_code().into_response()
    }
}
