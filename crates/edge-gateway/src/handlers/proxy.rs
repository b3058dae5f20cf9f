//! Fallback handler forwarding requests to the backend services.
//!
//! Runs strictly after the authentication middleware, so every request
//! seen here either carries the trusted identity headers or arrived on
//! an exempt route. Each request produces exactly one upstream call.

use crate::errors::GatewayError;
use crate::routes::AppState;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::response::Response;
use std::sync::Arc;
use tracing::instrument;

/// Largest request body the gateway will buffer for forwarding (2 MiB).
const MAX_FORWARD_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Fallback handler: resolve the backend for the path and relay.
#[instrument(skip_all, name = "gw.proxy.forward", fields(path = %req.uri().path()))]
pub async fn forward_to_backend(
    State(state): State<Arc<AppState>>,
    req: Request,
) -> Result<Response, GatewayError> {
    let path = req.uri().path().to_string();

    let base_url = state
        .config
        .upstream_for(&path)
        .ok_or_else(|| GatewayError::NoRoute(path.clone()))?
        .to_string();

    let path_and_query = req
        .uri()
        .path_and_query()
        .map_or(path, |pq| pq.as_str().to_string());

    let (parts, body) = req.into_parts();
    let body = to_bytes(body, MAX_FORWARD_BODY_BYTES)
        .await
        .map_err(|e| GatewayError::Internal(e.to_string()))?;

    state
        .upstream
        .forward(&base_url, parts.method, &path_and_query, parts.headers, body)
        .await
}
