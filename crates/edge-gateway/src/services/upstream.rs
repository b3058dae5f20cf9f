//! HTTP client for forwarding requests to the backend services.
//!
//! The gateway's contract to backends is carried in the headers the auth
//! middleware injected before a request reaches this client; the client
//! itself just relays the enriched request and the backend's response.
//!
//! # Security
//!
//! - Timeouts prevent a slow backend from pinning gateway connections
//! - Hop-by-hop headers are stripped in both directions
//! - Errors are logged server-side; clients see only a 502

use crate::errors::GatewayError;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// Default timeout for upstream requests in seconds.
const UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Headers that describe the gateway-to-backend connection rather than
/// the request itself; never relayed in either direction.
const HOP_BY_HOP_HEADERS: [&str; 4] = ["connection", "host", "transfer-encoding", "content-length"];

/// HTTP client for the backend services.
#[derive(Clone)]
pub struct UpstreamClient {
    /// HTTP client with configured timeouts.
    client: Client,
}

impl UpstreamClient {
    /// Create a client with the gateway's forwarding timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the underlying client cannot
    /// be constructed.
    pub fn new() -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
            .build()
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(Self { client })
    }

    /// Forward a request to `base_url` and relay the upstream response.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Upstream`] when the backend cannot be
    /// reached or fails mid-response. Backend error *statuses* (4xx/5xx)
    /// are not errors here; they are relayed verbatim.
    #[instrument(skip_all, name = "gw.upstream.forward", fields(base_url = %base_url))]
    pub async fn forward(
        &self,
        base_url: &str,
        method: Method,
        path_and_query: &str,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<Response, GatewayError> {
        let url = format!("{base_url}{path_and_query}");

        let upstream = self
            .client
            .request(method, &url)
            .headers(sanitize_headers(headers))
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        let status = upstream.status();
        let headers = sanitize_headers(upstream.headers().clone());
        let body = upstream
            .bytes()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Drop hop-by-hop headers before relaying.
///
/// `host` and `content-length` are recomputed by the HTTP stack for the
/// outbound leg; relaying the inbound values would corrupt the request.
fn sanitize_headers(mut headers: HeaderMap) -> HeaderMap {
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(name);
    }
    headers
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_sanitize_headers_strips_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("gateway.local"));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("content-length", HeaderValue::from_static("42"));
        headers.insert("x-auth-user", HeaderValue::from_static("alice"));

        let sanitized = sanitize_headers(headers);

        assert!(sanitized.get("host").is_none());
        assert!(sanitized.get("connection").is_none());
        assert!(sanitized.get("content-length").is_none());
        assert_eq!(
            sanitized.get("x-auth-user"),
            Some(&HeaderValue::from_static("alice"))
        );
    }

    #[test]
    fn test_upstream_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<UpstreamClient>();
    }
}
