//! HTTP routes for the edge gateway.
//!
//! Defines the Axum router and application state. The authentication
//! middleware is layered over the merged router, so every route
//! (operational endpoints included) goes through the same choke point
//! and is admitted only by the pre-flight, public-prefix, or whitelist
//! rules, or by a verified token.

use crate::auth::{TokenCodec, Whitelist};
use crate::config::Config;
use crate::handlers;
use crate::middleware::{authenticate, http_metrics_middleware, AuthState};
use crate::services::UpstreamClient;
use axum::http::{HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// HTTP client for the backend services.
    pub upstream: UpstreamClient,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (admitted via the default whitelist)
/// - `/metrics` - Prometheus metrics endpoint
/// - fallback - forwarding to the backend services
/// - authentication middleware over everything
/// - CORS, TraceLayer, 30 second timeout, HTTP metrics (outermost)
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let codec = Arc::new(TokenCodec::new(
        &state.config.jwt_secret,
        Duration::from_secs(state.config.token_ttl_seconds),
    ));
    let whitelist = Whitelist::new(&state.config.whitelist);
    tracing::info!(
        prefixes = ?whitelist.prefixes(),
        "Route whitelist normalized"
    );

    let auth_state = Arc::new(AuthState {
        codec,
        whitelist,
        public_prefixes: state.config.public_prefixes.clone(),
    });

    let cors = cors_layer(&state.config);

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Everything else: the health probe plus the forwarding fallback
    let service_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .fallback(handlers::forward_to_backend)
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. authenticate - the single choke point (innermost)
    // 2. CORS - response header decoration + browser pre-flight handling
    // 3. TraceLayer - log request details
    // 4. TimeoutLayer - bound the request
    // 5. http_metrics_middleware - record ALL responses (outermost)
    metrics_routes
        .merge(service_routes)
        .layer(middleware::from_fn_with_state(auth_state, authenticate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}

/// CORS layer for the browser frontend.
///
/// Credentialed requests forbid the `Any` shorthand, so allowed headers
/// mirror the pre-flight request instead.
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    match config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                origin = %config.allowed_origin,
                "Invalid CORS origin in configuration; browser clients will be refused"
            );
            layer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // AppState must implement Clone for Axum's State extractor.
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_config_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Config>();
    }
}
