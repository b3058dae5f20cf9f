//! End-to-end gateway tests.
//!
//! Builds the full router (auth choke point, CORS, proxy fallback,
//! operational endpoints) and forwards to a wiremock upstream, asserting
//! what the backend actually receives and what the client gets back.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::secret::SecretString;
use edge_gateway::auth::TokenCodec;
use edge_gateway::config::Config;
use edge_gateway::routes::{self, AppState};
use edge_gateway::services::UpstreamClient;
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_SECRET: &str = "gateway-e2e-secret";

/// Global metrics handle: the Prometheus recorder installs once per process.
static TEST_METRICS_HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> =
    OnceLock::new();

fn get_test_metrics_handle() -> metrics_exporter_prometheus::PrometheusHandle {
    TEST_METRICS_HANDLE
        .get_or_init(|| {
            routes::init_metrics_recorder().unwrap_or_else(|_| {
                metrics_exporter_prometheus::PrometheusBuilder::new()
                    .build_recorder()
                    .handle()
            })
        })
        .clone()
}

/// Build the full gateway router with every backend pointed at `upstream_url`.
fn gateway(upstream_url: &str) -> Router {
    let vars = HashMap::from([
        ("GATEWAY_JWT_SECRET".to_string(), TEST_SECRET.to_string()),
        ("USER_SERVICE_URL".to_string(), upstream_url.to_string()),
        ("ARTIST_SERVICE_URL".to_string(), upstream_url.to_string()),
        ("EVENT_SERVICE_URL".to_string(), upstream_url.to_string()),
    ]);
    let config = Config::from_vars(&vars).expect("config should load");
    let upstream = UpstreamClient::new().expect("client should build");

    routes::build_routes(
        Arc::new(AppState { config, upstream }),
        get_test_metrics_handle(),
    )
}

fn bearer_token() -> String {
    TokenCodec::new(&SecretString::from(TEST_SECRET), Duration::from_secs(600))
        .issue("alice@example.com", 7, "ROLE_USER")
        .expect("issue")
}

async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn test_authenticated_request_reaches_backend_with_identity_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/event/7"))
        .and(header_matcher("x-auth-user", "alice@example.com"))
        .and(header_matcher("x-auth-roles", "ROLE_USER"))
        .and(header_matcher("x-user-id", "7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 7, "name": "Encore Fest"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = gateway(&mock_server.uri());
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/event/7")
        .header(header::AUTHORIZATION, bearer_token())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["name"], "Encore Fest");
}

#[tokio::test]
async fn test_public_route_family_forwarded_without_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/artist/public/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"artists": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = gateway(&mock_server.uri());
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/artist/public/list")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unauthenticated_request_never_reaches_backend() {
    let mock_server = MockServer::start().await;

    // The expect(0) assertion fails the test if the gateway forwards
    // anything at all.
    Mock::given(method("GET"))
        .and(path("/api/event/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = gateway(&mock_server.uri());
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/event/7")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(response.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_backend_error_status_is_relayed_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let app = gateway(&mock_server.uri());
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/user/99")
        .header(header::AUTHORIZATION, bearer_token())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_body_relayed_to_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/event"))
        .and(wiremock::matchers::body_json(
            serde_json::json!({"name": "Encore Fest"}),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = gateway(&mock_server.uri());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/event")
        .header(header::AUTHORIZATION, bearer_token())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "Encore Fest"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_unroutable_path_is_not_found() {
    let mock_server = MockServer::start().await;
    let app = gateway(&mock_server.uri());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/unknown/1")
        .header(header::AUTHORIZATION, bearer_token())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unreachable_backend_maps_to_bad_gateway() {
    // Point every backend at a port nothing listens on.
    let app = gateway("http://127.0.0.1:9");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/user/1")
        .header(header::AUTHORIZATION, bearer_token())
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_bytes(response.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_health_endpoint_is_exempt_by_default() {
    let mock_server = MockServer::start().await;
    let app = gateway(&mock_server.uri());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint_is_exempt_by_default() {
    let mock_server = MockServer::start().await;
    let app = gateway(&mock_server.uri());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_preflight_succeeds_without_token_through_full_stack() {
    let mock_server = MockServer::start().await;
    let app = gateway(&mock_server.uri());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/event/7")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
