//! Authentication middleware: the gateway's single choke point.
//!
//! Every inbound request passes through [`authenticate`] before any
//! forwarding happens. Pre-flight probes, public route families, and
//! whitelisted paths are forwarded untouched; everything else must carry
//! a Bearer token that verifies against the shared secret. Verified
//! requests are forwarded with the trusted identity headers overwritten,
//! and every failure branch terminates through [`reject`] with a bare
//! status code. Downstream services read the identity headers instead of
//! re-verifying the token, so nothing reaches them except through here.

use crate::auth::{TokenCodec, Whitelist};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::instrument;

/// Trusted identity header: the principal (token subject).
pub const HEADER_AUTH_USER: &str = "x-auth-user";

/// Trusted identity header: comma-joined role list.
pub const HEADER_AUTH_ROLES: &str = "x-auth-roles";

/// Trusted identity header: decimal user id, empty when the token has none.
pub const HEADER_USER_ID: &str = "x-user-id";

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Token codec bound to the shared signing secret.
    pub codec: Arc<TokenCodec>,

    /// Normalized whitelist of token-exempt route prefixes.
    pub whitelist: Whitelist,

    /// Route families that are always public, checked ahead of the whitelist.
    pub public_prefixes: Vec<String>,
}

/// Build the terminal rejection response: status code, empty body.
///
/// Every failure branch in [`authenticate`] reaches this exactly once.
/// The body stays empty so a rejected probe learns nothing beyond the
/// status code itself.
fn reject(status: StatusCode) -> Response {
    status.into_response()
}

/// Authentication middleware applied to the whole router.
///
/// Decision order, first match wins:
///
/// 1. `OPTIONS` pre-flight → `200 OK`, no body, independent of configuration
/// 2. Always-public route family → forward unauthenticated
/// 3. Whitelisted path → forward unauthenticated
/// 4. Missing/malformed `Authorization: Bearer <token>` → `401`
/// 5. Token fails verification → `401`
/// 6. Claims extracted (each defaulting individually), identity headers
///    overwritten, request forwarded exactly once
#[instrument(skip_all, name = "gw.middleware.auth")]
pub async fn authenticate(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // CORS pre-flight probes are answered here, before any auth state is
    // touched. This is not a whitelist decision.
    if req.method() == Method::OPTIONS {
        tracing::debug!(target: "gw.middleware.auth", %path, "Pre-flight request allowed");
        return StatusCode::OK.into_response();
    }

    if state
        .public_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        tracing::debug!(target: "gw.middleware.auth", %path, "Public route family allowed");
        return next.run(req).await;
    }

    if state.whitelist.is_exempt(&path) {
        tracing::debug!(target: "gw.middleware.auth", %path, "Whitelisted route allowed");
        return next.run(req).await;
    }

    // From here on the request must present credentials.
    let Some(token) = bearer_token(&req) else {
        tracing::warn!(
            target: "gw.middleware.auth",
            %path,
            "Missing or malformed Authorization header"
        );
        return reject(StatusCode::UNAUTHORIZED);
    };

    // Any verification failure, including an internal fault inside the
    // codec, surfaces as `false` here: fail closed, never a 500.
    if !state.codec.verify(&token) {
        tracing::warn!(target: "gw.middleware.auth", %path, "Token rejected");
        return reject(StatusCode::UNAUTHORIZED);
    }

    // Claim extraction is individually lenient: a verified token that
    // lacks a claim still forwards, with that header set to its empty
    // default.
    let subject = state.codec.subject(&token).unwrap_or_default();
    let roles = state.codec.roles(&token).join(",");
    let user_id = state
        .codec
        .user_id(&token)
        .map(|id| id.to_string())
        .unwrap_or_default();

    set_identity_header(&mut req, HEADER_AUTH_USER, &subject);
    set_identity_header(&mut req, HEADER_AUTH_ROLES, &roles);
    set_identity_header(&mut req, HEADER_USER_ID, &user_id);

    next.run(req).await
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme comparison is case-insensitive. Returns `None` when the
/// header is absent, unreadable, or not in Bearer form.
fn bearer_token(req: &Request) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();

    let scheme = trimmed.get(..7)?;
    let rest = trimmed.get(7..)?;
    if !scheme.eq_ignore_ascii_case("bearer ") {
        return None;
    }

    Some(rest.trim().to_string())
}

/// Overwrite one identity header on the outbound request.
///
/// `insert` replaces every previously present value, so client-supplied
/// headers with these names can never reach a backend. A claim value that
/// is not a legal header value degrades to the empty default.
fn set_identity_header(req: &mut Request, name: &'static str, value: &str) {
    let value =
        HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""));
    req.headers_mut().insert(name, value);
}
