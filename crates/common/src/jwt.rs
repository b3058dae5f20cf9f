//! JWT utilities shared across Encore services.
//!
//! The gateway verifies access tokens and the user service issues them;
//! both sides handle claims through the helpers here so the two never
//! drift on bearer-prefix handling or claim coercion rules.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Claim coercion is lenient: a malformed individual claim degrades to
//!   an absent value instead of failing a token whose signature verified

use serde_json::Value;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected before any base64 decoding or
/// signature verification happens. Typical tokens issued by the platform
/// are 300-600 bytes; 8KB leaves generous headroom while bounding the
/// work an attacker can force with an oversized Authorization header.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Strip an optional `"Bearer "` scheme prefix from a token string.
///
/// The scheme comparison is case-insensitive (`Bearer`, `bearer`, `BEARER`
/// all match) and surrounding whitespace is trimmed, so the result is the
/// raw compact JWT regardless of whether the caller passed a full
/// `Authorization` header value or an already-stripped token.
#[must_use]
pub fn strip_bearer(token: &str) -> &str {
    let trimmed = token.trim();
    match (trimmed.get(..7), trimmed.get(7..)) {
        (Some(scheme), Some(rest)) if scheme.eq_ignore_ascii_case("bearer ") => rest.trim(),
        _ => trimmed,
    }
}

/// Coerce a raw `roles` claim value into a normalized role list.
///
/// Tokens in the wild carry the claim in two shapes: a JSON array of
/// strings, or a single comma-joined string (`"ROLE_USER,ROLE_ADMIN"`).
/// Both are accepted. Elements are trimmed, empty elements are dropped,
/// and every role is normalized to UPPERCASE; role comparison across the
/// platform is done against the canonical `ROLE_*` uppercase form.
#[must_use]
pub fn roles_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_uppercase)
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_uppercase)
            .collect(),
        _ => {
            tracing::debug!(target: "common.jwt", "roles claim has unsupported type");
            Vec::new()
        }
    }
}

/// Coerce a raw `id` claim value into a numeric user id.
///
/// Accepts a JSON number or a decimal string. Anything else (missing,
/// fractional, non-numeric text) yields `None`: an unreadable id claim
/// is an absent id, never an error.
#[must_use]
pub fn user_id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
