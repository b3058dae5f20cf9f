//! Access token claims.
//!
//! The `sub` field contains the principal (username or email) and is
//! redacted in Debug output so it cannot leak through logs.

use common::jwt::{roles_from_value, user_id_from_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Claims carried by an Encore access token.
///
/// `id` and `roles` are kept as raw JSON values rather than typed fields:
/// a token whose signature verifies must stay usable even when an
/// individual claim is missing or malformed, so coercion happens lazily
/// in the accessors and degrades to an absent/empty value.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username or email) - redacted in Debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Numeric user id as issued (claim name `id`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Role claim: a JSON array of strings or a comma-joined string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Value>,
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("id", &self.id)
            .field("roles", &self.roles)
            .finish()
    }
}

impl Claims {
    /// Normalized role list: trimmed, empties dropped, canonical uppercase.
    ///
    /// Empty when the claim is missing or has an unusable shape.
    #[must_use]
    pub fn role_list(&self) -> Vec<String> {
        self.roles.as_ref().map(roles_from_value).unwrap_or_default()
    }

    /// Numeric user id, if present and parsable.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.id.as_ref().and_then(user_id_from_value)
    }
}
