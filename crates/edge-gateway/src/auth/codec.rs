//! Access token codec.
//!
//! Signs and verifies HMAC-SHA512 tokens against the platform's shared
//! secret. Every read accessor re-runs full verification rather than
//! trusting an earlier `verify` call: the codec holds no mutable state,
//! so there is no window between checking a token and reading its claims
//! in which the two could disagree.

use crate::auth::Claims;
use chrono::Utc;
use common::jwt::{strip_bearer, MAX_JWT_SIZE_BYTES};
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while decoding or issuing a token.
///
/// Messages are intentionally generic; detail is logged server-side at
/// debug level and callers branch on the variant, never the text.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Token exceeds the pre-parse size ceiling.
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Structure, signature, or expiry check failed.
    #[error("The access token is invalid or expired")]
    Verification(#[source] jsonwebtoken::errors::Error),

    /// Token could not be signed at issuance.
    #[error("Token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Token codec bound to the shared signing secret.
///
/// Built once at startup and shared read-only across requests.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from the shared secret and issuance validity window.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation,
            ttl,
        }
    }

    /// Decode and fully verify a token.
    ///
    /// Called by every accessor, so no caller can read claims from a token
    /// that does not verify right now. The size ceiling is enforced before
    /// any decoding work happens.
    fn decode(&self, token: &str) -> Result<Claims, CodecError> {
        let token = strip_bearer(token);

        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "gw.auth.codec",
                token_size = token.len(),
                max_size = MAX_JWT_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(CodecError::TokenTooLarge);
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(target: "gw.auth.codec", error = %e, "Token verification failed");
                CodecError::Verification(e)
            })
    }

    /// True iff the token is well-formed, correctly signed, and unexpired.
    ///
    /// Never panics or propagates an error: verification failure is data.
    #[must_use]
    pub fn verify(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }

    /// The principal, only if the token independently re-verifies.
    #[must_use]
    pub fn subject(&self, token: &str) -> Option<String> {
        self.decode(token).ok().and_then(|claims| claims.sub)
    }

    /// Normalized role list; empty on a missing claim or any failure.
    #[must_use]
    pub fn roles(&self, token: &str) -> Vec<String> {
        self.decode(token)
            .map(|claims| claims.role_list())
            .unwrap_or_default()
    }

    /// Numeric user id; absent if missing, unparsable, or unverifiable.
    #[must_use]
    pub fn user_id(&self, token: &str) -> Option<i64> {
        self.decode(token).ok().and_then(|claims| claims.user_id())
    }

    /// Issue a signed token embedding subject, user id, and a single role.
    ///
    /// The validity window is the configured TTL. The returned string
    /// carries the `"Bearer "` prefix, ready for an Authorization header.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Signing`] if the claims cannot be encoded.
    pub fn issue(&self, subject: &str, user_id: i64, role: &str) -> Result<String, CodecError> {
        // TTL is validated positive at config load and is far below i64 range.
        let expires_at = Utc::now().timestamp() + self.ttl.as_secs() as i64;

        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: expires_at,
            id: Some(Value::from(user_id)),
            roles: Some(Value::from(role)),
        };

        let token = encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(CodecError::Signing)?;

        Ok(format!("Bearer {token}"))
    }
}
