//! Edge gateway configuration.
//!
//! Configuration is loaded from environment variables once at startup and
//! passed by ownership into the router; nothing reads it ambiently
//! afterward. The signing secret is held as a `SecretString` so it is
//! redacted in Debug output.

use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default token validity window for issuance: 10 days, in seconds.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 10 * 24 * 60 * 60;

/// Default token-exempt route patterns.
pub const DEFAULT_WHITELIST: &str = "/api/auth/**,/health,/metrics";

/// Default always-public route families, checked ahead of the whitelist.
pub const DEFAULT_PUBLIC_PREFIXES: &str = "/api/artist/public/,/api/event/public/";

/// Default CORS origin (the web frontend in local development).
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Edge gateway configuration.
///
/// Loaded from environment variables with sensible defaults. The only
/// required variable is `GATEWAY_JWT_SECRET`; the process refuses to start
/// without it.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Shared HMAC signing secret for access tokens.
    pub jwt_secret: SecretString,

    /// Token validity window for issuance, in seconds.
    pub token_ttl_seconds: u64,

    /// Raw whitelist patterns, normalized by the route whitelist at startup.
    pub whitelist: Vec<String>,

    /// Always-public route prefixes, bypassing the whitelist check.
    pub public_prefixes: Vec<String>,

    /// Allowed CORS origin for the browser frontend.
    pub allowed_origin: String,

    /// Base URL of the user service (also serves `/api/auth`).
    pub user_service_url: String,

    /// Base URL of the artist service.
    pub artist_service_url: String,

    /// Base URL of the event service.
    pub event_service_url: String,
}

/// Custom Debug implementation that redacts the signing secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("whitelist", &self.whitelist)
            .field("public_prefixes", &self.public_prefixes)
            .field("allowed_origin", &self.allowed_origin)
            .field("user_service_url", &self.user_service_url)
            .field("artist_service_url", &self.artist_service_url)
            .field("event_service_url", &self.event_service_url)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token TTL configuration: {0}")]
    InvalidTokenTtl(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jwt_secret = vars
            .get("GATEWAY_JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .map(|secret| SecretString::from(secret.clone()))
            .ok_or_else(|| ConfigError::MissingEnvVar("GATEWAY_JWT_SECRET".to_string()))?;

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse token TTL with validation
        let token_ttl_seconds = if let Some(value_str) = vars.get("GATEWAY_TOKEN_TTL_SECONDS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTokenTtl(format!(
                    "GATEWAY_TOKEN_TTL_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidTokenTtl(
                    "GATEWAY_TOKEN_TTL_SECONDS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_TOKEN_TTL_SECONDS
        };

        let whitelist = split_list(
            vars.get("GATEWAY_WHITELIST")
                .map_or(DEFAULT_WHITELIST, String::as_str),
        );

        let public_prefixes = split_list(
            vars.get("GATEWAY_PUBLIC_PREFIXES")
                .map_or(DEFAULT_PUBLIC_PREFIXES, String::as_str),
        );

        let allowed_origin = vars
            .get("GATEWAY_ALLOWED_ORIGIN")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        let user_service_url = vars
            .get("USER_SERVICE_URL")
            .cloned()
            .unwrap_or_else(|| "http://localhost:8081".to_string());

        let artist_service_url = vars
            .get("ARTIST_SERVICE_URL")
            .cloned()
            .unwrap_or_else(|| "http://localhost:8082".to_string());

        let event_service_url = vars
            .get("EVENT_SERVICE_URL")
            .cloned()
            .unwrap_or_else(|| "http://localhost:8083".to_string());

        Ok(Config {
            bind_address,
            jwt_secret,
            token_ttl_seconds,
            whitelist,
            public_prefixes,
            allowed_origin,
            user_service_url,
            artist_service_url,
            event_service_url,
        })
    }

    /// Resolve the upstream base URL serving `path`.
    ///
    /// `/api/auth` is served by the user service alongside `/api/user`.
    /// Returns `None` for paths no backend serves.
    #[must_use]
    pub fn upstream_for(&self, path: &str) -> Option<&str> {
        if path.starts_with("/api/user") || path.starts_with("/api/auth") {
            Some(&self.user_service_url)
        } else if path.starts_with("/api/artist") {
            Some(&self.artist_service_url)
        } else if path.starts_with("/api/event") {
            Some(&self.event_service_url)
        } else {
            None
        }
    }
}

/// Split a comma-separated configuration value into trimmed entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
