//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports from the [`secrecy`] crate. Use these for every sensitive
//! value the platform handles: the gateway signing secret, bearer tokens,
//! upstream credentials.
//!
//! `SecretString` implements `Debug` with redaction, so a struct that
//! derives `Debug` and holds one cannot leak it through `{:?}` or a
//! tracing field. The inner value is only reachable through an explicit
//! `expose_secret()` call, and is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct GatewayConfig {
//!     bind_address: String,
//!     jwt_secret: SecretString,  // Debug shows "[REDACTED]"
//! }
//!
//! let config = GatewayConfig {
//!     bind_address: "0.0.0.0:8080".to_string(),
//!     jwt_secret: SecretString::from("hmac-signing-secret"),
//! };
//!
//! // Safe: the secret is redacted
//! println!("{:?}", config);
//!
//! // Reading the value requires an explicit expose
//! let secret: &str = config.jwt_secret.expose_secret();
//! # assert_eq!(secret, "hmac-signing-secret");
//! ```

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("hmac-signing-secret");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hmac-signing-secret"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("hmac-signing-secret");
        assert_eq!(secret.expose_secret(), "hmac-signing-secret");
    }

    #[test]
    fn test_deserialize() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct Credentials {
            service: String,
            secret: SecretString,
        }

        let json = r#"{"service": "gateway", "secret": "my-secret-value"}"#;
        let creds: Credentials = serde_json::from_str(json).expect("deserialize");

        assert_eq!(creds.secret.expose_secret(), "my-secret-value");

        let debug = format!("{creds:?}");
        assert!(!debug.contains("my-secret-value"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_clone_works() {
        let secret = SecretString::from("cloneable");
        let cloned = secret.clone();
        assert_eq!(cloned.expose_secret(), "cloneable");
    }
}
