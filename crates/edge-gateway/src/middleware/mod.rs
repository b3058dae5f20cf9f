//! Middleware for the edge gateway.
//!
//! # Components
//!
//! - `auth` - Authentication middleware, the single choke point for all routes
//! - `http_metrics` - Outermost metrics-recording middleware

pub mod auth;
pub mod http_metrics;

pub use auth::{
    authenticate, AuthState, HEADER_AUTH_ROLES, HEADER_AUTH_USER, HEADER_USER_ID,
};
pub use http_metrics::http_metrics_middleware;
