//! Observability module for the edge gateway.
//!
//! Provides metric definitions and the Prometheus recorder setup.

pub mod metrics;
