//! Outbound service clients for the edge gateway.

pub mod upstream;

pub use upstream::UpstreamClient;
