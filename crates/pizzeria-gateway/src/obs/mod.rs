//! Lightweight in-process metrics.
//!
//! Atomics keyed by label set, rendered by the `/metrics` handler in
//! Prometheus text format.

pub mod metrics;

pub use metrics::GatewayMetrics;
