//! Push-based observability for revcast
//!
//! Metrics are kept in a Prometheus registry and pushed as periodic
//! structured JSON logs to stdout. There is no metrics HTTP endpoint.

pub mod latency_tracker;
pub mod metrics;
pub mod reporter;

pub use latency_tracker::InferenceTimer;
pub use metrics::Metrics;
pub use reporter::MetricsReporter;
