//! Prometheus metrics and structured logging for nearby discovery.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters and histograms for fetches, location requests,
//!   discarded stale responses and user-visible alerts

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
