//! Prometheus metrics for nearby discovery.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration failure
//! means duplicate metric names, which is a programming error that should
//! crash at first use rather than silently drop observations.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec,
    TextEncoder,
};

/// Total fetches issued.
/// Labels: resource (categories/places)
pub static FETCH_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nearby_fetch_requests_total",
        "Total remote fetches issued",
        &["resource"]
    )
    .unwrap()
});

/// Total failed fetches.
/// Labels: resource, kind (transport/status/parse/invalid_url)
pub static FETCH_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nearby_fetch_failures_total",
        "Total remote fetches that failed",
        &["resource", "kind"]
    )
    .unwrap()
});

/// Fetch round-trip latency in milliseconds.
pub static FETCH_LATENCY_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "nearby_fetch_latency_ms",
        "Remote fetch latency in milliseconds",
        &["resource"],
        vec![10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Responses dropped because a newer request for the same resource exists.
pub static STALE_RESPONSES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nearby_stale_responses_total",
        "Responses discarded because a newer request superseded them",
        &["resource"]
    )
    .unwrap()
});

/// Location request outcomes.
/// Labels: outcome (fix/permission_denied/unavailable)
pub static LOCATION_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nearby_location_requests_total",
        "Location requests by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// User-visible alerts raised.
pub static ALERTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nearby_alerts_total",
        "User-visible alerts raised",
        &["kind"]
    )
    .unwrap()
});

/// Metrics helper.
pub struct Metrics;

impl Metrics {
    /// Record a fetch being issued.
    pub fn fetch_issued(resource: &str) {
        FETCH_REQUESTS_TOTAL.with_label_values(&[resource]).inc();
    }

    /// Record a failed fetch.
    pub fn fetch_failed(resource: &str, kind: &str) {
        FETCH_FAILURES_TOTAL
            .with_label_values(&[resource, kind])
            .inc();
    }

    /// Record fetch latency.
    pub fn fetch_latency(resource: &str, latency_ms: f64) {
        FETCH_LATENCY_MS
            .with_label_values(&[resource])
            .observe(latency_ms);
    }

    /// Record a discarded stale response.
    pub fn stale_response(resource: &str) {
        STALE_RESPONSES_TOTAL.with_label_values(&[resource]).inc();
    }

    /// Record a location request outcome.
    pub fn location_outcome(outcome: &str) {
        LOCATION_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record an alert shown to the user.
    pub fn alert_raised(kind: &str) {
        ALERTS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
