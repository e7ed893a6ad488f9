//! Metrics collection and exposition.
//!
//! # Metrics
//! - `adapter_requests_total` (counter): events handled, by outcome
//! - `adapter_route_missing_total` (counter): events without a routing parameter
//! - `adapter_request_duration_seconds` (histogram): time spent in the adapter,
//!   including the delegated handler

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::adapter::Outcome;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one adapter invocation.
pub fn record_outcome(outcome: Outcome, start: Instant) {
    let label = outcome.as_str();
    ::metrics::counter!("adapter_requests_total", "outcome" => label).increment(1);
    if outcome == Outcome::RouteMissing {
        ::metrics::counter!("adapter_route_missing_total").increment(1);
    }
    ::metrics::histogram!("adapter_request_duration_seconds", "outcome" => label)
        .record(start.elapsed().as_secs_f64());
}
