//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by method and outcome
//! - `dispatch_duration_seconds` (histogram): time spent in dispatch
//! - `routes_registered` (gauge): size of the route table
//! - `http_responses_total` (counter): responses by status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatch. `outcome` is the terminal dispatch state.
pub fn record_dispatch(method: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "dispatch_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("dispatch_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_routes_registered(count: usize) {
    metrics::gauge!("routes_registered").set(count as f64);
}

pub fn record_response(status: u16) {
    metrics::counter!("http_responses_total", "status" => status.to_string()).increment(1);
}
