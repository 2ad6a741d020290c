//! Metrics collection and exposition.
//!
//! # Metrics
//! - `verbroute_requests_total` (counter): dispatched requests by resource, status
//! - `verbroute_dispatch_duration_seconds` (histogram): dispatch latency by resource
//! - `verbroute_handler_failures_total` (counter): handler errors and panics by resource
//!
//! # Design Decisions
//! - Routing failures are labelled with resource `none` to bound cardinality
//! - The exporter is optional; without it every record call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_dispatch(resource: &str, status: u16, start: Instant) {
    let resource = resource.to_string();
    metrics::counter!(
        "verbroute_requests_total",
        "resource" => resource.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("verbroute_dispatch_duration_seconds", "resource" => resource)
        .record(start.elapsed().as_secs_f64());
}

/// Record a handler that returned an error or panicked.
pub fn record_handler_failure(resource: &str) {
    metrics::counter!("verbroute_handler_failures_total", "resource" => resource.to_string())
        .increment(1);
}
