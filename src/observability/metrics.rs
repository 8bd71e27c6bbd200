//! Metrics collection and exposition.
//!
//! # Metrics
//! - `withdrawals_total` (counter): withdrawal attempts by outcome
//! - `withdrawal_duration_seconds` (histogram): end-to-end attempt latency
//! - `fee_estimate_fallback_total` (counter): fee defaults used, by kind
//! - `broadcasts_total` (counter): raw transactions submitted
//! - `chain_rpc_healthy` (gauge): 1=healthy, 0=unhealthy
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are static strings from the outcome taxonomy

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus exporter with an HTTP scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the terminal outcome of one withdrawal attempt.
pub fn record_withdrawal(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("withdrawals_total", "outcome" => outcome).increment(1);
    metrics::histogram!("withdrawal_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record that a fee parameter fell back to its configured default.
pub fn record_fee_fallback(kind: &'static str) {
    metrics::counter!("fee_estimate_fallback_total", "kind" => kind).increment(1);
}

/// Record a broadcast attempt.
pub fn record_broadcast() {
    metrics::counter!("broadcasts_total").increment(1);
}

/// Record RPC reachability.
pub fn record_rpc_health(healthy: bool) {
    metrics::gauge!("chain_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}
