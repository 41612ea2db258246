//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redeemer_cycles_total` (counter): finished cycles by outcome
//! - `redeemer_errors_total` (counter): failed cycles by error kind
//! - `redeemer_redemptions_total` (counter): confirmed redemptions
//! - `redeemer_log_entries_total` (counter): activity log entries by kind
//! - `redeemer_running` (gauge): 1 while a session is active
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_cycle(outcome: &'static str) {
    ::metrics::counter!("redeemer_cycles_total", "outcome" => outcome).increment(1);
}

pub fn record_error(kind: &'static str) {
    ::metrics::counter!("redeemer_errors_total", "kind" => kind).increment(1);
}

pub fn record_redemption() {
    ::metrics::counter!("redeemer_redemptions_total").increment(1);
}

pub fn record_log_entry(kind: &'static str) {
    ::metrics::counter!("redeemer_log_entries_total", "kind" => kind).increment(1);
}

pub fn set_running(running: bool) {
    ::metrics::gauge!("redeemer_running").set(if running { 1.0 } else { 0.0 });
}
