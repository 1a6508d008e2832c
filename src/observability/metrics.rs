//! Metrics collection and exposition.
//!
//! # Metrics
//! - `node_pulse_probe_total` (counter): probes by node type and outcome
//! - `node_pulse_probe_latency_seconds` (histogram): latency of healthy probes
//! - `node_pulse_active_nodes` (gauge): size of the published node list
//! - `node_pulse_fallback_active` (gauge): 1 while a fallback pool is in use
//! - `node_pulse_fallback_transitions_total` (counter): boundary crossings
//! - `node_pulse_cycles_skipped_total` (counter): ticks dropped by the scheduler
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::health::probe::{HealthResult, HealthStatus};
use crate::health::state::ActiveNodeState;
use crate::nodes::types::ServiceType;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(node_type: ServiceType, result: &HealthResult) {
    let healthy = if result.is_healthy() { "true" } else { "false" };
    counter!("node_pulse_probe_total", "node_type" => node_type.as_str(), "healthy" => healthy).increment(1);
    if let HealthStatus::Healthy { latency } = result.status {
        histogram!("node_pulse_probe_latency_seconds", "node_type" => node_type.as_str())
            .record(latency.as_secs_f64());
    }
}

pub fn record_state(primary: ServiceType, state: &ActiveNodeState) {
    gauge!("node_pulse_active_nodes", "node_type" => primary.as_str()).set(state.nodes.len() as f64);
    gauge!("node_pulse_fallback_active", "node_type" => primary.as_str())
        .set(if state.is_fallback() { 1.0 } else { 0.0 });
}

pub fn record_fallback_transition(active: ServiceType, engaged: bool) {
    let direction = if engaged { "engaged" } else { "recovered" };
    counter!("node_pulse_fallback_transitions_total", "active" => active.as_str(), "direction" => direction)
        .increment(1);
}

pub fn record_cycle_skipped(reason: &'static str) {
    counter!("node_pulse_cycles_skipped_total", "reason" => reason).increment(1);
}
