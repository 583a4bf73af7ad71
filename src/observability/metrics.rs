//! Metrics collection and exposition.
//!
//! # Metrics
//! - `service_readiness_state` (gauge): 0=starting, 1=listening, 2=ready, 3=degraded
//! - `service_dependency_probes_total` (counter): probe attempts by outcome
//! - `service_dependency_probe_duration_seconds` (histogram): probe latency
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::ReadinessState;

/// Serve Prometheus metrics on `addr`. Requires a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_readiness(state: ReadinessState) {
    metrics::gauge!("service_readiness_state").set(state.as_gauge());
}

pub fn record_probe(success: bool, elapsed: Duration) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("service_dependency_probes_total", "outcome" => outcome).increment(1);
    metrics::histogram!("service_dependency_probe_duration_seconds").record(elapsed.as_secs_f64());
}
