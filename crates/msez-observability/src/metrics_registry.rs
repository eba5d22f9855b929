//! # Metrics Registration
//!
//! Installs a process-wide Prometheus recorder and declares the
//! counters/histograms the stack emits through, via the `metrics`
//! facade crate (so call sites stay decoupled from the exporter).

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and register the stack's
/// known metrics with their descriptions. Returns a handle whose
/// `render()` produces the text-exposition-format scrape body.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, metrics_exporter_prometheus::BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_known_metrics();
    Ok(handle)
}

fn register_known_metrics() {
    metrics::describe_counter!(
        "msez_watcher_slash_total",
        "Total number of watcher bond slashing events, by condition."
    );
    metrics::describe_counter!(
        "msez_vm_instructions_total",
        "Total number of VM opcodes executed."
    );
    metrics::describe_histogram!(
        "msez_vm_gas_used",
        "Gas consumed per VM execution run."
    );
    metrics::describe_counter!(
        "msez_security_rate_limited_total",
        "Total number of requests rejected by the rate limiter."
    );
    metrics::describe_histogram!(
        "msez_span_duration_ms",
        "Span duration in milliseconds, by stack layer."
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_known_metrics_does_not_panic() {
        register_known_metrics();
    }
}
