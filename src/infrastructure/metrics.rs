//! Call log metrics

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use tracing::info;

/// Start the Prometheus scrape endpoint on `listen` and describe call log metrics.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(listen: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(listen)
        .install()?;

    describe_counter!(
        "call_log_records_written_total",
        "Call log entries written to the store"
    );
    describe_counter!(
        "call_log_records_failed_total",
        "Call log entries the store failed to write"
    );
    describe_counter!(
        "call_log_records_dropped_total",
        "Call log entries dropped because the write queue was full"
    );
    describe_counter!(
        "call_log_records_suppressed_total",
        "Emergency calls kept out of the call log by policy"
    );

    info!("Prometheus metrics listening on {}", listen);
    Ok(())
}

pub fn record_call_written() {
    counter!("call_log_records_written_total").increment(1);
}

pub fn record_call_failed() {
    counter!("call_log_records_failed_total").increment(1);
}

pub fn record_calls_dropped(count: usize) {
    counter!("call_log_records_dropped_total").increment(count as u64);
}

pub fn record_call_suppressed() {
    counter!("call_log_records_suppressed_total").increment(1);
}
