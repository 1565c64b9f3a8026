//! Metrics collection and Prometheus export.
//!
//! HTTP request metrics come from `service_core::middleware::metrics_middleware`;
//! the counters below track rental-specific activity.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("metrics handle already initialized"))?;
    Ok(())
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_rental_created(status: &str) {
    counter!("rentals_created_total", "status" => status.to_string()).increment(1);
}

pub fn record_rental_transition(to: &str) {
    counter!("rental_transitions_total", "to" => to.to_string()).increment(1);
}

pub fn record_payment_update(payment_status: &str) {
    counter!("rental_payment_updates_total", "payment_status" => payment_status.to_string())
        .increment(1);
}

pub fn record_journal_built(entries: usize) {
    histogram!("cash_journal_entries").record(entries as f64);
}

pub fn record_subscription_request(plan: &str) {
    counter!("subscription_requests_total", "plan" => plan.to_string()).increment(1);
}

pub fn record_access_denied(reason: &str) {
    counter!("subscription_access_denied_total", "reason" => reason.to_string()).increment(1);
}
