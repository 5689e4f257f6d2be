//! Prometheus metrics for studio observability.

use std::net::SocketAddr;

use metrics::counter;

/// Initialize the Prometheus exporter on its own listener.
pub fn init_metrics(port: u16) {
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(SocketAddr::from(([0, 0, 0, 0], port)));
    if let Err(e) = builder.install() {
        tracing::warn!("Failed to install Prometheus exporter: {}", e);
    }
}

/// Record a payment webhook delivery by outcome.
pub fn webhook_received(outcome: &str) {
    counter!("studio_payment_webhooks_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a newly created order.
pub fn order_created() {
    counter!("studio_orders_total").increment(1);
}

/// Record a deliverable download redirect.
pub fn deliverable_downloaded() {
    counter!("studio_downloads_total").increment(1);
}

/// Record a pipeline card entering a stage.
pub fn card_moved(stage: &str) {
    counter!("studio_pipeline_moves_total", "stage" => stage.to_string()).increment(1);
}

/// Record a login attempt by outcome.
pub fn login_attempt(outcome: &str) {
    counter!("studio_logins_total", "outcome" => outcome.to_string()).increment(1);
}
