//! Prometheus metrics for request and discovery tracking.
//!
//! Metrics are recorded through the `metrics` facade. Nothing is exported
//! unless [`install_exporter`] is called, in which case the scrape endpoint
//! lives on its own listener.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, info};

use crate::error::AppError;
use crate::network::IpSource;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// IP discovery latency metric name.
pub const METRIC_IP_DISCOVERY_LATENCY: &str = "ip_discovery_latency_ms";
/// IP discovery counter metric name.
pub const METRIC_IP_DISCOVERY: &str = "ip_discovery_total";

/// Initialize all metric descriptions.
/// Descriptions go to the installed recorder, so call this after installing it.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_IP_DISCOVERY_LATENCY,
        "Local IP discovery latency in milliseconds"
    );

    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_counter!(
        METRIC_IP_DISCOVERY,
        "Total number of local IP discoveries by outcome"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and serve it on `addr`.
pub fn install_exporter(addr: SocketAddr) -> Result<(), AppError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| AppError::Metrics(e.to_string()))?;
    init_metrics();

    info!("Prometheus exporter listening on {}", addr);
    Ok(())
}

/// Record a served HTTP request.
pub fn record_http_request(start: Instant, method: &str, path: &str, status: u16) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    histogram!(METRIC_HTTP_REQUEST_LATENCY, &labels).record(latency_ms);
    counter!(METRIC_HTTP_REQUESTS, &labels).increment(1);
}

/// Increment the IP discovery counter for `source`.
pub fn inc_ip_discovery(source: IpSource) {
    counter!(METRIC_IP_DISCOVERY, "outcome" => source.to_string()).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for IP discovery.
pub fn timer_ip_discovery() -> LatencyTimer {
    LatencyTimer::new(METRIC_IP_DISCOVERY_LATENCY)
}
