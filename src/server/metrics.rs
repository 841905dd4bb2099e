//! Prometheus metrics for HTTP request instrumentation
//!
//! All families live in one `Registry` owned by [`HttpMetrics`]; the handle is
//! shared through router state rather than through the global default
//! registry, so every test gets an isolated set of counters. On Linux the
//! registry also carries the standard `process_*` collector.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Prometheus registry error: {0}")]
    Registry(#[from] prometheus::Error),

    #[error("Metrics output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Shared handle passed to the dispatch wrapper and the `/metrics` handler
pub type SharedMetrics = Arc<HttpMetrics>;

/// Request counters, latency histogram, and build info gauge
pub struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
    app_info: IntGaugeVec,
}

impl HttpMetrics {
    /// Register all metric families and set `app_info` to 1 for this build
    pub fn new(version: &str, rust_version: &str) -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;
        // HistogramOpts defaults to prometheus::DEFAULT_BUCKETS
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            ),
            &["method", "path"],
        )?;
        let app_info = IntGaugeVec::new(
            Opts::new("app_info", "Application build information"),
            &["version", "rust_version"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        app_info.with_label_values(&[version, rust_version]).set(1);

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            app_info,
        })
    }

    /// Record one completed request: one counter increment, one observation
    pub fn record_request(&self, method: &str, path: &str, status: u16, duration: Duration) {
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[method, path, &status])
            .inc();
        self.request_duration
            .with_label_values(&[method, path])
            .observe(duration.as_secs_f64());
    }

    /// Counter value for one label set
    #[cfg(test)]
    pub(crate) fn request_count(&self, method: &str, path: &str, status: u16) -> u64 {
        self.requests_total
            .with_label_values(&[method, path, &status.to_string()])
            .get()
    }

    /// Counter total across every label set
    #[cfg(test)]
    pub(crate) fn total_requests(&self) -> u64 {
        use prometheus::core::Collector;

        self.requests_total
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .map(|m| m.get_counter().get_value() as u64)
            .sum()
    }

    /// Number of duration observations for one method/path pair
    #[cfg(test)]
    pub(crate) fn duration_samples(&self, method: &str, path: &str) -> u64 {
        self.request_duration
            .with_label_values(&[method, path])
            .get_sample_count()
    }

    /// Current `app_info` value for the given build labels
    #[cfg(test)]
    pub(crate) fn app_info(&self, version: &str, rust_version: &str) -> i64 {
        self.app_info
            .with_label_values(&[version, rust_version])
            .get()
    }

    /// Content type of [`HttpMetrics::encode`] output
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Render every registered family in the text exposition format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Create the process-wide metrics handle for this build
pub fn create_metrics() -> Result<SharedMetrics, MetricsError> {
    let metrics = HttpMetrics::new(crate::VERSION, super::runtime::rust_version())?;
    Ok(Arc::new(metrics))
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_tests;
