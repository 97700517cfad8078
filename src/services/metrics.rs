//! Prometheus metrics for genai-proxy-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static PROXY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static UPSTREAM_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static UPSTREAM_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Must be called once at startup.
pub fn init_metrics() {
    let registry = Registry::new();

    let proxy_requests = IntCounterVec::new(
        Opts::new("proxy_requests_total", "Total proxy requests by outcome"),
        &["outcome"],
    )
    .expect("Failed to create proxy_requests_total metric");

    let upstream_latency = HistogramVec::new(
        HistogramOpts::new("upstream_latency_seconds", "Gemini API latency in seconds")
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
    )
    .expect("Failed to create upstream_latency_seconds metric");

    let upstream_errors = IntCounterVec::new(
        Opts::new("upstream_errors_total", "Total upstream call failures"),
        &["error_type"],
    )
    .expect("Failed to create upstream_errors_total metric");

    registry
        .register(Box::new(proxy_requests.clone()))
        .expect("Failed to register proxy_requests_total");
    registry
        .register(Box::new(upstream_latency.clone()))
        .expect("Failed to register upstream_latency_seconds");
    registry
        .register(Box::new(upstream_errors.clone()))
        .expect("Failed to register upstream_errors_total");

    let _ = REGISTRY.set(registry);
    let _ = PROXY_REQUESTS_TOTAL.set(proxy_requests);
    let _ = UPSTREAM_LATENCY_SECONDS.set(upstream_latency);
    let _ = UPSTREAM_ERRORS_TOTAL.set(upstream_errors);

    tracing::info!("Prometheus metrics initialized");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

// Helper functions for recording metrics

/// Record a completed proxy request.
pub fn record_proxy_request(outcome: &str) {
    if let Some(counter) = PROXY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

/// Record upstream call latency.
pub fn record_upstream_latency(model: &str, duration_secs: f64) {
    if let Some(histogram) = UPSTREAM_LATENCY_SECONDS.get() {
        histogram.with_label_values(&[model]).observe(duration_secs);
    }
}

/// Record an upstream call failure.
pub fn record_upstream_error(error_type: &str) {
    if let Some(counter) = UPSTREAM_ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type]).inc();
    }
}
