//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, path, and status
//! - HTTP request latency histograms
//! - Sessions currently live
//! - Participation events by kind
//! - Balance scores as they are reported
//! - Countdown expiries

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

const NAMESPACE: &str = "speakspace";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Sessions in the active state
pub static SESSIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("sessions_active", "Number of sessions currently live").namespace(NAMESPACE),
    )
    .expect("Failed to create SESSIONS_ACTIVE metric")
});

/// Participation events applied, by kind
pub static PARTICIPATION_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "participation_events_total",
            "Participation events applied to live sessions",
        )
        .namespace(NAMESPACE),
        &["kind"],
    )
    .expect("Failed to create PARTICIPATION_EVENTS_TOTAL metric")
});

/// Distribution of reported balance scores
pub static BALANCE_SCORE: Lazy<Histogram> = Lazy::new(|| {
    let buckets = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
    Histogram::with_opts(
        HistogramOpts::new("balance_score", "Participation balance scores reported")
            .namespace(NAMESPACE)
            .buckets(buckets),
    )
    .expect("Failed to create BALANCE_SCORE metric")
});

/// Countdowns that ran out
pub static TIMER_EXPIRIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("timer_expiries_total", "Session countdowns that expired").namespace(NAMESPACE),
    )
    .expect("Failed to create TIMER_EXPIRIES_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(SESSIONS_ACTIVE.clone()))
        .expect("Failed to register SESSIONS_ACTIVE");
    registry
        .register(Box::new(PARTICIPATION_EVENTS_TOTAL.clone()))
        .expect("Failed to register PARTICIPATION_EVENTS_TOTAL");
    registry
        .register(Box::new(BALANCE_SCORE.clone()))
        .expect("Failed to register BALANCE_SCORE");
    registry
        .register(Box::new(TIMER_EXPIRIES_TOTAL.clone()))
        .expect("Failed to register TIMER_EXPIRIES_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

pub fn record_participation_event(kind: &str) {
    PARTICIPATION_EVENTS_TOTAL.with_label_values(&[kind]).inc();
}

pub fn record_balance_score(score: f64) {
    BALANCE_SCORE.observe(score);
}

pub fn record_timer_expiry() {
    TIMER_EXPIRIES_TOTAL.inc();
}

pub fn session_started() {
    SESSIONS_ACTIVE.inc();
}

pub fn session_completed() {
    SESSIONS_ACTIVE.dec();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Force lazy initialization
        let _ = &*REGISTRY;
        let _ = &*SESSIONS_ACTIVE;
        let _ = &*BALANCE_SCORE;
    }

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/health", 200, 0.001);
        let metrics = gather_metrics();
        assert!(metrics.contains("speakspace_http_requests_total"));
    }

    #[test]
    fn test_participation_metrics_exported() {
        record_participation_event("spoke");
        record_balance_score(72.5);
        let metrics = gather_metrics();
        assert!(metrics.contains("speakspace_participation_events_total{kind=\"spoke\"}"));
        assert!(metrics.contains("speakspace_balance_score_count"));
    }
}
