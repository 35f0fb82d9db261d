// SPDX-License-Identifier: BUSL-1.1
//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) recorded in
//! middleware and exposed at `/metrics` in text exposition format.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("matchday_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "matchday_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )?;

        let http_errors_total = IntCounterVec::new(
            Opts::new("matchday_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_errors_total.clone()))?;

        Ok(Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
            }),
        })
    }

    /// Total request count across all labels.
    pub fn requests(&self) -> u64 {
        sum_counters(&self.inner.http_requests_total)
    }

    /// Total error count across all labels.
    pub fn errors(&self) -> u64 {
        sum_counters(&self.inner.http_errors_total)
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

fn sum_counters(counter: &IntCounterVec) -> u64 {
    counter
        .collect()
        .iter()
        .flat_map(|mf| mf.get_metric())
        .map(|m| m.get_counter().get_value() as u64)
        .sum()
}

/// Path label for requests that matched no route.
const UNMATCHED: &str = "unmatched";

/// Route template the request matched, e.g. `/matches/:id/commentary`.
///
/// Labels come from the router's own templates, never the raw URI, so the
/// number of series is fixed by the route table.
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED.to_owned())
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = route_label(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_metrics_new_starts_at_zero() {
        let m = ApiMetrics::new().unwrap();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn request_and_error_counts_independent() {
        let m = ApiMetrics::new().unwrap();
        for _ in 0..5 {
            m.record_request("GET", "/matches", 200, 0.01);
        }
        m.record_request("POST", "/matches/{id}/commentary", 500, 0.1);
        m.record_request("GET", "/matches/{id}/commentary", 400, 0.05);
        assert_eq!(m.requests(), 7);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn clone_shares_underlying_counters() {
        let m = ApiMetrics::new().unwrap();
        let clone = m.clone();

        m.record_request("GET", "/matches", 200, 0.01);
        assert_eq!(clone.requests(), 1, "clone should see the same counter");

        clone.record_request("GET", "/matches", 404, 0.01);
        assert_eq!(m.errors(), 1, "original should see clone's increment");
    }

    #[test]
    fn concurrent_increments_are_safe() {
        let m = ApiMetrics::new().unwrap();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let m = m.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        m.record_request("GET", "/matches", 200, 0.001);
                        m.record_request("GET", "/matches", 500, 0.001);
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(m.requests(), 8_000);
        assert_eq!(m.errors(), 4_000);
    }

    #[test]
    fn gather_and_encode_produces_text() {
        let m = ApiMetrics::new().unwrap();
        m.record_request("GET", "/matches", 200, 0.01);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("matchday_http_requests_total"));
        assert!(output.contains("matchday_http_request_duration_seconds"));
    }

    #[test]
    fn request_without_route_is_unmatched() {
        let request = axum::http::Request::new(axum::body::Body::empty());
        assert_eq!(route_label(&request), UNMATCHED);
    }

    #[tokio::test]
    async fn distinct_raw_ids_share_one_series() {
        use axum::routing::get;
        use axum::{Extension, Router};
        use tower::ServiceExt;

        let metrics = ApiMetrics::new().unwrap();
        let app = Router::new()
            .route("/matches/:id/commentary", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(metrics_middleware))
            .layer(Extension(metrics.clone()));

        for i in 0..50 {
            let request = axum::http::Request::builder()
                .uri(format!("/matches/x{i}/commentary"))
                .body(axum::body::Body::empty())
                .unwrap();
            app.clone().oneshot(request).await.unwrap();
        }

        assert_eq!(metrics.requests(), 50);
        let text = metrics.gather_and_encode().unwrap();
        let series: Vec<_> = text
            .lines()
            .filter(|line| line.starts_with("matchday_http_requests_total{"))
            .collect();
        assert_eq!(series.len(), 1, "{series:?}");
        assert!(series[0].contains(r#"path="/matches/:id/commentary""#));
    }
}
