// SPDX-License-Identifier: BUSL-1.1
//! # matchday-api: Axum API for Live Match Tracking
//!
//! HTTP surface over the validation layer in `matchday-core` and a
//! pluggable [`db::Datastore`].
//!
//! ## API Surface
//!
//! | Route                          | Module                  |
//! |--------------------------------|-------------------------|
//! | `GET/POST /matches`            | [`routes::matches`]     |
//! | `PATCH /matches/:id/score`     | [`routes::matches`]     |
//! | `GET/POST /matches/:id/commentary` | [`routes::commentary`] |
//! | `GET /health/liveness`, `/health/readiness` | this module |
//! | `GET /metrics`                 | this module             |
//! | `GET /openapi.json`            | [`openapi`]             |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → DefaultBodyLimit → Handler
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod records;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Request body cap.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = if state.config.metrics_enabled {
        match ApiMetrics::new() {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::error!(error = %e, "failed to build metrics registry, metrics disabled");
                None
            }
        }
    } else {
        None
    };

    let mut api = Router::new()
        .merge(routes::matches::router())
        .merge(routes::commentary::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    if let Some(m) = &metrics {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(m.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let mut probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if let Some(m) = metrics {
        probes = probes
            .route("/metrics", get(prometheus_metrics))
            .layer(Extension(m));
    }

    Router::new().merge(probes.with_state(state)).merge(api)
}

/// GET /metrics: Prometheus scrape endpoint.
async fn prometheus_metrics(Extension(metrics): Extension<ApiMetrics>) -> impl IntoResponse {
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe - always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe - 200 "ready" once the datastore answers a ping,
/// 503 otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!(backend = state.store.backend(), error = %e, "datastore health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "datastore unreachable").into_response()
        }
    }
}
