// SPDX-License-Identifier: BUSL-1.1
//! # Middleware Stack
//!
//! - [`metrics`]: Prometheus request metrics.
//!
//! Request tracing uses `tower_http::trace::TraceLayer` directly; see
//! [`crate::app`].

pub mod metrics;
