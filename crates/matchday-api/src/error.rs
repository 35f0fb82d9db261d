// SPDX-License-Identifier: BUSL-1.1
//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//!
//! | Variant           | Status | Body                                  |
//! |-------------------|--------|---------------------------------------|
//! | `InvalidInput`    | 400    | `{error, details: [violation, ...]}`  |
//! | `NotFound`        | 404    | `{error}`                             |
//! | `PayloadTooLarge` | 413    | `{error}`                             |
//! | `Internal`        | 500    | `{error}` with a fixed public message |
//!
//! Datastore failures are logged server side with their kind and message.
//! The client only ever sees the fixed public message for the operation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use matchday_core::{Violation, Violations};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::db::StoreError;

/// Client-facing error strings.
pub mod messages {
    pub const INVALID_MATCH_ID: &str = "Invalid match id";
    pub const INVALID_QUERY: &str = "Invalid query";
    pub const INVALID_COMMENTARY: &str = "Invalid commentary data";
    pub const INVALID_PAYLOAD: &str = "Invalid payload";
    pub const MATCH_NOT_FOUND: &str = "Match not found";
    pub const PAYLOAD_TOO_LARGE: &str = "Payload too large";

    pub const FAILED_FETCH_COMMENTARY: &str = "Failed to fetch commentary";
    pub const FAILED_CREATE_COMMENTARY: &str = "Failed to create commentary";
    pub const FAILED_LIST_MATCHES: &str = "Failed to list matches";
    pub const FAILED_CREATE_MATCH: &str = "Failed to create match";
    pub const FAILED_UPDATE_SCORE: &str = "Failed to update score";
}

/// JSON error response body.
///
/// `details` is present only for input errors and lists every violation in
/// the order the validator found them.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable summary, e.g. `"Invalid match id"`.
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<Object>>)]
    pub details: Option<Vec<Violation>>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Path, query, or body failed validation (400).
    #[error("{error}: {details}")]
    InvalidInput {
        error: &'static str,
        details: Violations,
    },

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(&'static str),

    /// Body exceeded the request size cap (413).
    #[error("payload too large")]
    PayloadTooLarge,

    /// Datastore call failed (500). `public` is returned; `source` is logged.
    #[error("{public}: {source}")]
    Internal {
        public: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn invalid_match_id(details: Violations) -> Self {
        Self::InvalidInput {
            error: messages::INVALID_MATCH_ID,
            details,
        }
    }

    pub fn invalid_query(details: Violations) -> Self {
        Self::InvalidInput {
            error: messages::INVALID_QUERY,
            details,
        }
    }

    pub fn invalid_commentary(details: Violations) -> Self {
        Self::InvalidInput {
            error: messages::INVALID_COMMENTARY,
            details,
        }
    }

    pub fn invalid_payload(details: Violations) -> Self {
        Self::InvalidInput {
            error: messages::INVALID_PAYLOAD,
            details,
        }
    }

    /// Wrap a datastore failure behind a fixed public message.
    pub fn internal(public: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Internal { public, source }
    }

    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match self {
            Self::InvalidInput { error, details } => {
                tracing::debug!(code, error, violations = details.len(), "rejected request");
                ErrorBody {
                    error: error.to_string(),
                    details: Some(details.into_vec()),
                }
            }
            Self::NotFound(error) => ErrorBody {
                error: error.to_string(),
                details: None,
            },
            Self::PayloadTooLarge => ErrorBody {
                error: messages::PAYLOAD_TOO_LARGE.to_string(),
                details: None,
            },
            Self::Internal { public, source } => {
                tracing::error!(code, kind = source.kind(), error = %source, "{public}");
                ErrorBody {
                    error: public.to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
