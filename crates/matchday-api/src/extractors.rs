// SPDX-License-Identifier: BUSL-1.1
//! # Request Extraction
//!
//! Handlers take their path and body as `Result<_, Rejection>` so that axum
//! never answers with its own plain-text rejection. [`match_id`] turns a
//! rejected `:id` segment into the same violation a non-numeric id gets,
//! and [`json_body`] turns a rejected body into the root violation the
//! schemas produce for a non-object value, reported under the route's own
//! error message. The one exception is a body over the size cap, which is
//! answered with 413.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use matchday_core::{parse_match_id, IssueCode, MatchId, Violation, Violations};
use serde_json::Value;

use crate::error::AppError;

/// Validate the `:id` path segment, including segments axum could not
/// decode.
pub fn match_id(result: Result<Path<String>, PathRejection>) -> Result<MatchId, AppError> {
    let details = match result {
        Ok(Path(raw)) => match parse_match_id(&raw) {
            Ok(id) => return Ok(id),
            Err(details) => details,
        },
        Err(rejection) => {
            tracing::debug!(rejection = %rejection.body_text(), "undecodable match id");
            Violations::single(Violation::new(
                IssueCode::InvalidType,
                &["id"],
                "Invalid input: expected number, received NaN",
            ))
        }
    };
    Err(AppError::invalid_match_id(details))
}

/// Unwrap an extracted JSON body. Rejections other than an oversized body
/// become a root violation wrapped by `invalid`.
pub fn json_body(
    result: Result<Json<Value>, JsonRejection>,
    invalid: fn(Violations) -> AppError,
) -> Result<Value, AppError> {
    match result {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(AppError::PayloadTooLarge)
        }
        Err(rejection) => Err(invalid(body_violation(&rejection))),
    }
}

fn body_violation(rejection: &JsonRejection) -> Violations {
    let violation = match rejection {
        JsonRejection::MissingJsonContentType(_) => Violation::new(
            IssueCode::InvalidType,
            &[],
            "Invalid input: expected object, received undefined",
        ),
        other => Violation::new(
            IssueCode::InvalidFormat,
            &[],
            format!("Malformed JSON body: {}", other.body_text()),
        ),
    };
    Violations::single(violation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::{DefaultBodyLimit, FromRequest};
    use axum::http::{header, Request};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Value, AppError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        json_body(Json::<Value>::from_request(req, &()).await, AppError::invalid_payload)
    }

    fn details(err: AppError) -> Violations {
        match err {
            AppError::InvalidInput { details, .. } => details,
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn parses_json_object() {
        let value = extract(Some("application/json"), r#"{"message":"hi"}"#)
            .await
            .unwrap();
        assert_eq!(value["message"], "hi");
    }

    #[tokio::test]
    async fn missing_content_type_reads_as_undefined() {
        let err = details(extract(None, r#"{"message":"hi"}"#).await.unwrap_err());
        assert_eq!(err.len(), 1);
        assert!(err.as_slice()[0].path.is_empty());
        assert!(err.as_slice()[0].message.ends_with("received undefined"));
    }

    #[tokio::test]
    async fn malformed_json_is_a_root_violation() {
        let err = details(extract(Some("application/json"), "{not json").await.unwrap_err());
        assert_eq!(err.as_slice()[0].code, IssueCode::InvalidFormat);
        assert!(err.as_slice()[0].path.is_empty());
    }

    #[tokio::test]
    async fn empty_body_is_a_root_violation() {
        let err = details(extract(Some("application/json"), "").await.unwrap_err());
        assert_eq!(err.len(), 1);
    }

    #[tokio::test]
    async fn oversized_body_is_413() {
        async fn handler(body: Result<Json<Value>, JsonRejection>) -> Result<(), AppError> {
            json_body(body, AppError::invalid_payload).map(|_| ())
        }
        let app = Router::new()
            .route("/", post(handler))
            .layer(DefaultBodyLimit::max(16));
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"message":"well over sixteen bytes"}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn undecodable_id_is_an_id_violation() {
        async fn handler(id: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
            match_id(id).map(|id| id.to_string())
        }
        let app = Router::new().route("/:id", axum::routing::get(handler));
        let req = Request::builder().uri("/%FF").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn valid_id_passes_through() {
        let id = match_id(Ok(Path("17".to_string()))).unwrap();
        assert_eq!(id.get(), 17);
    }

    #[test]
    fn non_numeric_id_reports_id_field() {
        let err = details(match_id(Ok(Path("abc".to_string()))).unwrap_err());
        assert_eq!(err.as_slice()[0].field(), "id");
    }
}
