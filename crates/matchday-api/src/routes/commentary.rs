// SPDX-License-Identifier: BUSL-1.1
//! # Commentary API
//!
//! Append-only, per-match event feed.
//!
//! - `GET  /matches/:id/commentary?limit=` - newest first. Any positive
//!   `limit` is accepted and clamped to 100; absent means 100.
//! - `POST /matches/:id/commentary` - record one entry. `matchId` comes
//!   from the path, never the body.
//!
//! Each handler validates the path first, then the query or body, then
//! makes exactly one datastore call.

use std::collections::HashMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use matchday_core::{ListQuery, NewCommentary, DEFAULT_COMMENTARY_LIMIT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{messages, AppError, ErrorBody};
use crate::extractors::{self, json_body};
use crate::records::CommentaryRecord;
use crate::state::AppState;

/// Accepted body of `POST /matches/{id}/commentary`.
///
/// Documentation shape only: the handler validates the raw JSON so that
/// every violation can be reported at once.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentaryRequest {
    #[schema(example = "Goal! Saka finishes at the near post.")]
    pub message: String,
    /// Match clock minute, non-negative.
    pub minute: Option<i64>,
    /// Ordering hint among entries in the same minute, non-negative.
    pub sequence: Option<i64>,
    pub period: Option<String>,
    pub event_type: Option<String>,
    pub actor: Option<String>,
    pub team: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<Value>,
    pub tags: Option<Vec<String>>,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/matches/:id/commentary",
        get(list_commentary).post(create_commentary),
    )
}

/// GET /matches/:id/commentary: Most recent commentary for a match.
#[utoipa::path(
    get,
    path = "/matches/{id}/commentary",
    params(
        ("id" = i64, Path, description = "Match ID (positive integer)"),
        ("limit" = Option<u64>, Query, description = "Max entries to return (default 100, clamped to 100)"),
    ),
    responses(
        (status = 200, description = "Commentary, newest first", body = Vec<CommentaryRecord>),
        (status = 400, description = "Invalid match id or query", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody),
    ),
    tag = "commentary"
)]
async fn list_commentary(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<CommentaryRecord>>, AppError> {
    let match_id = extractors::match_id(id)?;
    let limit = ListQuery::for_commentary(&query)
        .map_err(AppError::invalid_query)?
        .effective_limit(DEFAULT_COMMENTARY_LIMIT);

    let rows = state
        .store
        .list_commentary(match_id, limit)
        .await
        .map_err(AppError::internal(messages::FAILED_FETCH_COMMENTARY))?;

    tracing::debug!(match_id = %match_id, limit, rows = rows.len(), "listed commentary");
    Ok(Json(rows))
}

/// POST /matches/:id/commentary: Record a commentary entry.
#[utoipa::path(
    post,
    path = "/matches/{id}/commentary",
    params(("id" = i64, Path, description = "Match ID (positive integer)")),
    request_body = CreateCommentaryRequest,
    responses(
        (status = 201, description = "Commentary recorded", body = CommentaryRecord),
        (status = 400, description = "Invalid match id or commentary data", body = ErrorBody),
        (status = 413, description = "Body over the size limit", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody),
    ),
    tag = "commentary"
)]
async fn create_commentary(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CommentaryRecord>), AppError> {
    let match_id = extractors::match_id(id)?;
    let body = json_body(body, AppError::invalid_commentary)?;
    let new = NewCommentary::validate(&body).map_err(AppError::invalid_commentary)?;

    let record = state
        .store
        .insert_commentary(match_id, &new)
        .await
        .map_err(AppError::internal(messages::FAILED_CREATE_COMMENTARY))?;

    tracing::info!(
        match_id = %match_id,
        commentary_id = record.id,
        event_type = record.event_type.as_deref().unwrap_or("-"),
        "commentary recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}
