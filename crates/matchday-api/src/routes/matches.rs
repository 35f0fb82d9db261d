// SPDX-License-Identifier: BUSL-1.1
//! # Match API
//!
//! - `GET   /matches?limit=` - newest first; `limit` must be 1..=100,
//!   default 50.
//! - `POST  /matches` - create; status is derived from the start/end window
//!   at the moment of creation and scores default to 0.
//! - `PATCH /matches/:id/score` - overwrite both scores; 404 when the match
//!   does not exist.

use std::collections::HashMap;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use matchday_core::{ListQuery, NewMatch, ScoreUpdate, DEFAULT_MATCH_LIMIT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::{messages, AppError, ErrorBody};
use crate::extractors::{self, json_body};
use crate::records::MatchRecord;
use crate::state::AppState;

/// Accepted body of `POST /matches`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    #[schema(example = "football")]
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    /// ISO-8601 UTC, e.g. `2026-05-01T15:00:00Z`.
    pub start_time: DateTime<Utc>,
    /// Must be strictly after `startTime`.
    pub end_time: DateTime<Utc>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
}

/// Accepted body of `PATCH /matches/{id}/score`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdateRequest {
    pub home_score: i64,
    pub away_score: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route("/matches/:id/score", patch(update_score))
}

/// GET /matches: Most recently created matches.
#[utoipa::path(
    get,
    path = "/matches",
    params(
        ("limit" = Option<u64>, Query, description = "Max matches to return (1..=100, default 50)"),
    ),
    responses(
        (status = 200, description = "Matches, newest first", body = Vec<MatchRecord>),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody),
    ),
    tag = "matches"
)]
async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<MatchRecord>>, AppError> {
    let limit = ListQuery::for_matches(&query)
        .map_err(AppError::invalid_query)?
        .effective_limit(DEFAULT_MATCH_LIMIT);

    let rows = state
        .store
        .list_matches(limit)
        .await
        .map_err(AppError::internal(messages::FAILED_LIST_MATCHES))?;

    Ok(Json(rows))
}

/// POST /matches: Create a match.
#[utoipa::path(
    post,
    path = "/matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match created", body = MatchRecord),
        (status = 400, description = "Invalid payload", body = ErrorBody),
        (status = 413, description = "Body over the size limit", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody),
    ),
    tag = "matches"
)]
async fn create_match(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchRecord>), AppError> {
    let body = json_body(body, AppError::invalid_payload)?;
    let new = NewMatch::validate(&body).map_err(AppError::invalid_payload)?;
    let status = new.status_at(Utc::now());

    let record = state
        .store
        .insert_match(&new, status)
        .await
        .map_err(AppError::internal(messages::FAILED_CREATE_MATCH))?;

    tracing::info!(match_id = record.id, sport = %record.sport, status = %record.status, "match created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /matches/:id/score: Overwrite the score of a match.
#[utoipa::path(
    patch,
    path = "/matches/{id}/score",
    params(("id" = i64, Path, description = "Match ID (positive integer)")),
    request_body = ScoreUpdateRequest,
    responses(
        (status = 200, description = "Score updated", body = MatchRecord),
        (status = 400, description = "Invalid match id or payload", body = ErrorBody),
        (status = 413, description = "Body over the size limit", body = ErrorBody),
        (status = 404, description = "Match not found", body = ErrorBody),
        (status = 500, description = "Datastore failure", body = ErrorBody),
    ),
    tag = "matches"
)]
async fn update_score(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MatchRecord>, AppError> {
    let match_id = extractors::match_id(id)?;
    let body = json_body(body, AppError::invalid_payload)?;
    let score = ScoreUpdate::validate(&body).map_err(AppError::invalid_payload)?;

    let record = state
        .store
        .update_score(match_id, score)
        .await
        .map_err(AppError::internal(messages::FAILED_UPDATE_SCORE))?
        .ok_or(AppError::NotFound(messages::MATCH_NOT_FOUND))?;

    tracing::info!(
        match_id = %match_id,
        home_score = record.home_score,
        away_score = record.away_score,
        "score updated"
    );
    Ok(Json(record))
}
