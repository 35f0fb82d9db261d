// SPDX-License-Identifier: BUSL-1.1
//! # Persisted Rows
//!
//! The shapes returned by the datastore and serialized straight into
//! response bodies. Field names are camelCase on the wire; optional
//! commentary fields serialize as `null` when unset.

use chrono::{DateTime, Utc};
use matchday_core::MatchStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A match row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: i64,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    /// One of `scheduled`, `live`, `finished`.
    #[schema(value_type = String, example = "scheduled")]
    pub status: MatchStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub home_score: i64,
    pub away_score: i64,
    pub created_at: DateTime<Utc>,
}

/// A commentary row. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentaryRecord {
    pub id: i64,
    pub match_id: i64,
    pub minute: Option<i64>,
    pub sequence: Option<i64>,
    pub period: Option<String>,
    pub event_type: Option<String>,
    pub actor: Option<String>,
    pub team: Option<String>,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}
