// SPDX-License-Identifier: BUSL-1.1
//! Commentary persistence operations.
//!
//! Rows are append-only. `match_id` carries a foreign key to `matches`, so
//! inserting against an unknown match fails with a constraint error.

use chrono::{DateTime, Utc};
use matchday_core::{MatchId, NewCommentary};
use sqlx::PgPool;

use crate::records::CommentaryRecord;

const COLUMNS: &str = "id, match_id, minute, sequence, period, event_type, actor, team, \
                       message, metadata, tags, created_at";

/// Insert one commentary entry and return the stored row.
pub async fn insert(
    pool: &PgPool,
    match_id: MatchId,
    new: &NewCommentary,
) -> Result<CommentaryRecord, sqlx::Error> {
    let metadata = new.metadata.clone().map(serde_json::Value::Object);
    let sql = format!(
        "INSERT INTO commentary (match_id, minute, sequence, period, event_type, actor, team, message, metadata, tags)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, CommentaryRow>(&sql)
        .bind(match_id.get())
        .bind(new.minute)
        .bind(new.sequence)
        .bind(&new.period)
        .bind(&new.event_type)
        .bind(&new.actor)
        .bind(&new.team)
        .bind(&new.message)
        .bind(metadata)
        .bind(&new.tags)
        .fetch_one(pool)
        .await?;

    Ok(row.into())
}

/// Newest entries for one match first, at most `limit` rows.
pub async fn list(
    pool: &PgPool,
    match_id: MatchId,
    limit: u32,
) -> Result<Vec<CommentaryRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM commentary
         WHERE match_id = $1
         ORDER BY created_at DESC, id DESC
         LIMIT $2"
    );
    let rows = sqlx::query_as::<_, CommentaryRow>(&sql)
        .bind(match_id.get())
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(CommentaryRecord::from).collect())
}

#[derive(sqlx::FromRow)]
struct CommentaryRow {
    id: i64,
    match_id: i64,
    minute: Option<i64>,
    sequence: Option<i64>,
    period: Option<String>,
    event_type: Option<String>,
    actor: Option<String>,
    team: Option<String>,
    message: String,
    metadata: Option<serde_json::Value>,
    tags: Option<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl From<CommentaryRow> for CommentaryRecord {
    fn from(row: CommentaryRow) -> Self {
        Self {
            id: row.id,
            match_id: row.match_id,
            minute: row.minute,
            sequence: row.sequence,
            period: row.period,
            event_type: row.event_type,
            actor: row.actor,
            team: row.team,
            message: row.message,
            metadata: row.metadata,
            tags: row.tags,
            created_at: row.created_at,
        }
    }
}
