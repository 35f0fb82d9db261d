// SPDX-License-Identifier: BUSL-1.1
//! Match persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `matches` table.
//! Status is derived by the caller at creation time and stored as text;
//! it is not recomputed on read.

use chrono::{DateTime, Utc};
use matchday_core::{MatchId, MatchStatus, NewMatch, ScoreUpdate};
use sqlx::PgPool;

use crate::records::MatchRecord;

const COLUMNS: &str = "id, sport, home_team, away_team, status, start_time, end_time, \
                       home_score, away_score, created_at";

/// Insert a new match and return the stored row.
pub async fn insert(
    pool: &PgPool,
    new: &NewMatch,
    status: MatchStatus,
) -> Result<MatchRecord, sqlx::Error> {
    let sql = format!(
        "INSERT INTO matches (sport, home_team, away_team, status, start_time, end_time, home_score, away_score)
         VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7::BIGINT, 0), COALESCE($8::BIGINT, 0))
         RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, MatchRow>(&sql)
        .bind(&new.sport)
        .bind(&new.home_team)
        .bind(&new.away_team)
        .bind(status.as_str())
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.home_score)
        .bind(new.away_score)
        .fetch_one(pool)
        .await?;

    Ok(row.into_record())
}

/// Most recently created matches first.
pub async fn list(pool: &PgPool, limit: u32) -> Result<Vec<MatchRecord>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM matches ORDER BY created_at DESC, id DESC LIMIT $1");
    let rows = sqlx::query_as::<_, MatchRow>(&sql)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(MatchRow::into_record).collect())
}

/// Overwrite both scores. Returns `None` if the match does not exist.
pub async fn update_score(
    pool: &PgPool,
    id: MatchId,
    score: ScoreUpdate,
) -> Result<Option<MatchRecord>, sqlx::Error> {
    let sql = format!(
        "UPDATE matches SET home_score = $1, away_score = $2 WHERE id = $3 RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, MatchRow>(&sql)
        .bind(score.home_score)
        .bind(score.away_score)
        .bind(id.get())
        .fetch_optional(pool)
        .await?;

    Ok(row.map(MatchRow::into_record))
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct MatchRow {
    id: i64,
    sport: String,
    home_team: String,
    away_team: String,
    status: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    home_score: i64,
    away_score: i64,
    created_at: DateTime<Utc>,
}

impl MatchRow {
    fn into_record(self) -> MatchRecord {
        let status = self.status.parse::<MatchStatus>().unwrap_or_else(|e| {
            tracing::warn!(
                id = self.id,
                status = %self.status,
                error = %e,
                "unknown match status in database, defaulting to scheduled"
            );
            MatchStatus::Scheduled
        });

        MatchRecord {
            id: self.id,
            sport: self.sport,
            home_team: self.home_team,
            away_team: self.away_team,
            status,
            start_time: self.start_time,
            end_time: self.end_time,
            home_score: self.home_score,
            away_score: self.away_score,
            created_at: self.created_at,
        }
    }
}
