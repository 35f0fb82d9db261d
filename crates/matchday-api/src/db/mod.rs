// SPDX-License-Identifier: BUSL-1.1
//! # Datastore
//!
//! Every request performs at most one call on a [`Datastore`]. The handle is
//! injected through [`crate::state::AppState`], never reached through a
//! global, so tests can swap in [`MemoryStore`] or a failing double.
//!
//! ## Backends
//!
//! - [`PgStore`] - PostgreSQL via SQLx. Selected when `DATABASE_URL` is set;
//!   embedded migrations run at startup.
//! - [`MemoryStore`] - process-local tables. Selected when `DATABASE_URL`
//!   is absent (development) and in tests. Nothing survives a restart.
//!
//! ## Ordering
//!
//! List operations return newest first: `created_at DESC`, ties broken by
//! `id DESC`, so a page is always the N most recent rows.

pub mod commentary;
pub mod matches;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use matchday_core::{MatchId, MatchStatus, NewCommentary, NewMatch, ScoreUpdate};
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

use crate::config::AppConfig;
use crate::records::{CommentaryRecord, MatchRecord};

pub use memory::MemoryStore;

/// Failure of a datastore call. Never shown to clients.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query, connection, or constraint failure reported by Postgres.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Commentary referenced a match that does not exist.
    #[error("match {match_id} does not exist")]
    ForeignKey { match_id: MatchId },
}

impl StoreError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(sqlx::Error::PoolTimedOut) => "pool_timeout",
            Self::Database(sqlx::Error::Database(db_err)) => database_kind(db_err.kind()),
            Self::Database(_) => "database",
            Self::Migrate(_) => "migration",
            Self::ForeignKey { .. } => "foreign_key",
        }
    }
}

fn database_kind(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UniqueViolation => "unique_violation",
        ErrorKind::ForeignKeyViolation => "foreign_key",
        ErrorKind::NotNullViolation => "not_null_violation",
        ErrorKind::CheckViolation => "check_violation",
        _ => "database",
    }
}

/// The single-call operations the handlers need.
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// every request behind an `Arc`.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Newest matches first, at most `limit` rows.
    async fn list_matches(&self, limit: u32) -> Result<Vec<MatchRecord>, StoreError>;

    /// Insert a match and return the persisted row. Missing scores are 0.
    async fn insert_match(
        &self,
        new: &NewMatch,
        status: MatchStatus,
    ) -> Result<MatchRecord, StoreError>;

    /// Overwrite both scores. `Ok(None)` when no match has this id.
    async fn update_score(
        &self,
        id: MatchId,
        score: ScoreUpdate,
    ) -> Result<Option<MatchRecord>, StoreError>;

    /// Newest commentary for one match first, at most `limit` rows.
    async fn list_commentary(
        &self,
        match_id: MatchId,
        limit: u32,
    ) -> Result<Vec<CommentaryRecord>, StoreError>;

    /// Insert commentary for `match_id` and return the persisted row,
    /// including its assigned `id` and `created_at`.
    async fn insert_commentary(
        &self,
        match_id: MatchId,
        new: &NewCommentary,
    ) -> Result<CommentaryRecord, StoreError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Postgres-backed [`Datastore`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn list_matches(&self, limit: u32) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(matches::list(&self.pool, limit).await?)
    }

    async fn insert_match(
        &self,
        new: &NewMatch,
        status: MatchStatus,
    ) -> Result<MatchRecord, StoreError> {
        Ok(matches::insert(&self.pool, new, status).await?)
    }

    async fn update_score(
        &self,
        id: MatchId,
        score: ScoreUpdate,
    ) -> Result<Option<MatchRecord>, StoreError> {
        Ok(matches::update_score(&self.pool, id, score).await?)
    }

    async fn list_commentary(
        &self,
        match_id: MatchId,
        limit: u32,
    ) -> Result<Vec<CommentaryRecord>, StoreError> {
        Ok(commentary::list(&self.pool, match_id, limit).await?)
    }

    async fn insert_commentary(
        &self,
        match_id: MatchId,
        new: &NewCommentary,
    ) -> Result<CommentaryRecord, StoreError> {
        Ok(commentary::insert(&self.pool, match_id, new).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if no database URL is configured (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool(config: &AppConfig) -> Result<Option<PgPool>, StoreError> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!(
            "DATABASE_URL not set - running in-memory only mode. \
             Data will not survive restarts."
        );
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(1)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Pick the backend for this process: Postgres when configured, memory
/// otherwise.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn Datastore>, StoreError> {
    let store: Arc<dyn Datastore> = match init_pool(config).await? {
        Some(pool) => Arc::new(PgStore::new(pool)),
        None => Arc::new(MemoryStore::new()),
    };
    tracing::info!(backend = store.backend(), "datastore ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_are_stable() {
        assert_eq!(StoreError::Database(sqlx::Error::PoolTimedOut).kind(), "pool_timeout");
        assert_eq!(StoreError::Database(sqlx::Error::RowNotFound).kind(), "database");
        let id = MatchId::new(3).unwrap();
        assert_eq!(StoreError::ForeignKey { match_id: id }.kind(), "foreign_key");
    }

    #[test]
    fn only_constraint_failures_get_constraint_kinds() {
        assert_eq!(database_kind(ErrorKind::ForeignKeyViolation), "foreign_key");
        assert_eq!(database_kind(ErrorKind::UniqueViolation), "unique_violation");
        assert_eq!(database_kind(ErrorKind::CheckViolation), "check_violation");
        assert_eq!(database_kind(ErrorKind::Other), "database");
    }

    #[test]
    fn unknown_match_names_the_id() {
        let id = MatchId::new(42).unwrap();
        assert_eq!(StoreError::ForeignKey { match_id: id }.to_string(), "match 42 does not exist");
    }

    #[tokio::test]
    async fn connect_without_url_uses_memory() {
        let config = AppConfig::default();
        let store = connect(&config).await.unwrap();
        assert_eq!(store.backend(), "memory");
        store.ping().await.unwrap();
    }
}
