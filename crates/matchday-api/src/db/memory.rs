// SPDX-License-Identifier: BUSL-1.1
//! In-memory [`Datastore`] for development and tests.
//!
//! Mirrors the Postgres schema closely enough that handlers cannot tell the
//! difference: ids are assigned from a per-table sequence, `created_at` is
//! stamped on insert and never goes backwards, missing scores default to 0,
//! and commentary against an unknown match is refused like a foreign key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use matchday_core::{MatchId, MatchStatus, NewCommentary, NewMatch, ScoreUpdate};
use parking_lot::RwLock;

use super::{Datastore, StoreError};
use crate::records::{CommentaryRecord, MatchRecord};

#[derive(Debug, Default)]
struct Tables {
    matches: Vec<MatchRecord>,
    commentary: Vec<CommentaryRecord>,
    next_match_id: i64,
    next_commentary_id: i64,
    last_created_at: Option<DateTime<Utc>>,
}

impl Tables {
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let at = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(at);
        at
    }
}

/// Process-local tables behind a single lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, id as tie-breaker.
fn newest_first<T>(rows: &mut [&T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(*b).cmp(&key(*a)));
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn list_matches(&self, limit: u32) -> Result<Vec<MatchRecord>, StoreError> {
        let tables = self.tables.read();
        let mut rows: Vec<&MatchRecord> = tables.matches.iter().collect();
        newest_first(&mut rows, |m| (m.created_at, m.id));
        Ok(rows.into_iter().take(limit as usize).cloned().collect())
    }

    async fn insert_match(
        &self,
        new: &NewMatch,
        status: MatchStatus,
    ) -> Result<MatchRecord, StoreError> {
        let mut tables = self.tables.write();
        tables.next_match_id += 1;
        let record = MatchRecord {
            id: tables.next_match_id,
            sport: new.sport.clone(),
            home_team: new.home_team.clone(),
            away_team: new.away_team.clone(),
            status,
            start_time: new.start_time,
            end_time: new.end_time,
            home_score: new.home_score.unwrap_or(0),
            away_score: new.away_score.unwrap_or(0),
            created_at: tables.stamp(),
        };
        tables.matches.push(record.clone());
        Ok(record)
    }

    async fn update_score(
        &self,
        id: MatchId,
        score: ScoreUpdate,
    ) -> Result<Option<MatchRecord>, StoreError> {
        let mut tables = self.tables.write();
        let Some(record) = tables.matches.iter_mut().find(|m| m.id == id.get()) else {
            return Ok(None);
        };
        record.home_score = score.home_score;
        record.away_score = score.away_score;
        Ok(Some(record.clone()))
    }

    async fn list_commentary(
        &self,
        match_id: MatchId,
        limit: u32,
    ) -> Result<Vec<CommentaryRecord>, StoreError> {
        let tables = self.tables.read();
        let mut rows: Vec<&CommentaryRecord> = tables
            .commentary
            .iter()
            .filter(|c| c.match_id == match_id.get())
            .collect();
        newest_first(&mut rows, |c| (c.created_at, c.id));
        Ok(rows.into_iter().take(limit as usize).cloned().collect())
    }

    async fn insert_commentary(
        &self,
        match_id: MatchId,
        new: &NewCommentary,
    ) -> Result<CommentaryRecord, StoreError> {
        let mut tables = self.tables.write();
        if !tables.matches.iter().any(|m| m.id == match_id.get()) {
            return Err(StoreError::ForeignKey { match_id });
        }
        tables.next_commentary_id += 1;
        let record = CommentaryRecord {
            id: tables.next_commentary_id,
            match_id: match_id.get(),
            minute: new.minute,
            sequence: new.sequence,
            period: new.period.clone(),
            event_type: new.event_type.clone(),
            actor: new.actor.clone(),
            team: new.team.clone(),
            message: new.message.clone(),
            metadata: new.metadata.clone().map(serde_json::Value::Object),
            tags: new.tags.clone(),
            created_at: tables.stamp(),
        };
        tables.commentary.push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_match() -> NewMatch {
        NewMatch {
            sport: "football".into(),
            home_team: "Arsenal".into(),
            away_team: "Chelsea".into(),
            start_time: Utc.with_ymd_and_hms(2026, 5, 1, 15, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2026, 5, 1, 17, 0, 0).unwrap(),
            home_score: None,
            away_score: Some(1),
        }
    }

    fn note(message: &str) -> NewCommentary {
        NewCommentary {
            message: message.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_match_assigns_id_and_default_scores() {
        let store = MemoryStore::new();
        let m = store.insert_match(&new_match(), MatchStatus::Scheduled).await.unwrap();
        assert_eq!(m.id, 1);
        assert_eq!(m.home_score, 0);
        assert_eq!(m.away_score, 1);
        let second = store.insert_match(&new_match(), MatchStatus::Live).await.unwrap();
        assert_eq!(second.id, 2);
        assert!(second.created_at >= m.created_at);
    }

    #[tokio::test]
    async fn list_matches_is_newest_first() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.insert_match(&new_match(), MatchStatus::Scheduled).await.unwrap();
        }
        let rows = store.list_matches(3).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn update_score_on_missing_match_is_none() {
        let store = MemoryStore::new();
        let id = MatchId::new(9).unwrap();
        let score = ScoreUpdate { home_score: 1, away_score: 1 };
        assert!(store.update_score(id, score).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_score_overwrites_both_sides() {
        let store = MemoryStore::new();
        let m = store.insert_match(&new_match(), MatchStatus::Live).await.unwrap();
        let id = MatchId::new(m.id).unwrap();
        let score = ScoreUpdate { home_score: 3, away_score: 2 };
        let updated = store.update_score(id, score).await.unwrap().unwrap();
        assert_eq!((updated.home_score, updated.away_score), (3, 2));
        assert_eq!(store.list_matches(1).await.unwrap()[0].home_score, 3);
    }

    #[tokio::test]
    async fn commentary_requires_existing_match() {
        let store = MemoryStore::new();
        let id = MatchId::new(1).unwrap();
        let err = store.insert_commentary(id, &note("Kick-off")).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey { match_id } if match_id == id));
    }

    #[tokio::test]
    async fn commentary_is_scoped_and_ordered() {
        let store = MemoryStore::new();
        let a = store.insert_match(&new_match(), MatchStatus::Live).await.unwrap();
        let b = store.insert_match(&new_match(), MatchStatus::Live).await.unwrap();
        let a_id = MatchId::new(a.id).unwrap();
        let b_id = MatchId::new(b.id).unwrap();

        store.insert_commentary(a_id, &note("first")).await.unwrap();
        store.insert_commentary(b_id, &note("other match")).await.unwrap();
        store.insert_commentary(a_id, &note("second")).await.unwrap();

        let rows = store.list_commentary(a_id, 100).await.unwrap();
        let messages: Vec<&str> = rows.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert!(rows.iter().all(|c| c.match_id == a.id));
        assert!(rows[0].created_at >= rows[1].created_at);
    }

    #[tokio::test]
    async fn commentary_metadata_is_stored_as_object() {
        let store = MemoryStore::new();
        let m = store.insert_match(&new_match(), MatchStatus::Live).await.unwrap();
        let mut new = note("GOAL");
        let mut meta = serde_json::Map::new();
        meta.insert("xg".into(), serde_json::json!(0.4));
        new.metadata = Some(meta);
        let row = store
            .insert_commentary(MatchId::new(m.id).unwrap(), &new)
            .await
            .unwrap();
        assert_eq!(row.metadata.unwrap()["xg"], 0.4);
    }
}
