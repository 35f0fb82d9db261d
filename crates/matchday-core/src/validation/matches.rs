// SPDX-License-Identifier: BUSL-1.1
//! # Match Schemas
//!
//! Bodies of `POST /matches` ([`NewMatch`]) and `PATCH /matches/:id/score`
//! ([`ScoreUpdate`]).
//!
//! The cross-field rule `endTime > startTime` only runs when both
//! timestamps parsed. A malformed timestamp is reported once, by its own
//! format check, and the ordering rule stays silent.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::coerce::IntBounds;
use super::fields::FieldReader;
use crate::error::{IssueCode, Violation, Violations};
use crate::status::MatchStatus;

/// A validated match-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
}

impl NewMatch {
    pub fn validate(body: &Value) -> Result<Self, Violations> {
        let mut r = FieldReader::new(body)?;

        let sport = r.required_string("sport", "Sport is required");
        let home_team = r.required_string("homeTeam", "Home team is required");
        let away_team = r.required_string("awayTeam", "Away team is required");
        let start_time = r.required_datetime("startTime");
        let end_time = r.required_datetime("endTime");
        let home_score = r.optional_int("homeScore", IntBounds::NON_NEGATIVE);
        let away_score = r.optional_int("awayScore", IntBounds::NON_NEGATIVE);

        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end <= start {
                r.push(Violation::new(
                    IssueCode::Custom,
                    &["endTime"],
                    "endTime must be after startTime",
                ));
            }
        }

        match (sport, home_team, away_team, start_time, end_time) {
            (Some(sport), Some(home_team), Some(away_team), Some(start_time), Some(end_time)) => {
                r.finish(|| Self {
                    sport,
                    home_team,
                    away_team,
                    start_time,
                    end_time,
                    home_score,
                    away_score,
                })
            }
            _ => Err(r.into_violations()),
        }
    }

    /// Status of this match as of `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> MatchStatus {
        MatchStatus::at(self.start_time, self.end_time, now)
    }
}

/// A validated score update. Both sides are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub home_score: i64,
    pub away_score: i64,
}

impl ScoreUpdate {
    pub fn validate(body: &Value) -> Result<Self, Violations> {
        let mut r = FieldReader::new(body)?;
        let home = r.required_int("homeScore", IntBounds::NON_NEGATIVE);
        let away = r.required_int("awayScore", IntBounds::NON_NEGATIVE);
        match (home, away) {
            (Some(home_score), Some(away_score)) => r.finish(|| Self {
                home_score,
                away_score,
            }),
            _ => Err(r.into_violations()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "sport": "football",
            "homeTeam": "Arsenal",
            "awayTeam": "Chelsea",
            "startTime": "2026-05-01T15:00:00Z",
            "endTime": "2026-05-01T17:00:00Z",
        })
    }

    fn fields(err: &Violations) -> Vec<String> {
        err.iter().map(Violation::field).collect()
    }

    #[test]
    fn accepts_minimal_match() {
        let m = NewMatch::validate(&valid()).unwrap();
        assert_eq!(m.sport, "football");
        assert_eq!(m.home_team, "Arsenal");
        assert_eq!(m.start_time, Utc.with_ymd_and_hms(2026, 5, 1, 15, 0, 0).unwrap());
        assert_eq!(m.home_score, None);
    }

    #[test]
    fn coerces_numeric_string_scores() {
        let mut body = valid();
        body["homeScore"] = json!("2");
        body["awayScore"] = json!(0);
        let m = NewMatch::validate(&body).unwrap();
        assert_eq!(m.home_score, Some(2));
        assert_eq!(m.away_score, Some(0));
    }

    #[test]
    fn end_before_start_is_reported_on_end_time() {
        let mut body = valid();
        body["endTime"] = json!("2026-05-01T14:00:00Z");
        let err = NewMatch::validate(&body).unwrap_err();
        assert_eq!(fields(&err), vec!["endTime"]);
        assert_eq!(err.as_slice()[0].code, IssueCode::Custom);
        assert_eq!(err.as_slice()[0].message, "endTime must be after startTime");
    }

    #[test]
    fn equal_times_are_rejected() {
        let mut body = valid();
        body["endTime"] = body["startTime"].clone();
        let err = NewMatch::validate(&body).unwrap_err();
        assert_eq!(fields(&err), vec!["endTime"]);
    }

    #[test]
    fn malformed_timestamp_skips_ordering_rule() {
        let mut body = valid();
        body["startTime"] = json!("yesterday");
        body["endTime"] = json!("2020-01-01T00:00:00Z");
        let err = NewMatch::validate(&body).unwrap_err();
        assert_eq!(fields(&err), vec!["startTime"]);
        assert_eq!(err.as_slice()[0].code, IssueCode::InvalidFormat);
    }

    #[test]
    fn ordering_rule_runs_alongside_other_field_errors() {
        let mut body = valid();
        body["sport"] = json!("");
        body["endTime"] = json!("2026-05-01T10:00:00Z");
        let err = NewMatch::validate(&body).unwrap_err();
        assert_eq!(fields(&err), vec!["sport", "endTime"]);
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let err = NewMatch::validate(&json!({})).unwrap_err();
        assert_eq!(
            fields(&err),
            vec!["sport", "homeTeam", "awayTeam", "startTime", "endTime"]
        );
    }

    #[test]
    fn negative_score_is_too_small() {
        let mut body = valid();
        body["awayScore"] = json!(-1);
        let err = NewMatch::validate(&body).unwrap_err();
        assert_eq!(fields(&err), vec!["awayScore"]);
        assert_eq!(err.as_slice()[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn status_derives_from_window() {
        let m = NewMatch::validate(&valid()).unwrap();
        let before = Utc.with_ymd_and_hms(2026, 5, 1, 14, 0, 0).unwrap();
        let during = Utc.with_ymd_and_hms(2026, 5, 1, 16, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap();
        assert_eq!(m.status_at(before), MatchStatus::Scheduled);
        assert_eq!(m.status_at(during), MatchStatus::Live);
        assert_eq!(m.status_at(after), MatchStatus::Finished);
    }

    #[test]
    fn score_update_requires_both_sides() {
        let err = ScoreUpdate::validate(&json!({"homeScore": 1})).unwrap_err();
        assert_eq!(fields(&err), vec!["awayScore"]);
        let ok = ScoreUpdate::validate(&json!({"homeScore": "3", "awayScore": 1})).unwrap();
        assert_eq!(ok, ScoreUpdate { home_score: 3, away_score: 1 });
    }

    #[test]
    fn score_update_rejects_fractions() {
        let err = ScoreUpdate::validate(&json!({"homeScore": 1.5, "awayScore": 0})).unwrap_err();
        assert_eq!(fields(&err), vec!["homeScore"]);
        assert_eq!(err.as_slice()[0].code, IssueCode::InvalidType);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = ScoreUpdate::validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err.as_slice()[0].path.is_empty());
    }
}
