// SPDX-License-Identifier: BUSL-1.1
//! # Path and Query Parameters
//!
//! The `:id` path segment and the `limit` query parameter of the list
//! endpoints. Both arrive as strings and are coerced before range checks.
//!
//! ## Effective limit
//!
//! Whatever the client asks for, a list operation never returns more than
//! [`MAX_LIST_LIMIT`] rows: the effective limit is
//! `min(requested-or-default, MAX_LIST_LIMIT)`. The match list additionally
//! rejects `limit > 100` up front; the commentary list accepts it and clamps.

use std::collections::HashMap;

use super::coerce::{check_int, parse_numeric_str, IntBounds};
use crate::error::{IssueCode, Violation, Violations};
use crate::ids::MatchId;

/// Hard ceiling on rows returned by any list operation.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Page size for `GET /matches/:id/commentary` without `limit`.
pub const DEFAULT_COMMENTARY_LIMIT: u32 = MAX_LIST_LIMIT;

/// Page size for `GET /matches` without `limit`.
pub const DEFAULT_MATCH_LIMIT: u32 = 50;

/// Validate the `:id` path parameter.
pub fn parse_match_id(raw: &str) -> Result<MatchId, Violations> {
    let n = check_int(parse_numeric_str(raw), &["id"], IntBounds::POSITIVE)?;
    MatchId::new(n).ok_or_else(|| {
        Violations::single(Violation::new(
            IssueCode::TooSmall,
            &["id"],
            "Too small: expected number to be >0",
        ))
    })
}

/// Validated list query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Requested page size, if the client sent one.
    pub limit: Option<u64>,
}

impl ListQuery {
    /// Query of `GET /matches`: `limit` must be a positive integer ≤ 100.
    pub fn for_matches(query: &HashMap<String, String>) -> Result<Self, Violations> {
        Self::parse(query, IntBounds::POSITIVE.at_most(i64::from(MAX_LIST_LIMIT)))
    }

    /// Query of `GET /matches/:id/commentary`: `limit` must be a positive
    /// integer; values above the ceiling are clamped, not rejected.
    pub fn for_commentary(query: &HashMap<String, String>) -> Result<Self, Violations> {
        Self::parse(query, IntBounds::POSITIVE)
    }

    fn parse(query: &HashMap<String, String>, bounds: IntBounds) -> Result<Self, Violations> {
        let limit = match query.get("limit") {
            None => None,
            Some(raw) => {
                let n = check_int(parse_numeric_str(raw), &["limit"], bounds)?;
                // Bounds guarantee n > 0.
                Some(n as u64)
            }
        };
        Ok(Self { limit })
    }

    /// `min(limit.unwrap_or(default), MAX_LIST_LIMIT)`.
    pub fn effective_limit(&self, default: u32) -> u32 {
        let requested = self.limit.unwrap_or(u64::from(default));
        requested.min(u64::from(MAX_LIST_LIMIT)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn q(limit: &str) -> HashMap<String, String> {
        HashMap::from([("limit".to_string(), limit.to_string())])
    }

    #[test]
    fn numeric_ids_parse() {
        assert_eq!(parse_match_id("7").unwrap().get(), 7);
        assert_eq!(parse_match_id(" 12 ").unwrap().get(), 12);
    }

    #[test]
    fn bad_ids_are_violations_at_id() {
        for raw in ["abc", "0", "-5", "1.5", "", "7x", "Infinity"] {
            let err = parse_match_id(raw).unwrap_err();
            assert_eq!(err.len(), 1, "{raw:?}");
            assert_eq!(err.as_slice()[0].path, vec!["id".to_string()]);
        }
    }

    #[test]
    fn absent_limit_uses_default() {
        let query = ListQuery::for_commentary(&HashMap::new()).unwrap();
        assert_eq!(query.limit, None);
        assert_eq!(query.effective_limit(DEFAULT_COMMENTARY_LIMIT), 100);
        let query = ListQuery::for_matches(&HashMap::new()).unwrap();
        assert_eq!(query.effective_limit(DEFAULT_MATCH_LIMIT), 50);
    }

    #[test]
    fn match_query_rejects_over_ceiling() {
        let err = ListQuery::for_matches(&q("101")).unwrap_err();
        assert_eq!(err.as_slice()[0].code, IssueCode::TooBig);
        assert_eq!(ListQuery::for_matches(&q("100")).unwrap().limit, Some(100));
    }

    #[test]
    fn commentary_query_clamps_over_ceiling() {
        let query = ListQuery::for_commentary(&q("500")).unwrap();
        assert_eq!(query.limit, Some(500));
        assert_eq!(query.effective_limit(DEFAULT_COMMENTARY_LIMIT), 100);
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        for raw in ["0", "-1", "abc", "2.5", ""] {
            assert!(ListQuery::for_commentary(&q(raw)).is_err(), "{raw:?}");
            assert!(ListQuery::for_matches(&q(raw)).is_err(), "{raw:?}");
        }
    }

    #[test]
    fn unrelated_query_keys_are_ignored() {
        let map = HashMap::from([("offset".to_string(), "x".to_string())]);
        assert_eq!(ListQuery::for_commentary(&map).unwrap().limit, None);
    }

    proptest! {
        #[test]
        fn effective_limit_never_exceeds_ceiling(limit in 1u64..10_000_000) {
            let query = ListQuery::for_commentary(&q(&limit.to_string())).unwrap();
            prop_assert!(query.effective_limit(DEFAULT_COMMENTARY_LIMIT) <= MAX_LIST_LIMIT);
        }

        #[test]
        fn effective_limit_honors_requests_within_ceiling(limit in 1u32..=100) {
            let query = ListQuery::for_commentary(&q(&limit.to_string())).unwrap();
            prop_assert_eq!(query.effective_limit(DEFAULT_COMMENTARY_LIMIT), limit);
        }

        #[test]
        fn positive_ids_roundtrip(id in 1i64..9_007_199_254_740_991) {
            prop_assert_eq!(parse_match_id(&id.to_string()).unwrap().get(), id);
        }

        #[test]
        fn non_positive_ids_are_rejected(id in i64::MIN / 2..=0) {
            prop_assert!(parse_match_id(&id.to_string()).is_err());
        }
    }
}
