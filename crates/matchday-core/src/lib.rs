// SPDX-License-Identifier: BUSL-1.1
//! # matchday-core: Domain Types and Request Validation
//!
//! The validation layer of matchday. Every function here is pure: it takes
//! raw, untyped input (path segments, query strings, arbitrary JSON bodies)
//! and returns either a normalized typed value or an ordered list of
//! field-level [`Violation`]s. Malformed input is never an `Err` of any other
//! kind and never panics.
//!
//! ## Schemas
//!
//! | Input                      | Entry point                          |
//! |----------------------------|--------------------------------------|
//! | `:id` path parameter       | [`validation::parse_match_id`]       |
//! | `GET /matches?limit=`      | [`ListQuery::for_matches`]           |
//! | `GET .../commentary?limit=`| [`ListQuery::for_commentary`]        |
//! | `POST /matches` body       | [`NewMatch::validate`]               |
//! | `PATCH .../score` body     | [`ScoreUpdate::validate`]            |
//! | `POST .../commentary` body | [`NewCommentary::validate`]          |
//!
//! ## Crate Policy
//!
//! - No I/O, no async, no dependency on the HTTP or database layer.
//! - No `.unwrap()` outside tests.
//! - Numeric inputs are coerced (see [`validation::coerce`]) before range
//!   checks, so `"7"` and `7` validate identically.

pub mod error;
pub mod ids;
pub mod status;
pub mod validation;

pub use error::{IssueCode, Violation, Violations};
pub use ids::MatchId;
pub use status::MatchStatus;
pub use validation::{
    parse_match_id, ListQuery, NewCommentary, NewMatch, ScoreUpdate, DEFAULT_COMMENTARY_LIMIT,
    DEFAULT_MATCH_LIMIT, MAX_LIST_LIMIT,
};
