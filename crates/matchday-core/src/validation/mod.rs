// SPDX-License-Identifier: BUSL-1.1
//! # Request Validation
//!
//! Schemas for every input the API accepts. Each schema is a constructor
//! that returns `Result<T, Violations>`: the `Ok` side is already normalized
//! (numbers coerced, timestamps parsed, unknown keys dropped), the `Err`
//! side lists every violation found in schema order.

pub mod coerce;
pub mod commentary;
pub mod datetime;
mod fields;
pub mod matches;
pub mod params;

pub use commentary::NewCommentary;
pub use matches::{NewMatch, ScoreUpdate};
pub use params::{
    parse_match_id, ListQuery, DEFAULT_COMMENTARY_LIMIT, DEFAULT_MATCH_LIMIT, MAX_LIST_LIMIT,
};
