// SPDX-License-Identifier: BUSL-1.1
//! # API Route Modules
//!
//! - `matches` - match creation, listing, and score updates.
//! - `commentary` - per-match commentary feed (list and append).

pub mod commentary;
pub mod matches;
