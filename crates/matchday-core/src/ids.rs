// SPDX-License-Identifier: BUSL-1.1
//! # Identifier Newtypes
//!
//! Match identifiers are datastore-assigned positive integers. A [`MatchId`]
//! only comes out of validation (or the datastore), so holders can rely on
//! it being `> 0`.

use serde::{Deserialize, Serialize};

/// Identifier of a match row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(i64);

impl MatchId {
    /// Wrap a raw id. Returns `None` for non-positive values.
    pub fn new(raw: i64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MatchId> for i64 {
    fn from(id: MatchId) -> Self {
        id.0
    }
}
