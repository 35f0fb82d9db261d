// SPDX-License-Identifier: BUSL-1.1
//! Match lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a match stands relative to its scheduled window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
}

impl MatchStatus {
    /// Derive the status from the match window: scheduled before `start`,
    /// live in `[start, end)`, finished from `end` on.
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < start {
            Self::Scheduled
        } else if now < end {
            Self::Live
        } else {
            Self::Finished
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a status string outside the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for MatchStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "live" => Ok(Self::Live),
            "finished" => Ok(Self::Finished),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
