// SPDX-License-Identifier: BUSL-1.1
//! ISO-8601 datetime strings.
//!
//! Accepted shape: `YYYY-MM-DDTHH:MM[:SS[.fraction]]Z`. The trailing `Z` is
//! mandatory; numeric offsets and local (offset-less) times are rejected so
//! that every stored timestamp is unambiguous UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a strict UTC ISO-8601 datetime. Returns `None` when the string does
/// not have the accepted shape or names an impossible calendar date.
pub fn parse_iso_datetime(raw: &str) -> Option<DateTime<Utc>> {
    // Shape checks below slice by byte offset.
    if !raw.is_ascii() {
        return None;
    }
    let body = raw.strip_suffix('Z')?;
    let (date, time) = body.split_once('T')?;

    if !is_date_shape(date) {
        return None;
    }

    let normalized = match time.len() {
        5 if is_hh_mm(time) => format!("{date}T{time}:00"),
        8 if is_hh_mm_ss(time) => format!("{date}T{time}"),
        n if n > 9 && is_hh_mm_ss(&time[..8]) && is_fraction(&time[8..]) => {
            format!("{date}T{time}")
        }
        _ => return None,
    };

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_date_shape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10 && b[4] == b'-' && b[7] == b'-' && digits(&s[..4]) && digits(&s[5..7]) && digits(&s[8..])
}

fn is_hh_mm(s: &str) -> bool {
    s.len() == 5 && s.as_bytes()[2] == b':' && digits(&s[..2]) && digits(&s[3..])
}

fn is_hh_mm_ss(s: &str) -> bool {
    s.len() == 8 && s.as_bytes()[5] == b':' && is_hh_mm(&s[..5]) && digits(&s[6..])
}

fn is_fraction(s: &str) -> bool {
    s.strip_prefix('.').is_some_and(digits)
}
