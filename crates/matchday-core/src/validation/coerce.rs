// SPDX-License-Identifier: BUSL-1.1
//! # Numeric Coercion
//!
//! Clients send numbers as JSON numbers, as numeric strings in JSON bodies,
//! and always as strings in paths and query strings. All of them go through
//! [`to_number`] before any range check:
//!
//! | Input                  | Result                         |
//! |------------------------|--------------------------------|
//! | JSON number            | the number                     |
//! | string                 | trimmed, parsed; `""` → `0`    |
//! | `"0x1f"`, `"0b1"`, `"0o7"` | radix-parsed               |
//! | `"Infinity"`           | `+∞` (rejected later as non-finite) |
//! | `true` / `false`       | `1` / `0`                      |
//! | `null`                 | `0`                            |
//! | array / object         | NaN                            |
//!
//! [`coerce_int`] then requires a finite integer within the safe-integer
//! range and applies the caller's [`IntBounds`].

use serde_json::Value;

use crate::error::{IssueCode, Violation};

/// Largest integer every client can represent exactly (2^53 − 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Coerce a JSON value to a float. NaN signals "not a number".
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_numeric_str(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Parse a string the way a loose numeric cast does.
pub fn parse_numeric_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // `str::parse::<f64>` also accepts "inf", "nan" and friends; only plain
    // decimal notation is a number here.
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Range constraints applied after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntBounds {
    /// Minimum allowed value and whether it is exclusive.
    pub min: Option<(i64, bool)>,
    /// Inclusive maximum.
    pub max: Option<i64>,
}

impl IntBounds {
    /// `> 0`.
    pub const POSITIVE: Self = Self {
        min: Some((0, true)),
        max: None,
    };

    /// `>= 0`.
    pub const NON_NEGATIVE: Self = Self {
        min: Some((0, false)),
        max: None,
    };

    pub const fn at_most(self, max: i64) -> Self {
        Self {
            min: self.min,
            max: Some(max),
        }
    }
}

/// Coerce `value` to an integer and check it against `bounds`.
pub fn coerce_int(value: &Value, path: &[&str], bounds: IntBounds) -> Result<i64, Violation> {
    check_int(to_number(value), path, bounds)
}

/// Range-check an already coerced number.
pub fn check_int(n: f64, path: &[&str], bounds: IntBounds) -> Result<i64, Violation> {
    if n.is_nan() {
        return Err(Violation::new(
            IssueCode::InvalidType,
            path,
            "Invalid input: expected number, received NaN",
        ));
    }
    if n.is_infinite() {
        return Err(Violation::new(
            IssueCode::InvalidType,
            path,
            "Invalid input: expected number, received Infinity",
        ));
    }
    if n.fract() != 0.0 {
        return Err(Violation::new(
            IssueCode::InvalidType,
            path,
            "Invalid input: expected int, received number",
        ));
    }
    if n > MAX_SAFE_INTEGER as f64 {
        return Err(Violation::new(
            IssueCode::TooBig,
            path,
            format!("Too big: expected int to be <={MAX_SAFE_INTEGER}"),
        ));
    }
    if n < -(MAX_SAFE_INTEGER as f64) {
        return Err(Violation::new(
            IssueCode::TooSmall,
            path,
            format!("Too small: expected int to be >=-{MAX_SAFE_INTEGER}"),
        ));
    }

    let int = n as i64;
    if let Some((min, exclusive)) = bounds.min {
        if exclusive && int <= min {
            return Err(Violation::new(
                IssueCode::TooSmall,
                path,
                format!("Too small: expected number to be >{min}"),
            ));
        }
        if !exclusive && int < min {
            return Err(Violation::new(
                IssueCode::TooSmall,
                path,
                format!("Too small: expected number to be >={min}"),
            ));
        }
    }
    if let Some(max) = bounds.max {
        if int > max {
            return Err(Violation::new(
                IssueCode::TooBig,
                path,
                format!("Too big: expected number to be <={max}"),
            ));
        }
    }
    Ok(int)
}
