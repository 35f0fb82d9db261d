// SPDX-License-Identifier: BUSL-1.1
//! Field accessors shared by the body schemas.
//!
//! A [`FieldReader`] walks one JSON object, records a violation for every
//! field that fails, and hands back `None` for that field so the schema can
//! keep going and report everything in one pass.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::coerce::{coerce_int, IntBounds};
use super::datetime::parse_iso_datetime;
use crate::error::{IssueCode, Violation, Violations};

/// JSON type name used in "expected X, received Y" messages.
pub(crate) fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

fn expected(path: &[&str], want: &str, got: Option<&Value>) -> Violation {
    Violation::new(
        IssueCode::InvalidType,
        path,
        format!("Invalid input: expected {want}, received {}", type_name(got)),
    )
}

/// Reads typed fields out of a JSON object, collecting violations.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    violations: Violations,
}

impl<'a> FieldReader<'a> {
    /// Start reading `body`. A non-object body is itself a violation at the
    /// root and yields `Err` immediately.
    pub(crate) fn new(body: &'a Value) -> Result<Self, Violations> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                violations: Violations::new(),
            }),
            other => Err(Violations::single(expected(&[], "object", Some(other)))),
        }
    }

    /// Record a violation produced outside the reader (cross-field rules).
    pub(crate) fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Violations collected so far. Callers use this when a required field
    /// came back `None`, which always recorded a violation.
    pub(crate) fn into_violations(self) -> Violations {
        self.violations
    }

    pub(crate) fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Violations> {
        if self.violations.is_empty() {
            Ok(value())
        } else {
            Err(self.violations)
        }
    }

    /// Required string of at least one character. `empty_message` is used
    /// when the string is present but empty.
    pub(crate) fn required_string(&mut self, key: &str, empty_message: &str) -> Option<String> {
        match self.object.get(key) {
            Some(Value::String(s)) if s.is_empty() => {
                self.violations
                    .push(Violation::new(IssueCode::TooSmall, &[key], empty_message));
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            other => {
                self.violations.push(expected(&[key], "string", other));
                None
            }
        }
    }

    /// Optional string. Absent is fine; `null` or any other type is not.
    pub(crate) fn optional_string(&mut self, key: &str) -> Option<String> {
        match self.object.get(key) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            other => {
                self.violations.push(expected(&[key], "string", other));
                None
            }
        }
    }

    /// Required ISO-8601 UTC datetime string.
    pub(crate) fn required_datetime(&mut self, key: &str) -> Option<DateTime<Utc>> {
        match self.object.get(key) {
            Some(Value::String(s)) => {
                let parsed = parse_iso_datetime(s);
                if parsed.is_none() {
                    self.violations.push(Violation::new(
                        IssueCode::InvalidFormat,
                        &[key],
                        "Invalid ISO datetime",
                    ));
                }
                parsed
            }
            other => {
                self.violations.push(expected(&[key], "string", other));
                None
            }
        }
    }

    /// Required integer, coerced from numeric-looking input.
    pub(crate) fn required_int(&mut self, key: &str, bounds: IntBounds) -> Option<i64> {
        match self.object.get(key) {
            None => {
                self.violations.push(expected(&[key], "number", None));
                None
            }
            Some(value) => self.int(key, value, bounds),
        }
    }

    /// Optional integer. Only an absent key is skipped; `null` coerces to 0.
    pub(crate) fn optional_int(&mut self, key: &str, bounds: IntBounds) -> Option<i64> {
        let value = self.object.get(key)?;
        self.int(key, value, bounds)
    }

    fn int(&mut self, key: &str, value: &Value, bounds: IntBounds) -> Option<i64> {
        match coerce_int(value, &[key], bounds) {
            Ok(n) => Some(n),
            Err(v) => {
                self.violations.push(v);
                None
            }
        }
    }

    /// Optional JSON object, kept as-is.
    pub(crate) fn optional_object(&mut self, key: &str) -> Option<Map<String, Value>> {
        match self.object.get(key) {
            None => None,
            Some(Value::Object(map)) => Some(map.clone()),
            other => {
                self.violations.push(expected(&[key], "record", other));
                None
            }
        }
    }

    /// Optional array whose every element is a string. Each bad element is
    /// reported at its own index.
    pub(crate) fn optional_string_array(&mut self, key: &str) -> Option<Vec<String>> {
        let items = match self.object.get(key) {
            None => return None,
            Some(Value::Array(items)) => items,
            other => {
                self.violations.push(expected(&[key], "array", other));
                return None;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => {
                    let index = i.to_string();
                    self.violations
                        .push(expected(&[key, index.as_str()], "string", Some(other)));
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }
}
