// SPDX-License-Identifier: BUSL-1.1
//! # Violations: Structured Validation Failures
//!
//! A [`Violation`] names the offending field by path and carries a
//! human-readable message. Handlers surface the list verbatim in the
//! `details` array of a 400 response, so the serialized shape is part of
//! the wire contract:
//!
//! ```json
//! { "code": "too_small", "path": ["homeScore"], "message": "Too small: expected number to be >=0" }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Value has the wrong JSON type, is missing, or is not a number.
    InvalidType,
    /// Value is below the allowed minimum (numbers) or too short (strings).
    TooSmall,
    /// Value is above the allowed maximum.
    TooBig,
    /// String does not match the required format (e.g. ISO-8601).
    InvalidFormat,
    /// Cross-field rule failed.
    Custom,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: IssueCode,
    /// Field path segments from the root of the input. Empty for the root.
    pub path: Vec<String>,
    pub message: String,
}

impl Violation {
    pub fn new(code: IssueCode, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.iter().map(|s| (*s).to_string()).collect(),
            message: message.into(),
        }
    }

    /// Dotted rendering of [`Self::path`], e.g. `tags.2`.
    pub fn field(&self) -> String {
        self.path.join(".")
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field(), self.message)
        }
    }
}

/// Ordered list of violations produced by one validation pass.
///
/// Order follows the schema's field order, with cross-field rules last.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[error("input failed validation: {}", summarize(.0))]
pub struct Violations(Vec<Violation>);

fn summarize(items: &[Violation]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Violations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A list holding exactly one violation.
    pub fn single(violation: Violation) -> Self {
        Self(vec![violation])
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl From<Violation> for Violations {
    fn from(v: Violation) -> Self {
        Self::single(v)
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_serializes_with_snake_case_code() {
        let v = Violation::new(IssueCode::TooSmall, &["homeScore"], "too small");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["code"], "too_small");
        assert_eq!(json["path"], serde_json::json!(["homeScore"]));
        assert_eq!(json["message"], "too small");
    }

    #[test]
    fn violations_serialize_as_plain_array() {
        let list = Violations::single(Violation::new(IssueCode::Custom, &["endTime"], "x"));
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[test]
    fn display_includes_field_and_message() {
        let list = Violations::single(Violation::new(IssueCode::InvalidType, &["id"], "bad id"));
        assert_eq!(list.to_string(), "input failed validation: id: bad id");
    }

    #[test]
    fn root_violation_displays_message_only() {
        let v = Violation::new(IssueCode::InvalidType, &[], "expected object");
        assert_eq!(v.to_string(), "expected object");
        assert_eq!(v.field(), "");
    }
}
