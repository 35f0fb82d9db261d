// SPDX-License-Identifier: BUSL-1.1
//! # Commentary Schema
//!
//! Body of `POST /matches/:id/commentary`. Only `message` is required; the
//! rest annotate the event (clock minute, ordering hint within a minute,
//! period, event type, who and which side). `metadata` is an opaque JSON
//! object stored verbatim. Unknown keys are dropped.
//!
//! `matchId` is never read from the body. The handler takes it from the
//! validated path parameter.

use serde_json::{Map, Value};

use super::coerce::IntBounds;
use super::fields::FieldReader;
use crate::error::Violations;

/// Validated commentary fields, ready to be attached to a match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCommentary {
    pub message: String,
    pub minute: Option<i64>,
    pub sequence: Option<i64>,
    pub period: Option<String>,
    pub event_type: Option<String>,
    pub actor: Option<String>,
    pub team: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub tags: Option<Vec<String>>,
}

impl NewCommentary {
    pub fn validate(body: &Value) -> Result<Self, Violations> {
        let mut r = FieldReader::new(body)?;

        let message = r.required_string("message", "Message is required");
        let minute = r.optional_int("minute", IntBounds::NON_NEGATIVE);
        let sequence = r.optional_int("sequence", IntBounds::NON_NEGATIVE);
        let period = r.optional_string("period");
        let event_type = r.optional_string("eventType");
        let actor = r.optional_string("actor");
        let team = r.optional_string("team");
        let metadata = r.optional_object("metadata");
        let tags = r.optional_string_array("tags");

        match message {
            Some(message) => r.finish(|| Self {
                message,
                minute,
                sequence,
                period,
                event_type,
                actor,
                team,
                metadata,
                tags,
            }),
            None => Err(r.into_violations()),
        }
    }
}
