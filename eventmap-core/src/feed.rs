//! Shape of the feed endpoint's response body.
//!
//! The body is either the full event list or an object carrying an `error`.
//! List entries are decoded one at a time so a single bad row only costs
//! that row.

use serde_json::Value;
use serde_json::value::RawValue;
use tracing::warn;

use crate::error::{EventMapError, EventMapResult};
use crate::event::Event;

/// Longest slice of a rejected entry echoed into logs.
const ENTRY_PREVIEW_CHARS: usize = 120;

/// A decoded response body.
#[derive(Debug)]
pub enum FeedPayload {
    Events {
        events: Vec<Event>,
        rejected: Vec<RejectedEntry>,
    },
    /// The feed's own `error` field
    Error(String),
}

/// A list entry that could not be read as an event.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    /// Position in the feed's list
    pub index: usize,
    pub reason: String,
}

impl FeedPayload {
    /// Parse a response body.
    pub fn parse(body: &str) -> EventMapResult<Self> {
        if let Ok(entries) = serde_json::from_str::<Vec<&RawValue>>(body) {
            return Ok(Self::from_entries(&entries));
        }

        let value: Value =
            serde_json::from_str(body).map_err(|e| EventMapError::Parse(e.to_string()))?;

        match value {
            Value::Object(mut fields) => match fields.remove("error") {
                Some(Value::String(msg)) => Ok(FeedPayload::Error(msg)),
                Some(Value::Null) | None => {
                    let mut keys: Vec<_> = fields.keys().map(String::as_str).collect();
                    keys.sort_unstable();
                    Err(EventMapError::Parse(format!(
                        "expected an event list or an error object, got an object with keys [{}]",
                        keys.join(", ")
                    )))
                }
                Some(other) => Ok(FeedPayload::Error(other.to_string())),
            },
            other => Err(EventMapError::Parse(format!(
                "expected an event list or an error object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn from_entries(entries: &[&RawValue]) -> Self {
        let mut events = Vec::with_capacity(entries.len());
        let mut rejected = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            match serde_json::from_str::<Event>(entry.get()) {
                Ok(event) => events.push(event),
                Err(e) => {
                    let preview: String = entry.get().chars().take(ENTRY_PREVIEW_CHARS).collect();
                    warn!(index, error = %e, entry = %preview, "Skipping feed entry that is not an event");
                    rejected.push(RejectedEntry {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        FeedPayload::Events { events, rejected }
    }

    /// The event list, or the feed-reported error.
    pub fn into_events(self) -> EventMapResult<Vec<Event>> {
        match self {
            FeedPayload::Events { events, .. } => Ok(events),
            FeedPayload::Error(error) => Err(EventMapError::Payload(error)),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
