//! Event records as served by the feed endpoint.
//!
//! The feed is opaque apart from the fields modelled here. Anything else an
//! event carries is kept in `extra` so it survives being re-served.
//!
//! Display fields are read leniently: a spreadsheet cell may arrive as a
//! number, a boolean or `null`, and none of those should cost the event.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One occurrence from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Marker title and panel heading
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,

    /// Unvalidated coordinates; see [`crate::geo::validate_coordinates`]
    #[serde(default)]
    pub lat: Option<RawCoordinate>,
    #[serde(default)]
    pub lng: Option<RawCoordinate>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: String,
    /// Compared verbatim against the weekday selector
    #[serde(default, deserialize_with = "lenient_text")]
    pub weekday: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,

    /// Multi-line free text
    #[serde(
        default,
        deserialize_with = "lenient_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A coordinate exactly as the feed sent it.
///
/// Spreadsheet-backed feeds send numbers as either JSON numbers or strings,
/// and occasionally something else entirely. Nothing is rejected here;
/// validation happens when a marker is about to be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
    Other(Value),
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Event {
            name: name.into(),
            lat: None,
            lng: None,
            date: String::new(),
            time: String::new(),
            weekday: String::new(),
            location: String::new(),
            description: None,
            extra: Map::new(),
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(RawCoordinate::Number(lat));
        self.lng = Some(RawCoordinate::Number(lng));
        self
    }

    pub fn with_weekday(mut self, weekday: impl Into<String>) -> Self {
        self.weekday = weekday.into();
        self
    }

    /// Description, if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for RawCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCoordinate::Number(n) => write!(f, "{}", n),
            RawCoordinate::Text(s) => write!(f, "{:?}", s),
            RawCoordinate::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Text as-is, `null` as empty, anything else as its JSON text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Formats an optional raw coordinate for diagnostics, `null` when absent.
pub fn display_coordinate(coord: &Option<RawCoordinate>) -> String {
    match coord {
        Some(c) => c.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_event() {
        let event: Event = serde_json::from_value(json!({
            "name": "Picnic",
            "lat": -33.8,
            "lng": "151.2",
            "date": "2025-03-22",
            "time": "11:00",
            "weekday": "Saturday",
            "location": "Centennial Park",
            "description": "Bring a rug\nand snacks",
            "organiser": "Parks Club"
        }))
        .expect("Should deserialize");

        assert_eq!(event.name, "Picnic");
        assert_eq!(event.lat, Some(RawCoordinate::Number(-33.8)));
        assert_eq!(event.lng, Some(RawCoordinate::Text("151.2".to_string())));
        assert_eq!(event.weekday, "Saturday");
        assert_eq!(event.description(), Some("Bring a rug\nand snacks"));
        assert_eq!(event.extra.get("organiser"), Some(&json!("Parks Club")));
    }

    #[test]
    fn test_null_and_missing_coordinates_are_none() {
        let event: Event =
            serde_json::from_value(json!({ "name": "Bad", "lat": null })).expect("Should deserialize");

        assert_eq!(event.lat, None);
        assert_eq!(event.lng, None);
        assert_eq!(event.location, "");
    }

    #[test]
    fn test_non_numeric_coordinate_kept_as_other() {
        let event: Event = serde_json::from_value(json!({ "name": "Odd", "lat": true, "lng": [1] }))
            .expect("Should deserialize");

        assert_eq!(event.lat, Some(RawCoordinate::Other(json!(true))));
        assert_eq!(display_coordinate(&event.lng), "[1]");
    }

    #[test]
    fn test_display_fields_accept_cells_of_any_type() {
        let event: Event = serde_json::from_value(json!({
            "name": 42,
            "lat": -33.8,
            "lng": 151.2,
            "date": null,
            "time": 1100,
            "weekday": "Saturday",
            "location": null,
            "description": false
        }))
        .expect("Should deserialize");

        assert_eq!(event.name, "42");
        assert_eq!(event.date, "");
        assert_eq!(event.time, "1100");
        assert_eq!(event.location, "");
        assert_eq!(event.description, Some("false".to_string()));
    }

    #[test]
    fn test_null_description_is_absent() {
        let event: Event = serde_json::from_value(json!({ "name": "Quiz", "description": null }))
            .expect("Should deserialize");
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_blank_description_is_treated_as_absent() {
        let mut event = Event::new("Quiz night");
        event.description = Some("  \n ".to_string());
        assert_eq!(event.description(), None);
    }
}
