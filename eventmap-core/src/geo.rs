//! Coordinate validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{Event, RawCoordinate};

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    /// Both components finite and within the usual ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl RawCoordinate {
    /// Numeric value, if this is a finite number or a string holding one.
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            RawCoordinate::Number(n) => *n,
            RawCoordinate::Text(s) => s.trim().parse::<f64>().ok()?,
            RawCoordinate::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Extract a placeable position from an event.
///
/// Returns `None` when either coordinate is missing, null, non-numeric or
/// out of range.
pub fn validate_coordinates(event: &Event) -> Option<LatLng> {
    let lat = event.lat.as_ref()?.parse()?;
    let lng = event.lng.as_ref()?.parse()?;
    let position = LatLng::new(lat, lng);
    position.is_valid().then_some(position)
}
