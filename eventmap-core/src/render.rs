//! Reconciles the on-map marker set with a filtered event list.
//!
//! Every render tears down all existing markers before placing new ones.
//! There is no incremental diffing.

use tracing::{info, warn};

use crate::event::{Event, display_coordinate};
use crate::geo::{LatLng, validate_coordinates};
use crate::map::{MapSurface, MarkerId};
use crate::panel::DetailsPanel;

/// A marker currently on the map and the event behind it.
#[derive(Debug, Clone)]
pub struct PlacedMarker {
    pub id: MarkerId,
    pub position: LatLng,
    pub event: Event,
}

/// An event left off the map because of its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEvent {
    pub name: String,
    pub lat: String,
    pub lng: String,
}

/// Outcome of one render cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub placed: usize,
    pub skipped: Vec<SkippedEvent>,
}

#[derive(Debug, Default)]
pub struct MarkerRenderer {
    markers: Vec<PlacedMarker>,
}

impl MarkerRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every marker on `surface` with one per displayable event, in
    /// list order.
    pub fn render<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        events: &[Event],
    ) -> RenderReport {
        self.clear(surface);

        let mut report = RenderReport::default();

        for event in events {
            let Some(position) = validate_coordinates(event) else {
                let skipped = SkippedEvent {
                    name: event.name.clone(),
                    lat: display_coordinate(&event.lat),
                    lng: display_coordinate(&event.lng),
                };
                warn!(
                    name = %skipped.name,
                    lat = %skipped.lat,
                    lng = %skipped.lng,
                    "Skipping event with missing or invalid coordinates"
                );
                report.skipped.push(skipped);
                continue;
            };

            let id = surface.create_marker(position, &event.name);
            self.markers.push(PlacedMarker {
                id,
                position,
                event: event.clone(),
            });
        }

        report.placed = self.markers.len();
        info!(markers = report.placed, "Total markers on map");
        report
    }

    /// Remove every marker this renderer has placed.
    pub fn clear<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        for marker in self.markers.drain(..) {
            surface.remove_marker(marker.id);
        }
    }

    /// Handle a click on a marker: build its details panel and open it
    /// anchored to the marker. Unknown ids (e.g. from a previous cycle) are
    /// ignored.
    pub fn click<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        id: MarkerId,
    ) -> Option<DetailsPanel> {
        let marker = self.marker(id)?;
        let panel = DetailsPanel::for_event(&marker.event, Some(marker.position));
        surface.open_panel(id, &panel);
        Some(panel)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&PlacedMarker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    /// Number of markers currently on the map.
    pub fn active_count(&self) -> usize {
        self.markers.len()
    }
}
