//! The map library seam.
//!
//! Everything that actually draws (tiles, pins, info windows) lives behind
//! [`MapSurface`]. The pipeline only places and removes markers and opens
//! panels; front ends decide what that looks like.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EventMapError, EventMapResult};
use crate::geo::LatLng;
use crate::panel::DetailsPanel;

/// Sydney, where the first deployment was centred.
pub const DEFAULT_CENTER: LatLng = LatLng::new(-33.8688, 151.2093);
pub const DEFAULT_ZOOM: u8 = 10;
pub const MAX_ZOOM: u8 = 22;

/// Shown in place of the map when it cannot be initialized.
pub const MAP_INIT_ERROR_MESSAGE: &str = "Error loading map. Please check the logs.";

/// Handle to a marker placed on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Initial map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapOptions {
    pub fn validate(&self) -> EventMapResult<()> {
        if !self.center.is_valid() {
            return Err(EventMapError::MapInit(format!(
                "invalid map center {}",
                self.center
            )));
        }
        if self.zoom > MAX_ZOOM {
            return Err(EventMapError::MapInit(format!(
                "zoom {} is outside 0..={}",
                self.zoom, MAX_ZOOM
            )));
        }
        Ok(())
    }
}

/// Operations the pipeline needs from a mapping library.
pub trait MapSurface {
    /// Instantiate the map. Called once, before anything else.
    fn create_map(&mut self, options: &MapOptions) -> EventMapResult<()>;

    /// Place a marker with a hover label.
    fn create_marker(&mut self, position: LatLng, title: &str) -> MarkerId;

    fn remove_marker(&mut self, id: MarkerId);

    /// Open a details panel anchored to a marker.
    fn open_panel(&mut self, anchor: MarkerId, panel: &DetailsPanel);

    /// Replace the map with a user-visible error message.
    fn show_error(&mut self, message: &str);
}

/// A marker as a surface sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub id: MarkerId,
    pub title: String,
    pub position: LatLng,
}

/// Surface that keeps its state in memory.
///
/// Used directly in tests, and as the backing store for front ends that
/// serve the marker set to a browser.
#[derive(Debug, Default)]
pub struct MemoryMap {
    options: Option<MapOptions>,
    markers: BTreeMap<MarkerId, MarkerView>,
    next_id: u64,
    open_panel: Option<(MarkerId, DetailsPanel)>,
    error: Option<String>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Option<&MapOptions> {
        self.options.as_ref()
    }

    /// Markers in placement order.
    pub fn markers(&self) -> Vec<MarkerView> {
        self.markers.values().cloned().collect()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&MarkerView> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// The panel most recently opened, if its anchor is still placed.
    pub fn current_panel(&self) -> Option<&(MarkerId, DetailsPanel)> {
        self.open_panel.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl MapSurface for MemoryMap {
    fn create_map(&mut self, options: &MapOptions) -> EventMapResult<()> {
        options.validate()?;
        self.options = Some(*options);
        Ok(())
    }

    fn create_marker(&mut self, position: LatLng, title: &str) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            MarkerView {
                id,
                title: title.to_string(),
                position,
            },
        );
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
        if matches!(&self.open_panel, Some((anchor, _)) if *anchor == id) {
            self.open_panel = None;
        }
    }

    fn open_panel(&mut self, anchor: MarkerId, panel: &DetailsPanel) {
        self.open_panel = Some((anchor, panel.clone()));
    }

    fn show_error(&mut self, message: &str) {
        self.markers.clear();
        self.error = Some(message.to_string());
    }
}
