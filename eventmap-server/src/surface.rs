//! Map surface shared between the map host and request handlers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use eventmap_core::EventMapResult;
use eventmap_core::geo::LatLng;
use eventmap_core::map::{MapOptions, MapSurface, MarkerId, MemoryMap};
use eventmap_core::panel::DetailsPanel;

/// In-memory surface the browser map mirrors. The host writes to it;
/// handlers only read.
#[derive(Clone, Default)]
pub struct SharedMap(Arc<RwLock<MemoryMap>>);

impl SharedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, MemoryMap> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryMap> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapSurface for SharedMap {
    fn create_map(&mut self, options: &MapOptions) -> EventMapResult<()> {
        self.write().create_map(options)
    }

    fn create_marker(&mut self, position: LatLng, title: &str) -> MarkerId {
        self.write().create_marker(position, title)
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.write().remove_marker(id)
    }

    fn open_panel(&mut self, anchor: MarkerId, panel: &DetailsPanel) {
        self.write().open_panel(anchor, panel)
    }

    fn show_error(&mut self, message: &str) {
        self.write().show_error(message)
    }
}
