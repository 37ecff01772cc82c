//! Application state shared by the fetch, filter and render steps.

use tracing::debug;

use crate::error::EventMapResult;
use crate::fetch::{FeedSource, log_fetch_error};
use crate::filter::{FilterState, WeekdayFilter, apply_filters};
use crate::map::{MapSurface, MarkerId};
use crate::panel::DetailsPanel;
use crate::render::{MarkerRenderer, PlacedMarker, RenderReport};
use crate::store::EventStore;

/// Everything the pipeline mutates, owned in one place.
pub struct AppState<S> {
    store: EventStore,
    filters: FilterState,
    renderer: MarkerRenderer,
    surface: S,
}

impl<S: MapSurface> AppState<S> {
    /// `surface` must already have had `create_map` called on it.
    pub fn new(surface: S, filters: FilterState) -> Self {
        AppState {
            store: EventStore::new(),
            filters,
            renderer: MarkerRenderer::new(),
            surface,
        }
    }

    /// Fetch once. On success the store is replaced and the map re-rendered;
    /// on any failure both are left exactly as they were.
    pub async fn run_fetch_cycle<F: FeedSource + ?Sized>(
        &mut self,
        source: &F,
    ) -> EventMapResult<RenderReport> {
        match source.fetch().await {
            Ok(events) => {
                self.store.replace(events);
                Ok(self.apply_filters())
            }
            Err(err) => {
                log_fetch_error(&err);
                Err(err)
            }
        }
    }

    /// Re-run filter and render against the current store.
    pub fn apply_filters(&mut self) -> RenderReport {
        let filtered = apply_filters(&self.store, &self.filters);
        self.renderer.render(&mut self.surface, &filtered)
    }

    /// Weekday selector changed.
    pub fn set_weekday(&mut self, selector: &str) -> RenderReport {
        self.filters.weekday = WeekdayFilter::from_selector(selector);
        debug!(weekday = %self.filters.weekday, "Weekday filter changed");
        self.apply_filters()
    }

    /// A marker was clicked.
    pub fn click(&mut self, id: MarkerId) -> Option<(PlacedMarker, DetailsPanel)> {
        let panel = self.renderer.click(&mut self.surface, id)?;
        let marker = self.renderer.marker(id)?.clone();
        Some((marker, panel))
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn renderer(&self) -> &MarkerRenderer {
        &self.renderer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EventMapError;
    use crate::event::Event;
    use crate::map::MemoryMap;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Hands out queued results one per fetch.
    struct Scripted(Mutex<Vec<EventMapResult<Vec<Event>>>>);

    impl Scripted {
        fn new(mut results: Vec<EventMapResult<Vec<Event>>>) -> Self {
            results.reverse();
            Scripted(Mutex::new(results))
        }
    }

    #[async_trait]
    impl FeedSource for Scripted {
        async fn fetch(&self) -> EventMapResult<Vec<Event>> {
            self.0
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(EventMapError::Network("exhausted".into())))
        }
    }

    fn state() -> AppState<MemoryMap> {
        AppState::new(MemoryMap::new(), FilterState::default())
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_store_and_markers() {
        let source = Scripted::new(vec![
            Ok(vec![Event::new("Picnic").with_coordinates(-33.8, 151.2)]),
            Err(EventMapError::Transport {
                status: 500,
                status_text: "Internal Server Error".into(),
                body: "boom".into(),
            }),
        ]);
        let mut state = state();

        state.run_fetch_cycle(&source).await.unwrap();
        let updated = state.store().last_updated();
        assert!(state.run_fetch_cycle(&source).await.is_err());

        assert_eq!(state.store().len(), 1);
        assert_eq!(state.store().last_updated(), updated);
        assert_eq!(state.surface().marker_count(), 1);
    }

    #[tokio::test]
    async fn test_weekday_change_rerenders() {
        let source = Scripted::new(vec![Ok(vec![
            Event::new("Picnic")
                .with_coordinates(-33.8, 151.2)
                .with_weekday("Saturday"),
            Event::new("Quiz")
                .with_coordinates(-33.9, 151.1)
                .with_weekday("Monday"),
        ])]);
        let mut state = state();
        state.run_fetch_cycle(&source).await.unwrap();
        assert_eq!(state.surface().marker_count(), 2);

        let report = state.set_weekday("Monday");
        assert_eq!(report.placed, 1);
        assert_eq!(state.surface().markers()[0].title, "Quiz");

        state.set_weekday("all");
        assert_eq!(state.surface().marker_count(), 2);
    }

    #[tokio::test]
    async fn test_click_returns_marker_and_panel() {
        let source = Scripted::new(vec![Ok(vec![
            Event::new("Picnic").with_coordinates(-33.8, 151.2),
        ])]);
        let mut state = state();
        state.run_fetch_cycle(&source).await.unwrap();
        let id = state.renderer().markers()[0].id;

        let (marker, panel) = state.click(id).expect("clicked");
        assert_eq!(marker.event.name, "Picnic");
        assert_eq!(panel.title, "Picnic");
    }
}
