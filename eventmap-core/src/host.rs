//! Bootstrap and main loop.
//!
//! [`MapHost::start`] initializes the map; [`MapHost::run`] then fetches
//! once immediately and again on every refresh tick, while handling
//! commands from the front end (filter changes, marker clicks) in between.
//!
//! All pipeline state is owned by the loop. A fetch is awaited inside the
//! loop, so a slow request delays the next tick instead of overlapping it;
//! commands that arrive meanwhile wait their turn.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::app::AppState;
use crate::error::{EventMapError, EventMapResult};
use crate::event::Event;
use crate::fetch::FeedSource;
use crate::filter::FilterState;
use crate::map::{MAP_INIT_ERROR_MESSAGE, MapOptions, MapSurface, MarkerId};
use crate::panel::DetailsPanel;
use crate::render::RenderReport;

const COMMAND_BUFFER: usize = 32;

/// Requests a front end can make of a running host.
#[derive(Debug)]
pub enum HostCommand {
    SetWeekday {
        selector: String,
        reply: oneshot::Sender<RenderReport>,
    },
    Click {
        id: MarkerId,
        reply: oneshot::Sender<Option<ClickedMarker>>,
    },
    Refresh {
        reply: oneshot::Sender<EventMapResult<RenderReport>>,
    },
    Snapshot {
        reply: oneshot::Sender<HostSnapshot>,
    },
    Shutdown,
}

/// Result of clicking a marker.
#[derive(Debug, Clone)]
pub struct ClickedMarker {
    pub event: Event,
    pub panel: DetailsPanel,
}

/// Point-in-time view of the host for status displays.
#[derive(Debug, Clone, Serialize)]
pub struct HostSnapshot {
    pub events: usize,
    pub markers: usize,
    pub weekday: String,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Cloneable handle for talking to a running [`MapHost`].
#[derive(Debug, Clone)]
pub struct HostHandle {
    tx: mpsc::Sender<HostCommand>,
}

impl HostHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> HostCommand,
    ) -> EventMapResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| EventMapError::HostStopped)?;
        rx.await.map_err(|_| EventMapError::HostStopped)
    }

    /// Change the weekday selector and re-render.
    pub async fn set_weekday(&self, selector: impl Into<String>) -> EventMapResult<RenderReport> {
        let selector = selector.into();
        self.request(|reply| HostCommand::SetWeekday { selector, reply })
            .await
    }

    /// Click a marker. `None` if the id is not currently on the map.
    pub async fn click(&self, id: MarkerId) -> EventMapResult<Option<ClickedMarker>> {
        self.request(|reply| HostCommand::Click { id, reply }).await
    }

    /// Run a fetch cycle now, outside the regular schedule.
    pub async fn refresh(&self) -> EventMapResult<RenderReport> {
        self.request(|reply| HostCommand::Refresh { reply }).await?
    }

    pub async fn snapshot(&self) -> EventMapResult<HostSnapshot> {
        self.request(|reply| HostCommand::Snapshot { reply }).await
    }

    pub async fn shutdown(&self) -> EventMapResult<()> {
        self.tx
            .send(HostCommand::Shutdown)
            .await
            .map_err(|_| EventMapError::HostStopped)
    }
}

/// Owns the map and drives the fetch → filter → render pipeline.
pub struct MapHost<S, F> {
    state: AppState<S>,
    source: F,
    refresh_interval: Duration,
    commands: mpsc::Receiver<HostCommand>,
}

impl<S, F> MapHost<S, F>
where
    S: MapSurface,
    F: FeedSource,
{
    /// Initialize the map. If that fails the surface is told to show an
    /// error in place of the map and no host is created, so nothing will
    /// ever be fetched.
    pub fn start(
        mut surface: S,
        options: &MapOptions,
        filters: FilterState,
        source: F,
        refresh_interval: Duration,
    ) -> EventMapResult<(Self, HostHandle)> {
        if let Err(err) = surface.create_map(options) {
            error!(error = %err, "Error loading map");
            surface.show_error(MAP_INIT_ERROR_MESSAGE);
            return Err(match err {
                EventMapError::MapInit(msg) => EventMapError::MapInit(msg),
                other => EventMapError::MapInit(other.to_string()),
            });
        }

        if refresh_interval.is_zero() {
            return Err(EventMapError::Config(
                "refresh interval must be greater than zero".into(),
            ));
        }

        info!(
            center = %options.center,
            zoom = options.zoom,
            weekday = %filters.weekday,
            refresh_secs = refresh_interval.as_secs(),
            "Map initialized"
        );

        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let host = MapHost {
            state: AppState::new(surface, filters),
            source,
            refresh_interval,
            commands,
        };

        Ok((host, HostHandle { tx }))
    }

    /// Run until shut down or every handle is dropped. Returns the final
    /// state.
    pub async fn run(mut self) -> AppState<S> {
        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Failures are logged inside the cycle; the display stays as is.
                    let _ = self.state.run_fetch_cycle(&self.source).await;
                }
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    if !self.handle(command).await {
                        break;
                    }
                }
            }
        }

        info!("Map host stopped");
        self.state
    }

    /// Returns false when the loop should stop.
    async fn handle(&mut self, command: HostCommand) -> bool {
        match command {
            HostCommand::SetWeekday { selector, reply } => {
                let report = self.state.set_weekday(&selector);
                let _ = reply.send(report);
            }
            HostCommand::Click { id, reply } => {
                let clicked = self.state.click(id).map(|(marker, panel)| ClickedMarker {
                    event: marker.event,
                    panel,
                });
                debug!(marker = %id, found = clicked.is_some(), "Marker clicked");
                let _ = reply.send(clicked);
            }
            HostCommand::Refresh { reply } => {
                let result = self.state.run_fetch_cycle(&self.source).await;
                let _ = reply.send(result);
            }
            HostCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            HostCommand::Shutdown => return false,
        }
        true
    }

    fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            events: self.state.store().len(),
            markers: self.state.renderer().active_count(),
            weekday: self.state.filters().weekday.to_string(),
            last_updated: self.state.store().last_updated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;
    use crate::map::MemoryMap;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FeedSource for CountingSource {
        async fn fetch(&self) -> EventMapResult<Vec<Event>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                Event::new("Picnic")
                    .with_coordinates(-33.8, 151.2)
                    .with_weekday("Saturday"),
            ])
        }
    }

    #[tokio::test]
    async fn test_map_init_failure_shows_error_and_never_fetches() {
        let source = CountingSource::default();
        let options = MapOptions {
            center: LatLng::new(120.0, 0.0),
            zoom: 10,
        };

        let result = MapHost::start(
            MemoryMap::new(),
            &options,
            FilterState::default(),
            source.clone(),
            Duration::from_secs(60),
        );

        assert!(matches!(result, Err(EventMapError::MapInit(_))));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected() {
        let result = MapHost::start(
            MemoryMap::new(),
            &MapOptions::default(),
            FilterState::default(),
            CountingSource::default(),
            Duration::ZERO,
        );
        assert!(matches!(result, Err(EventMapError::Config(_))));
    }

    #[tokio::test]
    async fn test_fetches_immediately_and_handles_commands() {
        let source = CountingSource::default();
        let (host, handle) = MapHost::start(
            MemoryMap::new(),
            &MapOptions::default(),
            FilterState::default(),
            source.clone(),
            Duration::from_secs(3600),
        )
        .unwrap();
        let task = tokio::spawn(host.run());

        // Refresh is queued behind (or races with) the immediate tick; either
        // way at least one fetch has completed once it returns.
        let report = handle.refresh().await.unwrap();
        assert_eq!(report.placed, 1);

        let report = handle.set_weekday("Monday").await.unwrap();
        assert_eq!(report.placed, 0);

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.events, 1);
        assert_eq!(snapshot.markers, 0);
        assert_eq!(snapshot.weekday, "Monday");

        handle.set_weekday("all").await.unwrap();
        handle.shutdown().await.unwrap();
        let state = task.await.unwrap();

        assert_eq!(state.surface().marker_count(), 1);
        assert!(source.calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_click_through_handle() {
        let (host, handle) = MapHost::start(
            MemoryMap::new(),
            &MapOptions::default(),
            FilterState::default(),
            CountingSource::default(),
            Duration::from_secs(3600),
        )
        .unwrap();
        let task = tokio::spawn(host.run());

        handle.refresh().await.unwrap();
        let state_markers = handle.snapshot().await.unwrap().markers;
        assert_eq!(state_markers, 1);

        assert!(handle.click(MarkerId(9999)).await.unwrap().is_none());

        drop(handle);
        let state = task.await.unwrap();
        let id = state.renderer().markers()[0].id;
        assert_eq!(state.surface().marker(id).unwrap().title, "Picnic");
    }

    #[tokio::test]
    async fn test_handle_reports_stopped_host() {
        let (host, handle) = MapHost::start(
            MemoryMap::new(),
            &MapOptions::default(),
            FilterState::default(),
            CountingSource::default(),
            Duration::from_secs(3600),
        )
        .unwrap();
        drop(host);

        assert!(matches!(
            handle.snapshot().await,
            Err(EventMapError::HostStopped)
        ));
    }
}
