//! Core library for eventmap.
//!
//! eventmap shows events from a JSON feed as markers on a map:
//! - `fetch` requests the feed and `store` keeps the last good event list
//! - `filter` narrows it down by weekday
//! - `render` reconciles the markers on a [`map::MapSurface`]
//! - `host` ties these together behind a refresh timer and a command channel

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod fetch;
pub mod filter;
pub mod geo;
pub mod host;
pub mod map;
pub mod panel;
pub mod render;
pub mod store;

pub use error::{EventMapError, EventMapResult};
pub use event::{Event, RawCoordinate};
pub use geo::LatLng;
