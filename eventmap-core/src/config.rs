//! eventmap configuration.
//!
//! Read from `~/.config/eventmap/config.toml` (platform equivalent), with
//! `EVENTMAP_*` environment variables taking precedence. Every key is
//! optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EventMapError, EventMapResult};
use crate::filter::{ALL_WEEKDAYS, FilterState, WeekdayFilter};
use crate::geo::LatLng;
use crate::map::{DEFAULT_CENTER, DEFAULT_ZOOM, MapOptions};

static DEFAULT_FEED_URL: &str = "https://script.google.com/macros/s/AKfycbyEPikMZ0IYuMbhMG2SX7vPJSUtCKHQ2URTE3fK_TnTpHc6Qo4CcdqZW_1PriKlk8U3/exec";
static DEFAULT_REFRESH_INTERVAL: &str = "60m";
static DEFAULT_REQUEST_TIMEOUT: &str = "30s";

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_refresh_interval() -> String {
    DEFAULT_REFRESH_INTERVAL.to_string()
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_center_lat() -> f64 {
    DEFAULT_CENTER.lat
}

fn default_center_lng() -> f64 {
    DEFAULT_CENTER.lng
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

fn default_weekday() -> String {
    ALL_WEEKDAYS.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EventMapConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// How often to re-fetch the feed (humantime, e.g. "60m")
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Initial weekday selector value
    #[serde(default = "default_weekday")]
    pub weekday: String,
}

impl Default for EventMapConfig {
    fn default() -> Self {
        EventMapConfig {
            feed_url: default_feed_url(),
            refresh_interval: default_refresh_interval(),
            request_timeout: default_request_timeout(),
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            weekday: default_weekday(),
        }
    }
}

impl EventMapConfig {
    pub fn config_path() -> EventMapResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventMapError::Config("Could not determine config directory".into()))?
            .join("eventmap");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config file
    /// on first run.
    pub fn load() -> EventMapResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing), then apply `EVENTMAP_*`
    /// environment overrides.
    pub fn load_from(path: &Path) -> EventMapResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("EVENTMAP").try_parsing(true))
            .build()
            .map_err(|e| EventMapError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventMapError::Config(e.to_string()))
    }

    pub fn refresh_interval(&self) -> EventMapResult<Duration> {
        parse_duration("refresh_interval", &self.refresh_interval)
    }

    pub fn request_timeout(&self) -> EventMapResult<Duration> {
        parse_duration("request_timeout", &self.request_timeout)
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            center: LatLng::new(self.center_lat, self.center_lng),
            zoom: self.zoom,
        }
    }

    pub fn filter_state(&self) -> FilterState {
        FilterState::new(WeekdayFilter::from_selector(&self.weekday))
    }

    /// Effective configuration as TOML.
    pub fn to_toml(&self) -> EventMapResult<String> {
        toml::to_string_pretty(self).map_err(|e| EventMapError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventMapResult<()> {
        let contents = format!(
            "\
# eventmap configuration

# Where events are fetched from:
# feed_url = \"{}\"

# How often to re-fetch the feed:
# refresh_interval = \"{}\"
# request_timeout = \"{}\"

# Initial map view:
# center_lat = {}
# center_lng = {}
# zoom = {}

# Initial weekday filter (\"all\" or a weekday name as it appears in the feed):
# weekday = \"{}\"
",
            DEFAULT_FEED_URL,
            DEFAULT_REFRESH_INTERVAL,
            DEFAULT_REQUEST_TIMEOUT,
            DEFAULT_CENTER.lat,
            DEFAULT_CENTER.lng,
            DEFAULT_ZOOM,
            ALL_WEEKDAYS,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventMapError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventMapError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Parse a humantime duration, rejecting zero.
fn parse_duration(key: &str, value: &str) -> EventMapResult<Duration> {
    let duration = humantime::parse_duration(value)
        .map_err(|e| EventMapError::Config(format!("Invalid {key} '{value}': {e}")))?;
    if duration.is_zero() {
        return Err(EventMapError::Config(format!(
            "{key} must be greater than zero"
        )));
    }
    Ok(duration)
}
