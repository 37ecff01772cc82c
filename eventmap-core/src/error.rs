//! Error types for eventmap.

use thiserror::Error;

/// Errors that can occur while fetching, filtering or displaying events.
#[derive(Error, Debug)]
pub enum EventMapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed request failed with status {status} {status_text}: {body}")]
    Transport {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Feed request failed: {0}")]
    Network(String),

    #[error("Feed response could not be parsed: {0}")]
    Parse(String),

    #[error("Feed reported an error: {0}")]
    Payload(String),

    #[error("Map failed to initialize: {0}")]
    MapInit(String),

    #[error("Map host is no longer running")]
    HostStopped,
}

impl From<reqwest::Error> for EventMapError {
    fn from(err: reqwest::Error) -> Self {
        EventMapError::Network(err.to_string())
    }
}

/// Result type alias for eventmap operations.
pub type EventMapResult<T> = Result<T, EventMapError>;
