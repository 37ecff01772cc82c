//! Requests the event feed.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::{EventMapError, EventMapResult};
use crate::event::Event;
use crate::feed::FeedPayload;

/// Something that can produce the full event list.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> EventMapResult<Vec<Event>>;
}

/// HTTP client for the feed endpoint.
pub struct Fetcher {
    http: reqwest::Client,
    url: String,
}

impl Fetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> EventMapResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EventMapError::Config(format!("Could not build HTTP client: {e}")))?;

        Ok(Fetcher {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for Fetcher {
    /// GET the feed once. Non-OK statuses, unreadable bodies and
    /// feed-reported errors all come back as errors.
    async fn fetch(&self) -> EventMapResult<Vec<Event>> {
        info!(url = %self.url, "Fetching events...");

        let resp = self.http.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EventMapError::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let body = resp.text().await?;
        let payload = FeedPayload::parse(&body)?;
        if let FeedPayload::Events { rejected, .. } = &payload {
            if !rejected.is_empty() {
                warn!(
                    rejected = rejected.len(),
                    "Some feed entries could not be read and were dropped"
                );
            }
        }
        let events = payload.into_events()?;

        info!(count = events.len(), "All events fetched/updated");
        Ok(events)
    }
}

/// Log a failed fetch with whatever detail the error carries.
pub fn log_fetch_error(err: &EventMapError) {
    match err {
        EventMapError::Transport {
            status,
            status_text,
            body,
        } => {
            error!(status, status_text = %status_text, "Error fetching events");
            error!(details = %body, "Error details");
        }
        EventMapError::Payload(msg) => {
            error!(error = %msg, "Error from feed");
        }
        other => {
            error!(error = %other, "Failed to fetch or process events");
        }
    }
}
