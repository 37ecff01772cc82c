//! Status and refresh endpoints

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/refresh", post(refresh))
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub events: usize,
    pub markers: usize,
    pub weekday: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub map_error: Option<String>,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub placed: usize,
    pub skipped: Vec<String>,
}

/// GET /status - Event and marker counts, or the map error if the map never started
async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, AppError> {
    let map_error = state.map().read().error().map(String::from);

    let response = match state.host() {
        Ok(host) => {
            let snapshot = host.snapshot().await?;
            StatusResponse {
                events: snapshot.events,
                markers: snapshot.markers,
                weekday: Some(snapshot.weekday),
                last_updated: snapshot.last_updated,
                map_error,
            }
        }
        Err(_) => StatusResponse {
            events: 0,
            markers: 0,
            weekday: None,
            last_updated: None,
            map_error,
        },
    };

    Ok(Json(response))
}

/// POST /refresh - Fetch the feed now
async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let report = state
        .host()?
        .refresh()
        .await
        .map_err(|e| AppError::bad_gateway(e.to_string()))?;

    Ok(Json(RefreshResponse {
        placed: report.placed,
        skipped: report.skipped.into_iter().map(|s| s.name).collect(),
    }))
}
