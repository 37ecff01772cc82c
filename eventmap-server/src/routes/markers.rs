//! Marker and info-panel endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;

use eventmap_core::map::MarkerId;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/markers", get(list_markers))
        .route("/markers/{id}/click", post(click_marker))
}

/// Marker info returned by API
#[derive(Serialize)]
pub struct MarkerInfo {
    pub id: MarkerId,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
}

/// Panel content for a clicked marker
#[derive(Serialize)]
pub struct PanelResponse {
    pub id: MarkerId,
    pub title: String,
    pub html: String,
    pub directions_url: String,
}

/// GET /markers - Markers currently on the map
async fn list_markers(State(state): State<AppState>) -> Json<Vec<MarkerInfo>> {
    let markers = state
        .map()
        .read()
        .markers()
        .into_iter()
        .map(|m| MarkerInfo {
            id: m.id,
            title: m.title,
            lat: m.position.lat,
            lng: m.position.lng,
        })
        .collect();

    Json(markers)
}

/// POST /markers/:id/click - Click a marker, opening and returning its details panel
async fn click_marker(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PanelResponse>, AppError> {
    let id = MarkerId(id);
    let clicked = state
        .host()?
        .click(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Marker not found: {}", id)))?;

    Ok(Json(PanelResponse {
        id,
        title: clicked.panel.title,
        html: clicked.panel.html,
        directions_url: clicked.panel.directions_url,
    }))
}
