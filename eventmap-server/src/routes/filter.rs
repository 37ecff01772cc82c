//! Weekday filter endpoints

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/filter", get(get_filter).put(set_filter))
}

#[derive(Serialize, Deserialize)]
pub struct FilterBody {
    pub weekday: String,
}

/// Result of changing the filter
#[derive(Serialize)]
pub struct FilterResult {
    pub weekday: String,
    pub placed: usize,
    pub skipped: Vec<String>,
}

/// GET /filter - Current weekday selector value
async fn get_filter(State(state): State<AppState>) -> Result<Json<FilterBody>, AppError> {
    let snapshot = state.host()?.snapshot().await?;
    Ok(Json(FilterBody {
        weekday: snapshot.weekday,
    }))
}

/// PUT /filter - Change the weekday selector and re-render
async fn set_filter(
    State(state): State<AppState>,
    Json(body): Json<FilterBody>,
) -> Result<Json<FilterResult>, AppError> {
    let report = state.host()?.set_weekday(body.weekday.clone()).await?;

    Ok(Json(FilterResult {
        weekday: body.weekday,
        placed: report.placed,
        skipped: report.skipped.into_iter().map(|s| s.name).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::routes::app;
    use crate::routes::test_support::{body_to_json, get, running_state, sample_events};

    fn put_filter(weekday: &str) -> Request<Body> {
        Request::put("/filter")
            .header("content-type", "application/json")
            .body(Body::from(format!(r#"{{"weekday":"{}"}}"#, weekday)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_default_filter_is_all() {
        let state = running_state(sample_events()).await;

        let response = app(state).oneshot(get("/filter")).await.unwrap();
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["weekday"], "all");
    }

    #[tokio::test]
    async fn test_changing_weekday_rerenders_markers() {
        let state = running_state(sample_events()).await;
        let router = app(state.clone());

        let response = router.clone().oneshot(put_filter("Monday")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["weekday"], "Monday");
        assert_eq!(json["placed"], 1);
        assert_eq!(json["skipped"][0], "Bad");

        let titles: Vec<_> = state
            .map()
            .read()
            .markers()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Quiz"]);

        let response = router.oneshot(get("/filter")).await.unwrap();
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["weekday"], "Monday");
    }
}
