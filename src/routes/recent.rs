//! Recent-search listing backing the dashboard's quick-repeat buttons.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

// ---

pub fn router() -> Router<super::AppState> {
    // ---
    Router::new().route("/history", get(handler))
}

/// JSON response body for the `/history` endpoint, oldest search first.
#[derive(Serialize)]
struct HistoryResponse {
    cities: Vec<String>,
}

async fn handler(State((_, history)): State<super::AppState>) -> Json<HistoryResponse> {
    // ---
    let history = history.lock().await;
    Json(HistoryResponse {
        cities: history.cities().to_vec(),
    })
}
