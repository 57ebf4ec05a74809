use axum::{http::StatusCode, response::IntoResponse, Json, Router};
use serde::Serialize;

use crate::{SharedHistory, WeatherProvider};

mod health;
mod recent;
mod weather;

// ---

/// State shared by every route: the provider client and the history handle.
pub type AppState = (WeatherProvider, SharedHistory);

pub fn router(provider: WeatherProvider, history: SharedHistory) -> Router {
    // ---
    Router::new()
        .merge(weather::router())
        .merge(recent::router())
        .merge(health::router())
        .fallback(not_found)
        .with_state((provider, history))
}

// ---

/// JSON error body shared by every route that can fail.
#[derive(Serialize)]
pub(crate) struct ErrorBody {
    error: String,
}

impl ErrorBody {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// The dashboard frontend owns every other path; anything else is a miss.
async fn not_found() -> impl IntoResponse {
    // ---
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new("resource not found")),
    )
}
