use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse,
    response::Response, routing::get, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::forecast::{daily_forecast, DailySummary};
use crate::models::{CurrentReport, ForecastEntry, Location, Observation};
use crate::provider::ProviderError;

use super::ErrorBody;

// ---

pub fn router() -> Router<super::AppState> {
    // ---
    Router::new().route("/weather", get(handler))
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    city: Option<String>,
}

/// Everything the dashboard needs for one searched city: the main card,
/// plus one entry per forecast card.
#[derive(Serialize)]
struct WeatherEnvelope {
    city: Location,
    current: CurrentReport,
    forecast: Vec<DailySummary>,
}

async fn handler(
    Query(params): Query<WeatherQuery>,
    State((provider, history)): State<super::AppState>,
) -> Response {
    // ---
    let Some(city) = params
        .city
        .as_deref()
        .map(str::trim)
        .filter(|city| !city.is_empty())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("missing 'city' query parameter")),
        )
            .into_response();
    };

    info!("GET /weather - searching '{city}'");

    // Step 1: resolve the city to coordinates.
    let location = match provider.geocode(city).await {
        Ok(location) => location,
        Err(err) => return provider_failure(err),
    };
    debug!(
        "GET /weather - '{city}' resolved to ({}, {})",
        location.lat, location.lon
    );

    // Step 2: current conditions and the forecast feed, concurrently.
    let lookups = tokio::join!(provider.current(&location), provider.forecast(&location));
    let (current, entries) = match lookups {
        (Ok(current), Ok(entries)) => (current, entries),
        (Err(err), _) | (_, Err(err)) => return provider_failure(err),
    };

    // Step 3: fold the feed into daily cards. An empty result is a valid
    // outcome (feed entirely inside today); the dashboard renders it as
    // "no forecast available".
    let observations: Vec<Observation> =
        entries.iter().map(ForecastEntry::to_observation).collect();
    let forecast = daily_forecast(&observations);

    // Step 4: remember the search, now that every lookup has succeeded. A
    // failed write keeps the in-memory list usable, so the response still
    // goes out.
    {
        let mut history = history.lock().await;
        if history.record(&location.name) {
            if let Err(err) = history.persist().await {
                error!("failed to persist search history: {err:#}");
            }
        }
    }

    info!(
        "GET /weather - returning {} forecast day(s) for '{}'",
        forecast.len(),
        location.name
    );
    (
        StatusCode::OK,
        Json(WeatherEnvelope {
            city: location,
            current: current.to_report(),
            forecast,
        }),
    )
        .into_response()
}

/// Map a provider failure to a client-distinguishable status. The search is
/// abandoned here; history and any cards the dashboard already shows stay
/// untouched.
fn provider_failure(err: ProviderError) -> Response {
    // ---
    let status = match &err {
        ProviderError::CityNotFound(_) => StatusCode::NOT_FOUND,
        ProviderError::Rejected(_) | ProviderError::Transport(_) => StatusCode::BAD_GATEWAY,
    };

    error!("GET /weather - {err}");
    (status, Json(ErrorBody::new(err.to_string()))).into_response()
}
