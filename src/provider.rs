//! HTTP client for the weather provider's three endpoints: geocoding,
//! 5-day/3-hour forecast, and current conditions.
//!
//! The relay owns the provider credential; the dashboard frontend never
//! sees it. Failures are typed so the route layer can answer an unknown
//! city differently from a provider outage or a rejected key.

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::models::{CurrentResponse, ForecastEntry, ForecastResponse, GeoResult, Location};
use crate::Config;

// ---

#[derive(Debug, Error)]
pub enum ProviderError {
    // ---
    #[error("no geocoding match for city '{0}'")]
    CityNotFound(String),

    /// Non-success status from the provider, typically a rejected API key.
    #[error("weather provider rejected the request with status {0}")]
    Rejected(StatusCode),

    #[error("weather provider request failed")]
    Transport(#[from] reqwest::Error),
}

/// Client for the provider API, cheap to clone across handlers.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    // ---
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
    search_limit: u32,
}

impl WeatherProvider {
    // ---
    pub fn new(config: &Config) -> Self {
        // ---
        WeatherProvider {
            client: Client::new(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
            search_limit: config.search_limit,
        }
    }

    /// Resolve a free-text city name to coordinates, taking the first match.
    /// Ambiguous names are not disambiguated.
    pub async fn geocode(&self, city: &str) -> Result<Location, ProviderError> {
        // ---
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let limit = self.search_limit.to_string();

        debug!("geocoding '{}'", city);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let matches: Vec<GeoResult> = check_status(response)?.json().await?;
        matches
            .into_iter()
            .next()
            .map(Location::from)
            .ok_or_else(|| ProviderError::CityNotFound(city.to_string()))
    }

    /// Fetch the 3-hourly forecast feed (~40 entries over 5 days).
    pub async fn forecast(&self, location: &Location) -> Result<Vec<ForecastEntry>, ProviderError> {
        // ---
        let url = format!("{}/data/2.5/forecast", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&self.coordinate_query(location))
            .send()
            .await?;

        let body: ForecastResponse = check_status(response)?.json().await?;
        debug!(
            "forecast for ({}, {}) returned {} entries",
            location.lat,
            location.lon,
            body.list.len()
        );
        Ok(body.list)
    }

    /// Fetch the single current-conditions reading.
    pub async fn current(&self, location: &Location) -> Result<CurrentResponse, ProviderError> {
        // ---
        let url = format!("{}/data/2.5/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&self.coordinate_query(location))
            .send()
            .await?;

        Ok(check_status(response)?.json().await?)
    }

    fn coordinate_query(&self, location: &Location) -> [(&'static str, String); 4] {
        // ---
        [
            ("lat", location.lat.to_string()),
            ("lon", location.lon.to_string()),
            ("units", self.units.clone()),
            ("appid", self.api_key.clone()),
        ]
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    // ---
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ProviderError::Rejected(response.status()))
    }
}
