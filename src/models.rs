//! Wire types for the weather provider plus the relay's own records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---

/// One geocoding match from `/geo/1.0/direct`.
#[derive(Debug, Deserialize)]
pub struct GeoResult {
    // ---
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub state: Option<String>,
}

/// Resolved coordinates for a searched city, echoed back to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    // ---
    pub name: String,
    pub region: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl From<GeoResult> for Location {
    fn from(geo: GeoResult) -> Self {
        // ---
        Location {
            name: geo.name,
            region: geo.state,
            lat: geo.lat,
            lon: geo.lon,
        }
    }
}

// ---

/// Envelope of `/data/2.5/forecast`: ~40 three-hourly entries over 5 days.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    // ---
    pub list: Vec<ForecastEntry>,
}

/// One three-hourly forecast entry as the provider ships it.
#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    // ---
    /// Source-local timestamp, e.g. "2023-11-20 18:00:00".
    #[serde(rename = "dt_txt", deserialize_with = "provider_timestamp::deserialize")]
    pub timestamp: NaiveDateTime,
    pub main: MainReading,
    pub wind: WindReading,
    pub weather: Vec<ConditionTag>,
}

#[derive(Debug, Deserialize)]
pub struct MainReading {
    // ---
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct WindReading {
    // ---
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionTag {
    // ---
    /// Condition category, e.g. "Rain" or "Clouds".
    pub main: String,
    /// Provider icon code, e.g. "09d".
    #[serde(default)]
    pub icon: String,
}

/// Flattened observation consumed by the forecast aggregation.
#[derive(Debug, Clone)]
pub struct Observation {
    // ---
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: String,
}

impl ForecastEntry {
    // ---
    pub fn to_observation(&self) -> Observation {
        // ---
        // The provider always sends at least one weather tag; an empty
        // category simply never wins the icon vote if it does not.
        let condition = self
            .weather
            .first()
            .map(|tag| tag.main.clone())
            .unwrap_or_default();

        Observation {
            timestamp: self.timestamp,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            condition,
        }
    }
}

// ---

/// Raw `/data/2.5/weather` payload for current conditions.
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    // ---
    pub main: MainReading,
    pub wind: WindReading,
    pub weather: Vec<ConditionTag>,
}

/// Current conditions as served to the dashboard's main card.
#[derive(Debug, Serialize)]
pub struct CurrentReport {
    // ---
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: String,
    pub icon: String,
}

impl CurrentResponse {
    // ---
    pub fn to_report(&self) -> CurrentReport {
        // ---
        let tag = self.weather.first().cloned().unwrap_or(ConditionTag {
            main: String::new(),
            icon: String::new(),
        });

        CurrentReport {
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            condition: tag.main,
            icon: tag.icon,
        }
    }
}

// ---

/// The provider's `dt_txt` field is space-separated local time, which plain
/// chrono serde (ISO-8601 with `T`) rejects.
mod provider_timestamp {
    // ---
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        // ---
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
