//! Configuration loader for the `weatherdash-relay` backend service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). Consolidating the `env::var` calls here
//! keeps the rest of the codebase working from one immutable snapshot that
//! `main` threads through explicitly.
use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Parse an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Weather provider API key.
    pub api_key: String,

    /// Weather provider base URL (overridable so tests can point at a stub).
    pub api_base: String,

    /// Measurement units requested from the provider.
    pub units: String,

    /// Maximum geocoding matches requested; only the first is used.
    pub search_limit: u32,

    /// Maximum number of recent searches kept in the history.
    pub history_limit: u32,

    /// Path of the history JSON file.
    pub history_path: String,

    /// TCP port the relay listens on.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `OPEN_WEATHER_MAP_API` – weather provider API key
///
/// Optional:
/// - `WEATHER_API_BASE` – provider base URL (default: `https://api.openweathermap.org`)
/// - `WEATHER_UNITS` – provider units (default: `metric`)
/// - `GEO_SEARCH_LIMIT` – geocoding match limit (default: 1)
/// - `HISTORY_LIMIT` – recent-search cap (default: 5)
/// - `HISTORY_PATH` – history file location (default: `data/history.json`)
/// - `PORT` – listen port (default: 3000)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let api_key = require_env!("OPEN_WEATHER_MAP_API");
    let api_base = env_or!("WEATHER_API_BASE", "https://api.openweathermap.org");
    let units = env_or!("WEATHER_UNITS", "metric");
    let search_limit = parse_env_u32!("GEO_SEARCH_LIMIT", 1);
    let history_limit = parse_env_u32!("HISTORY_LIMIT", 5);
    let history_path = env_or!("HISTORY_PATH", "data/history.json");
    let port = u16::try_from(parse_env_u32!("PORT", 3000))
        .map_err(|_| anyhow!("PORT must fit in 16 bits"))?;

    Ok(Config {
        api_key,
        api_base,
        units,
        search_limit,
        history_limit,
        history_path,
        port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the provider credential while showing all configuration values
    /// that were loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  OPEN_WEATHER_MAP_API : {}", mask_key(&self.api_key));
        tracing::info!("  WEATHER_API_BASE     : {}", self.api_base);
        tracing::info!("  WEATHER_UNITS        : {}", self.units);
        tracing::info!("  GEO_SEARCH_LIMIT     : {}", self.search_limit);
        tracing::info!("  HISTORY_LIMIT        : {}", self.history_limit);
        tracing::info!("  HISTORY_PATH         : {}", self.history_path);
        tracing::info!("  PORT                 : {}", self.port);
    }
}

/// Keep only a short prefix of the credential so logs stay greppable
/// without leaking the key.
fn mask_key(key: &str) -> String {
    // ---
    if key.len() > 4 {
        format!("{}****", &key[..4])
    } else {
        "****".to_string()
    }
}
