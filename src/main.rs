//! Application entry point for the `weatherdash-relay` backend service.
//!
//! This binary orchestrates the full startup sequence for the weather
//! dashboard relay, including:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Loading the recent-search history from disk
//! - Constructing the weather provider client (the credential stays
//!   server-side; the dashboard frontend only ever talks to this relay)
//! - Mounting all API routes via the `routes` gateway
//! - Binding the Axum HTTP server and serving requests
//!
//! # Environment Variables
//! - `OPEN_WEATHER_MAP_API` (**required**) – weather provider API key
//! - `WEATHER_API_BASE` (optional) – provider base URL
//! - `WEATHER_UNITS` (optional) – provider units (default: `metric`)
//! - `GEO_SEARCH_LIMIT` (optional) – geocoding match limit (default: 1)
//! - `HISTORY_LIMIT` (optional) – recent-search cap (default: 5)
//! - `HISTORY_PATH` (optional) – history file location
//! - `PORT` (optional) – listen port (default: 3000)
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
use std::{env, io::IsTerminal, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use tokio::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

mod config;
mod forecast;
mod history;
mod models;
mod provider;
mod routes;

pub use config::Config;

// These are not used here but they are imported to be used by routes/*.rs, that way
// refactoring is easier since routes/*.rs do not have knowledge of the sibling
// modules, only of their parent module (main.rs)
pub use history::SharedHistory;
pub use provider::WeatherProvider;

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let history_path = PathBuf::from(&cfg.history_path);
    if let Some(parent) = history_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let store = history::SearchHistory::load(history_path, cfg.history_limit as usize).await;
    tracing::info!("Search history loaded with {} entries", store.cities().len());
    let shared: SharedHistory = Arc::new(Mutex::new(store));

    let provider = WeatherProvider::new(&cfg);

    // Build app from routes gateway
    let app: Router = routes::router(provider, shared);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `AXUM_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by the `AXUM_LOG_LEVEL` env var
///
/// This should be called once at application startup before any logging
/// or tracing macros are invoked. It installs the subscriber globally
/// for the lifetime of the process.
fn init_tracing() {
    // ---
    let span_events = match env::var("AXUM_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    // Determine if we should use colors
    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to AXUM_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AXUM_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        // Keep hyper's connection chatter out of debug runs
        EnvFilter::new(format!("{level},hyper=info"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
