//! Liveness endpoint for the relay.
//!
//! `/health` lets deployment tooling and the dashboard's own startup check
//! confirm the relay is up without spending a provider call. Sibling module
//! of the other route files: this file owns the handler, the gateway
//! (`mod.rs`) merges the subrouter.

use axum::{routing::get, Json, Router};
use serde::Serialize;

// ---

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Handle `GET /health`.
///
/// Deliberately lightweight: no provider traffic, no history access.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Create a subrouter containing the `/health` route, generic over the
/// application state so it merges cleanly with the gateway router.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
