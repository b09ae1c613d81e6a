//! Service endpoints: greeting and health.

use crate::error::ApiResult;
use crate::negotiate::{Outcome, Representation};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::response::Response;
use dayoff_metadata::MetadataStore;
use serde::Serialize;

/// GET / - Greeting.
pub async fn index(representation: Representation) -> Response {
    representation.respond(Ok(Outcome::Greeting))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub calendar: String,
}

/// GET /v1/health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    // Check metadata store connectivity
    state.metadata.health_check().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        calendar: state.calendar.name().to_string(),
    }))
}
