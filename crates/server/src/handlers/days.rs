//! Per-user day endpoints: lookup, override and override listing.

use crate::auth::Credentials;
use crate::error::{ApiError, ApiResult};
use crate::negotiate::{Outcome, Representation};
use crate::resolution;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

/// Query parameters of an override write.
#[derive(Debug, Deserialize)]
pub struct OverrideParams {
    /// `0` (force workday), `1` (force holiday) or `-1` (void).
    pub status: Option<String>,
}

/// GET /{username}/{date} - Is the day off for the user?
pub async fn lookup_day(
    State(state): State<AppState>,
    representation: Representation,
    credentials: Credentials,
    Path((username, date)): Path<(String, String)>,
) -> Response {
    let result = resolution::resolve(
        state.metadata.as_ref(),
        state.calendar.as_ref(),
        &username,
        &credentials,
        &date,
    )
    .await
    .map(Outcome::Resolved);
    representation.respond(result)
}

/// PUT /{username}/{date}?status= - Set the user's override for the day.
pub async fn put_override(
    State(state): State<AppState>,
    representation: Representation,
    credentials: Credentials,
    Path((username, date)): Path<(String, String)>,
    params: Result<Query<OverrideParams>, QueryRejection>,
) -> Response {
    let result: ApiResult<Outcome> = async {
        let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let (status, outcome) = resolution::set_override(
            state.metadata.as_ref(),
            &username,
            &credentials,
            &date,
            params.status.as_deref(),
        )
        .await?;
        Ok(Outcome::OverrideSet { status, outcome })
    }
    .await;
    representation.respond(result)
}

/// GET /{username}/overrides - List the user's overrides.
pub async fn list_overrides(
    State(state): State<AppState>,
    representation: Representation,
    credentials: Credentials,
    Path(username): Path<String>,
) -> Response {
    let result = resolution::list_overrides(state.metadata.as_ref(), &username, &credentials)
        .await
        .map(Outcome::Overrides);
    representation.respond(result)
}
