//! Registration endpoint.

use crate::auth::Credentials;
use crate::negotiate::{Outcome, Representation};
use crate::registration;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Response;

/// GET|POST /register/{username} - Create a user (root token required).
pub async fn register_user(
    State(state): State<AppState>,
    representation: Representation,
    credentials: Credentials,
    Path(username): Path<String>,
) -> Response {
    let result = registration::register(state.metadata.as_ref(), &credentials, &username)
        .await
        .map(Outcome::Registered);
    representation.respond(result)
}
