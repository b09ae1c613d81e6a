//! User registration.
//!
//! Only the root identity may mint credentials. A username is claimed by a
//! single insert-if-absent statement, so concurrent registrations of the same
//! name have exactly one winner.

use crate::auth::{Credentials, authorize_root, hash_token};
use crate::error::{ApiError, ApiResult};
use dayoff_core::{AccessToken, Username};
use dayoff_metadata::{MetadataError, MetadataStore};
use dayoff_metadata::models::UserRow;
use dayoff_metadata::repos::UserRepo;
use time::OffsetDateTime;

/// Attempts at finding a token whose digest is not already taken.
const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Register `new_username`, authorized by the root token in `credentials`.
///
/// Returns the new user's token. Name validation runs before the root token
/// is checked.
pub async fn register(
    store: &dyn MetadataStore,
    credentials: &Credentials,
    new_username: &str,
) -> ApiResult<AccessToken> {
    let username = Username::parse_new(new_username)?;
    authorize_root(store, credentials).await?;

    match create_user(store, &username, AccessToken::generate).await? {
        Some(token) => {
            tracing::info!(username = %username, "User registered");
            Ok(token)
        }
        None => {
            crate::metrics::REGISTRATION_CONFLICTS.inc();
            Err(ApiError::Conflict("username already exists".to_string()))
        }
    }
}

/// Create `username` with a fresh token unless the name is taken.
///
/// Returns `Some(token)` when the user was created and `None` when a user
/// with that name already existed. A token whose digest collides with an
/// existing one is regenerated.
pub(crate) async fn create_user(
    store: &dyn MetadataStore,
    username: &Username,
    mut generate: impl FnMut() -> AccessToken,
) -> ApiResult<Option<AccessToken>> {
    for attempt in 1..=MAX_TOKEN_ATTEMPTS {
        let token = generate();
        let row = UserRow {
            username: username.as_str().to_string(),
            token_hash: hash_token(token.as_str()),
            created_at: OffsetDateTime::now_utc(),
        };

        match store.create_user_if_absent(&row).await {
            Ok(true) => {
                crate::metrics::USERS_REGISTERED.inc();
                return Ok(Some(token));
            }
            Ok(false) => return Ok(None),
            Err(MetadataError::Constraint(detail)) => {
                tracing::warn!(
                    username = %username,
                    attempt,
                    detail = %detail,
                    "Generated token collided, retrying"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ApiError::Internal(format!(
        "could not generate a unique token after {MAX_TOKEN_ATTEMPTS} attempts"
    )))
}
