//! User credential repository.

use crate::error::MetadataResult;
use crate::models::UserRow;
use async_trait::async_trait;

/// Repository for user credentials.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert the user unless the username is taken.
    ///
    /// Returns `true` if the row was inserted and `false` if a user with the
    /// same username already existed (the existing row is left untouched).
    /// The check and the insert are a single atomic statement. A token hash
    /// that is already in use yields [`MetadataError::Constraint`].
    ///
    /// [`MetadataError::Constraint`]: crate::MetadataError::Constraint
    async fn create_user_if_absent(&self, user: &UserRow) -> MetadataResult<bool>;

    /// Get a user by username.
    async fn get_user(&self, username: &str) -> MetadataResult<Option<UserRow>>;

    /// Get the user matching both username and token hash.
    async fn find_user_with_token(
        &self,
        username: &str,
        token_hash: &str,
    ) -> MetadataResult<Option<UserRow>>;

    /// Count registered users (root included).
    async fn count_users(&self) -> MetadataResult<u64>;
}
