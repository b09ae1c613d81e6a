//! Override repository.

use crate::error::MetadataResult;
use crate::models::{OverrideRow, UpsertOutcome};
use async_trait::async_trait;
use dayoff_core::{DayKey, OverrideStatus};
use time::OffsetDateTime;

/// Repository for per-user, per-day overrides.
#[async_trait]
pub trait OverrideRepo: Send + Sync {
    /// Get the override record for a user and day, VOID records included.
    async fn get_override(&self, username: &str, day: &DayKey)
    -> MetadataResult<Option<OverrideRow>>;

    /// Create, update or leave alone the record for (username, day).
    ///
    /// Runs as one transaction, so concurrent writers for the same key never
    /// produce two rows or a lost update.
    async fn upsert_override(
        &self,
        username: &str,
        day: &DayKey,
        status: OverrideStatus,
        now: OffsetDateTime,
    ) -> MetadataResult<UpsertOutcome>;

    /// List every record for a user ordered by day.
    async fn list_overrides(&self, username: &str) -> MetadataResult<Vec<OverrideRow>>;
}
