//! Database models mapping to the metadata schema.

use dayoff_core::{DayKey, OverrideStatus};
use sqlx::FromRow;
use time::OffsetDateTime;

// =============================================================================
// Users
// =============================================================================

/// User record. Only the SHA-256 digest of the token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub username: String,
    pub token_hash: String,
    pub created_at: OffsetDateTime,
}

// =============================================================================
// Overrides
// =============================================================================

/// Override record as stored.
#[derive(Debug, Clone, FromRow)]
pub struct OverrideRow {
    pub username: String,
    pub day: String,
    pub status: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl OverrideRow {
    /// Decode the stored day key.
    pub fn day_key(&self) -> Result<DayKey, dayoff_core::Error> {
        DayKey::parse(&self.day)
    }

    /// Decode the stored status code.
    pub fn override_status(&self) -> Result<OverrideStatus, dayoff_core::Error> {
        OverrideStatus::from_code(self.status)
    }
}

/// Result of writing an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; one was inserted.
    Created,
    /// A record with a different status was updated.
    Updated,
    /// The record already had this status; nothing was written.
    Unchanged,
}

impl UpsertOutcome {
    /// Get the string representation (used as a metrics label).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}
