//! Day resolution and override management.
//!
//! A user's active override (force-workday or force-holiday) shadows the
//! default calendar. Void overrides are kept as tombstones and read as
//! "no override".

use crate::auth::{Credentials, authorize};
use crate::error::{ApiError, ApiResult};
use dayoff_calendar::HolidayCalendar;
use dayoff_core::{DayKey, OverrideStatus, Username};
use dayoff_metadata::MetadataStore;
use dayoff_metadata::models::UpsertOutcome;
use dayoff_metadata::repos::OverrideRepo;
use serde::Serialize;
use time::{Date, OffsetDateTime};

/// Where a resolved answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    Override,
    Calendar,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Calendar => "calendar",
        }
    }
}

/// Answer to "is this day off for this user?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub is_holiday: bool,
    pub source: ResolutionSource,
}

/// One stored override, as reported to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideEntry {
    pub day: DayKey,
    pub status: OverrideStatus,
}

/// Resolve `date` for `username`.
///
/// Date format and validity are checked before authorization.
pub async fn resolve(
    store: &dyn MetadataStore,
    calendar: &dyn HolidayCalendar,
    username: &str,
    credentials: &Credentials,
    date: &str,
) -> ApiResult<Resolution> {
    let (day, date) = DayKey::parse_date(date)?;
    let username = authorize(store, username, credentials).await?;

    let resolution = resolve_day(store, calendar, &username, &day, date).await?;
    crate::metrics::record_lookup(resolution.source.as_str());
    tracing::debug!(
        username = %username,
        day = %day,
        is_holiday = resolution.is_holiday,
        source = resolution.source.as_str(),
        "Day resolved"
    );
    Ok(resolution)
}

/// Resolve an already validated day for an authorized user.
pub async fn resolve_day(
    store: &dyn MetadataStore,
    calendar: &dyn HolidayCalendar,
    username: &Username,
    day: &DayKey,
    date: Date,
) -> ApiResult<Resolution> {
    let forced = match store.get_override(username.as_str(), day).await? {
        Some(row) => row
            .override_status()
            .map_err(ApiError::internal)?
            .forced_holiday(),
        None => None,
    };

    if let Some(is_holiday) = forced {
        return Ok(Resolution {
            is_holiday,
            source: ResolutionSource::Override,
        });
    }

    let is_holiday = calendar.is_holiday(date).map_err(|e| {
        crate::metrics::CALENDAR_FAILURES.inc();
        tracing::error!(calendar = calendar.name(), day = %day, error = %e, "Calendar lookup failed");
        ApiError::from(e)
    })?;

    Ok(Resolution {
        is_holiday,
        source: ResolutionSource::Calendar,
    })
}

/// Set the override for `username` on `date` to `status`.
///
/// Only the date format is checked; the day is not required to exist on the
/// calendar. A missing status is invalid. Store failures are reported as bad
/// requests.
pub async fn set_override(
    store: &dyn MetadataStore,
    username: &str,
    credentials: &Credentials,
    date: &str,
    status: Option<&str>,
) -> ApiResult<(OverrideStatus, UpsertOutcome)> {
    let day = DayKey::parse(date)?;
    let status = OverrideStatus::parse(status.unwrap_or_default())?;
    let username = authorize(store, username, credentials).await?;

    let outcome = store
        .upsert_override(username.as_str(), &day, status, OffsetDateTime::now_utc())
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    crate::metrics::record_override_write(outcome.as_str());
    tracing::info!(
        username = %username,
        day = %day,
        status = %status,
        outcome = outcome.as_str(),
        "Override set"
    );
    Ok((status, outcome))
}

/// List every override of `username`, void ones included, ordered by day.
pub async fn list_overrides(
    store: &dyn MetadataStore,
    username: &str,
    credentials: &Credentials,
) -> ApiResult<Vec<OverrideEntry>> {
    let username = authorize(store, username, credentials).await?;

    store
        .list_overrides(username.as_str())
        .await?
        .into_iter()
        .map(|row| {
            Ok(OverrideEntry {
                day: row.day_key().map_err(ApiError::internal)?,
                status: row.override_status().map_err(ApiError::internal)?,
            })
        })
        .collect()
}
