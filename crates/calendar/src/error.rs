//! Calendar error types.

use thiserror::Error;

/// Calendar lookup and loading errors.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("no holiday data for year {0}")]
    UnsupportedYear(i32),

    #[error("failed to load calendar data: {0}")]
    Load(String),
}

/// Result type for calendar operations.
pub type CalendarResult<T> = std::result::Result<T, CalendarError>;

impl From<std::io::Error> for CalendarError {
    fn from(e: std::io::Error) -> Self {
        CalendarError::Load(e.to_string())
    }
}

impl From<toml::de::Error> for CalendarError {
    fn from(e: toml::de::Error) -> Self {
        CalendarError::Load(e.to_string())
    }
}
