//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
///
/// Every variant is a validation failure detected at the boundary, before any
/// state is touched. The display strings are part of the HTTP contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("username length must be between {min} and {max}")]
    InvalidUsername { min: usize, max: usize },

    #[error("username is reserved: {0}")]
    ReservedUsername(String),

    #[error("date format error, expect yyyyMMdd")]
    InvalidDateFormat,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid status, expect one of 0, 1, -1")]
    InvalidStatus,
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
