//! Core domain types and shared logic for the dayoff service.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Usernames and their length rules
//! - Calendar days in the `yyyyMMdd` wire form
//! - Per-user override statuses
//! - Access token generation
//! - Application configuration

pub mod config;
pub mod day;
pub mod error;
pub mod status;
pub mod token;
pub mod username;

pub use day::DayKey;
pub use error::{Error, Result};
pub use status::OverrideStatus;
pub use token::AccessToken;
pub use username::{ROOT_USERNAME, Username};

/// Minimum length of a non-root username.
pub const MIN_USERNAME_LEN: usize = 4;

/// Maximum length of any username.
pub const MAX_USERNAME_LEN: usize = 16;

/// Length of a generated access token.
pub const TOKEN_LEN: usize = 22;
