//! Usernames and their validation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The bootstrap identity whose token authorizes registration.
pub const ROOT_USERNAME: &str = "root";

/// Path words that cannot be registered because they shadow a route.
const RESERVED_USERNAMES: &[&str] = &["register"];

/// A validated username.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate a username used to identify an existing account.
    ///
    /// `root` is always accepted. Any other name must be between
    /// [`MIN_USERNAME_LEN`](crate::MIN_USERNAME_LEN) and
    /// [`MAX_USERNAME_LEN`](crate::MAX_USERNAME_LEN) characters long.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s == ROOT_USERNAME {
            return Ok(Self::root());
        }
        let len = s.chars().count();
        if !(crate::MIN_USERNAME_LEN..=crate::MAX_USERNAME_LEN).contains(&len) {
            return Err(crate::Error::InvalidUsername {
                min: crate::MIN_USERNAME_LEN,
                max: crate::MAX_USERNAME_LEN,
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Validate a username that is about to be registered.
    ///
    /// Applies the length rules of [`Username::parse`] and additionally
    /// rejects names that would be unreachable through the HTTP routes.
    pub fn parse_new(s: &str) -> crate::Result<Self> {
        let username = Self::parse(s)?;
        if RESERVED_USERNAMES.contains(&username.as_str()) {
            return Err(crate::Error::ReservedUsername(s.to_string()));
        }
        Ok(username)
    }

    /// The root identity.
    pub fn root() -> Self {
        Self(ROOT_USERNAME.to_string())
    }

    /// Whether this is the root identity.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_USERNAME
    }

    /// Get the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
