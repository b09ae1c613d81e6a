//! Per-user override statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a per-user, per-day override.
///
/// `Void` is a tombstone: the record stays in place but lookups behave as if
/// no override existed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OverrideStatus {
    /// The day is a workday for this user regardless of the calendar.
    ForceWorkday,
    /// The day is a day off for this user regardless of the calendar.
    ForceHoliday,
    /// No active override.
    Void,
}

impl OverrideStatus {
    /// Parse from the stored integer code.
    pub fn from_code(code: i64) -> crate::Result<Self> {
        match code {
            0 => Ok(Self::ForceWorkday),
            1 => Ok(Self::ForceHoliday),
            -1 => Ok(Self::Void),
            _ => Err(crate::Error::InvalidStatus),
        }
    }

    /// Parse from the wire form (`"0"`, `"1"` or `"-1"`).
    pub fn parse(s: &str) -> crate::Result<Self> {
        let code: i64 = s.trim().parse().map_err(|_| crate::Error::InvalidStatus)?;
        Self::from_code(code)
    }

    /// Get the integer code.
    pub fn code(&self) -> i64 {
        match self {
            Self::ForceWorkday => 0,
            Self::ForceHoliday => 1,
            Self::Void => -1,
        }
    }

    /// The forced answer, or `None` when the calendar decides.
    pub fn forced_holiday(&self) -> Option<bool> {
        match self {
            Self::ForceWorkday => Some(false),
            Self::ForceHoliday => Some(true),
            Self::Void => None,
        }
    }
}

impl fmt::Display for OverrideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl TryFrom<i64> for OverrideStatus {
    type Error = crate::Error;

    fn try_from(code: i64) -> crate::Result<Self> {
        Self::from_code(code)
    }
}

impl From<OverrideStatus> for i64 {
    fn from(status: OverrideStatus) -> Self {
        status.code()
    }
}
