//! Calendar days in the `yyyyMMdd` wire form.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, Month};

/// A day key: eight ASCII digits starting with `20`.
///
/// A `DayKey` is only guaranteed to be well-formed, not to name a real date.
/// Use [`DayKey::to_date`] to check the calendar value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(String);

impl DayKey {
    /// Check the `^20\d{6}$` shape without interpreting the date.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let well_formed =
            s.len() == 8 && s.starts_with("20") && s.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(crate::Error::InvalidDateFormat);
        }
        Ok(Self(s.to_string()))
    }

    /// Check both the shape and the calendar value.
    pub fn parse_date(s: &str) -> crate::Result<(Self, Date)> {
        let key = Self::parse(s)?;
        let date = key.to_date()?;
        Ok((key, date))
    }

    /// Interpret the key as a calendar date.
    pub fn to_date(&self) -> crate::Result<Date> {
        // The shape check guarantees eight ASCII digits.
        let digits = self.0.as_bytes();
        let number = |range: std::ops::Range<usize>| {
            digits[range]
                .iter()
                .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
        };
        let year = number(0..4) as i32;
        let month = Month::try_from(number(4..6) as u8).map_err(|_| crate::Error::InvalidDate)?;
        let day = number(6..8) as u8;
        Date::from_calendar_date(year, month, day).map_err(|_| crate::Error::InvalidDate)
    }

    /// Build the key for a date in the 2000–2099 range.
    pub fn from_date(date: Date) -> crate::Result<Self> {
        let key = format!(
            "{:04}{:02}{:02}",
            date.year(),
            u8::from(date.month()),
            date.day()
        );
        Self::parse(&key)
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DayKey {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::parse(&value)
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.0
    }
}
