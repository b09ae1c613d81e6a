//! Default holiday calendars for the dayoff service.
//!
//! The calendar is the fallback answer when a user has no active override for
//! a day. This crate defines the [`HolidayCalendar`] contract and a
//! table-driven implementation of the mainland China public holiday schedule,
//! which shifts weekend days around statutory holidays every year.

pub mod china;
pub mod error;
pub mod table;

pub use china::ChinaCalendar;
pub use error::{CalendarError, CalendarResult};
pub use table::{YearTable, YearTableFile};

use time::{Date, Weekday};

/// Source of default day-off answers, independent of any user.
pub trait HolidayCalendar: Send + Sync {
    /// Calendar name for logs.
    fn name(&self) -> &str;

    /// Whether `date` is a day off.
    ///
    /// Implementations return an error rather than guessing when they have
    /// no data for the date.
    fn is_holiday(&self, date: Date) -> CalendarResult<bool>;
}

/// Whether a date falls on Saturday or Sunday.
pub fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}
