//! Per-year holiday tables.

use crate::error::{CalendarError, CalendarResult};
use dayoff_core::DayKey;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use time::{Date, Month};

/// Statutory holidays and shifted workdays for one year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearTable {
    pub year: i32,
    /// Days off, including weekend days that fall inside a holiday block.
    pub holidays: BTreeSet<Date>,
    /// Weekend days that are worked to make up for a holiday block.
    pub workdays: BTreeSet<Date>,
}

impl YearTable {
    /// Create an empty table for a year.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            holidays: BTreeSet::new(),
            workdays: BTreeSet::new(),
        }
    }

    /// Build a table from inclusive `(month, day)` holiday ranges and
    /// individual make-up workdays.
    pub fn from_ranges(
        year: i32,
        holidays: &[((u8, u8), (u8, u8))],
        workdays: &[(u8, u8)],
    ) -> CalendarResult<Self> {
        let mut table = Self::new(year);
        for &(start, end) in holidays {
            let mut day = ymd(year, start)?;
            let end = ymd(year, end)?;
            while day <= end {
                table.holidays.insert(day);
                day = day
                    .next_day()
                    .ok_or_else(|| CalendarError::Load(format!("date overflow after {day}")))?;
            }
        }
        for &workday in workdays {
            table.workdays.insert(ymd(year, workday)?);
        }
        table.check_disjoint()?;
        Ok(table)
    }

    /// `Some(answer)` when the table decides the date, `None` when the
    /// weekday rule applies.
    pub fn classify(&self, date: Date) -> Option<bool> {
        if self.holidays.contains(&date) {
            Some(true)
        } else if self.workdays.contains(&date) {
            Some(false)
        } else {
            None
        }
    }

    fn check_disjoint(&self) -> CalendarResult<()> {
        if let Some(day) = self.holidays.intersection(&self.workdays).next() {
            return Err(CalendarError::Load(format!(
                "{day} is listed as both holiday and workday"
            )));
        }
        Ok(())
    }
}

fn ymd(year: i32, (month, day): (u8, u8)) -> CalendarResult<Date> {
    let month = Month::try_from(month)
        .map_err(|e| CalendarError::Load(format!("invalid month {month}: {e}")))?;
    Date::from_calendar_date(year, month, day)
        .map_err(|e| CalendarError::Load(format!("invalid date {year}-{month}-{day}: {e}")))
}

/// On-disk format for extra years.
///
/// ```toml
/// [[years]]
/// year = 2027
/// holidays = ["20270101", "20270102"]
/// workdays = ["20270207"]
/// ```
#[derive(Debug, Deserialize)]
pub struct YearTableFile {
    #[serde(default)]
    pub years: Vec<YearEntry>,
}

/// One year in a [`YearTableFile`].
#[derive(Debug, Deserialize)]
pub struct YearEntry {
    pub year: i32,
    #[serde(default)]
    pub holidays: Vec<String>,
    #[serde(default)]
    pub workdays: Vec<String>,
}

impl YearTableFile {
    /// Parse a TOML document.
    pub fn parse(content: &str) -> CalendarResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> CalendarResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalendarError::Load(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Convert into validated tables.
    pub fn into_tables(self) -> CalendarResult<Vec<YearTable>> {
        self.years
            .into_iter()
            .map(|entry| {
                let mut table = YearTable::new(entry.year);
                for raw in &entry.holidays {
                    table.holidays.insert(entry_date(entry.year, raw)?);
                }
                for raw in &entry.workdays {
                    table.workdays.insert(entry_date(entry.year, raw)?);
                }
                table.check_disjoint()?;
                Ok(table)
            })
            .collect()
    }
}

fn entry_date(year: i32, raw: &str) -> CalendarResult<Date> {
    let (_, date) = DayKey::parse_date(raw)
        .map_err(|e| CalendarError::Load(format!("{raw}: {e}")))?;
    if date.year() != year {
        return Err(CalendarError::Load(format!(
            "{raw} is listed under year {year}"
        )));
    }
    Ok(date)
}
