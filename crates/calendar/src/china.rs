//! Mainland China public holiday calendar.
//!
//! Weekends are days off unless the State Council moves a workday onto them;
//! statutory holiday blocks are days off even when they span weekdays. Both
//! adjustments are published yearly, so each supported year has a table and
//! dates outside those years are rejected instead of guessed.

use crate::error::{CalendarError, CalendarResult};
use crate::table::{YearTable, YearTableFile};
use crate::{HolidayCalendar, is_weekend};
use dayoff_core::config::CalendarConfig;
use std::collections::BTreeMap;
use time::Date;

type Ranges = &'static [((u8, u8), (u8, u8))];
type Days = &'static [(u8, u8)];

/// Built-in schedule: (year, holiday ranges, make-up workdays).
const BUILTIN: &[(i32, Ranges, Days)] = &[
    (
        2022,
        &[
            ((1, 1), (1, 3)),
            ((1, 31), (2, 6)),
            ((4, 3), (4, 5)),
            ((4, 30), (5, 4)),
            ((6, 3), (6, 5)),
            ((9, 10), (9, 12)),
            ((10, 1), (10, 7)),
        ],
        &[(1, 29), (1, 30), (4, 2), (4, 24), (5, 7), (10, 8), (10, 9)],
    ),
    (
        2023,
        &[
            ((1, 1), (1, 2)),
            ((1, 21), (1, 27)),
            ((4, 5), (4, 5)),
            ((4, 29), (5, 3)),
            ((6, 22), (6, 24)),
            ((9, 29), (10, 6)),
        ],
        &[(1, 28), (1, 29), (4, 23), (5, 6), (6, 25), (10, 7), (10, 8)],
    ),
    (
        2024,
        &[
            ((1, 1), (1, 1)),
            ((2, 10), (2, 17)),
            ((4, 4), (4, 6)),
            ((5, 1), (5, 5)),
            ((6, 10), (6, 10)),
            ((9, 15), (9, 17)),
            ((10, 1), (10, 7)),
        ],
        &[(2, 4), (2, 18), (4, 7), (4, 28), (5, 11), (9, 14), (9, 29), (10, 12)],
    ),
    (
        2025,
        &[
            ((1, 1), (1, 1)),
            ((1, 28), (2, 4)),
            ((4, 4), (4, 6)),
            ((5, 1), (5, 5)),
            ((5, 31), (6, 2)),
            ((10, 1), (10, 8)),
        ],
        &[(1, 26), (2, 8), (4, 27), (9, 28), (10, 11)],
    ),
    (
        2026,
        &[
            ((1, 1), (1, 3)),
            ((2, 15), (2, 23)),
            ((4, 4), (4, 6)),
            ((5, 1), (5, 5)),
            ((6, 19), (6, 21)),
            ((9, 25), (9, 27)),
            ((10, 1), (10, 7)),
        ],
        &[(1, 4), (2, 14), (2, 28), (5, 9), (9, 20), (10, 10)],
    ),
];

/// Table-driven mainland China calendar.
#[derive(Clone, Debug)]
pub struct ChinaCalendar {
    tables: BTreeMap<i32, YearTable>,
}

impl ChinaCalendar {
    /// Create a calendar with the built-in years.
    pub fn new() -> CalendarResult<Self> {
        let mut tables = BTreeMap::new();
        for &(year, holidays, workdays) in BUILTIN {
            tables.insert(year, YearTable::from_ranges(year, holidays, workdays)?);
        }
        Ok(Self { tables })
    }

    /// Create a calendar from configuration, loading any extra years.
    pub fn from_config(config: &CalendarConfig) -> CalendarResult<Self> {
        let mut calendar = Self::new()?;
        if let Some(path) = &config.extra_path {
            let tables = YearTableFile::load(path)?.into_tables()?;
            tracing::info!(
                path = %path.display(),
                years = tables.len(),
                "Loaded extra holiday tables"
            );
            calendar = calendar.with_tables(tables);
        }
        Ok(calendar)
    }

    /// Add or replace year tables.
    pub fn with_tables(mut self, tables: impl IntoIterator<Item = YearTable>) -> Self {
        for table in tables {
            if self.tables.contains_key(&table.year) {
                tracing::debug!(year = table.year, "Replacing built-in holiday table");
            }
            self.tables.insert(table.year, table);
        }
        self
    }

    /// Years with holiday data, ascending.
    pub fn supported_years(&self) -> impl Iterator<Item = i32> + '_ {
        self.tables.keys().copied()
    }
}

impl HolidayCalendar for ChinaCalendar {
    fn name(&self) -> &str {
        "China"
    }

    fn is_holiday(&self, date: Date) -> CalendarResult<bool> {
        let table = self
            .tables
            .get(&date.year())
            .ok_or(CalendarError::UnsupportedYear(date.year()))?;
        Ok(table.classify(date).unwrap_or_else(|| is_weekend(date)))
    }
}
