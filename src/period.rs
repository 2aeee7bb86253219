//! Month/year parsing and the inclusive date ranges used in remote filters.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Date format used in remote filter predicates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    InvalidMonth(String),
    InvalidYear(String),
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::InvalidMonth(month) => write!(
                f,
                "Invalid month '{month}'. Use a full month name or its 3-letter abbreviation (e.g. 'Jan', 'February')."
            ),
            PeriodError::InvalidYear(year) => {
                write!(f, "Invalid year '{year}'. Use a 4-digit year (e.g. 2024).")
            }
        }
    }
}

impl std::error::Error for PeriodError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1-based month number.
    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }
}

impl FromStr for Month {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name().to_lowercase() == wanted || m.abbreviation().to_lowercase() == wanted)
            .ok_or_else(|| PeriodError::InvalidMonth(s.to_string()))
    }
}

/// Parse a 4-digit year.
pub fn parse_year(s: &str) -> Result<i32, PeriodError> {
    let trimmed = s.trim();
    if trimmed.len() != 4 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(PeriodError::InvalidYear(s.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| PeriodError::InvalidYear(s.to_string()))
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// First to last day of the month. The last day is the day before the
    /// first of the following month.
    pub fn for_month(month: Month, year: i32) -> Result<Self, PeriodError> {
        let invalid = || PeriodError::InvalidYear(year.to_string());
        let start = NaiveDate::from_ymd_opt(year, month.number(), 1).ok_or_else(invalid)?;
        let next_month_start = match month {
            Month::December => NaiveDate::from_ymd_opt(year + 1, 1, 1),
            _ => NaiveDate::from_ymd_opt(year, month.number() + 1, 1),
        }
        .ok_or_else(invalid)?;
        let end = next_month_start.pred_opt().ok_or_else(invalid)?;
        Ok(Self { start, end })
    }

    pub fn for_year(year: i32) -> Result<Self, PeriodError> {
        let start = Self::for_month(Month::January, year)?.start;
        let end = Self::for_month(Month::December, year)?.end;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

/// Resolve raw `month`/`year` query values to the month's date range.
pub fn month_range(month: &str, year: &str) -> Result<(Month, i32, DateRange), PeriodError> {
    let month: Month = month.parse()?;
    let year = parse_year(year)?;
    let range = DateRange::for_month(month, year)?;
    Ok((month, year, range))
}

/// Month of a date as a [`Month`].
pub fn month_of(date: NaiveDate) -> Month {
    // chrono months are always 1..=12
    Month::from_number(date.month()).unwrap_or(Month::January)
}
