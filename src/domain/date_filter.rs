use crate::domain::{TimetableError, TimetableResult};
use std::fmt;
use std::str::FromStr;

/// Earliest year the timetable accepts in year filters.
pub const MIN_YEAR: i32 = 2022;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

impl DatePart {
    pub fn sql_field(&self) -> &'static str {
        match self {
            DatePart::Day => "DAY",
            DatePart::Month => "MONTH",
            DatePart::Year => "YEAR",
        }
    }
}

/// How the flexible date query decides whether a day or month takes part
/// in the filter. Years are included from `MIN_YEAR` onwards under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CriterionPolicy {
    /// `day > 0 || day < 32` and `month > 0 || month < 13`: every value
    /// is included, out-of-range ones simply match nothing.
    #[default]
    Legacy,
    /// Only calendar-valid days (1..=31) and months (1..=12) are included.
    Bounded,
}

impl CriterionPolicy {
    pub fn includes_day(&self, day: i32) -> bool {
        match self {
            CriterionPolicy::Legacy => day > 0 || day < 32,
            CriterionPolicy::Bounded => (1..=31).contains(&day),
        }
    }

    pub fn includes_month(&self, month: i32) -> bool {
        match self {
            CriterionPolicy::Legacy => month > 0 || month < 13,
            CriterionPolicy::Bounded => (1..=12).contains(&month),
        }
    }

    pub fn includes_year(&self, year: i32) -> bool {
        year >= MIN_YEAR
    }
}

impl fmt::Display for CriterionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionPolicy::Legacy => f.write_str("legacy"),
            CriterionPolicy::Bounded => f.write_str("bounded"),
        }
    }
}

impl FromStr for CriterionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(CriterionPolicy::Legacy),
            "bounded" => Ok(CriterionPolicy::Bounded),
            other => Err(format!(
                "unknown criterion policy '{other}' (expected 'legacy' or 'bounded')"
            )),
        }
    }
}

pub fn validate_day(day: i32) -> TimetableResult<i32> {
    if day <= 0 || day >= 32 {
        return Err(TimetableError::InvalidDay(day));
    }
    Ok(day)
}

pub fn validate_month(month: i32) -> TimetableResult<i32> {
    if month <= 0 || month >= 13 {
        return Err(TimetableError::InvalidMonth(month));
    }
    Ok(month)
}

pub fn validate_year(year: i32) -> TimetableResult<i32> {
    if year < MIN_YEAR {
        return Err(TimetableError::InvalidYear(year));
    }
    Ok(year)
}
