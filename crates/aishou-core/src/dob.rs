//! Three-part date-of-birth selector (year, month, day).
//!
//! Mirrors a cascading year → month → day picker: the day list depends on the
//! chosen year and month, and changing either one clamps an already chosen day
//! down to the new month length. A date is only produced once all three parts
//! are set.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Number of past years offered by the year picker, in addition to the current year.
pub const YEAR_SPAN: i32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DobError {
    #[error("month must be between 1 and 12, got {0}")]
    Month(u32),
    #[error("day {day} is out of range for the selected month (1-{max})")]
    Day { day: u32, max: u32 },
    #[error("date of birth must look like YYYY-MM-DD, got {0:?}")]
    Format(String),
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Days in `month` (1-12) of `year`, with leap-year February.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DobSelector {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl DobSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the selector from a stored `YYYY-MM-DD` value.
    ///
    /// An empty string yields an empty selector.
    pub fn parse(value: &str) -> Result<Self, DobError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::default());
        }
        let well_formed = value.len() == 10
            && value
                .bytes()
                .enumerate()
                .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
        if !well_formed {
            return Err(DobError::Format(value.to_string()));
        }
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| DobError::Format(value.to_string()))?;
        Ok(Self::from_date(date))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn set_year(&mut self, year: Option<i32>) {
        self.year = year;
        self.clamp_day();
    }

    pub fn set_month(&mut self, month: Option<u32>) -> Result<(), DobError> {
        if let Some(m) = month
            && !(1..=12).contains(&m)
        {
            return Err(DobError::Month(m));
        }
        self.month = month;
        self.clamp_day();
        Ok(())
    }

    pub fn set_day(&mut self, day: Option<u32>) -> Result<(), DobError> {
        if let Some(d) = day {
            let max = self.max_day();
            if d == 0 || d > max {
                return Err(DobError::Day { day: d, max });
            }
        }
        self.day = day;
        Ok(())
    }

    /// Upper bound of the day picker: the month length once year and month are
    /// known, otherwise 31.
    pub fn max_day(&self) -> u32 {
        match (self.year, self.month) {
            (Some(y), Some(m)) => days_in_month(y, m),
            _ => 31,
        }
    }

    pub fn day_choices(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.max_day()
    }

    /// Year picker entries, newest first.
    pub fn year_choices(current_year: i32) -> Vec<i32> {
        (0..=YEAR_SPAN).map(|i| current_year - i).collect()
    }

    /// The selected date, once all three parts are set.
    pub fn value(&self) -> Option<NaiveDate> {
        match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
            _ => None,
        }
    }

    /// `YYYY-MM-DD`, or an empty string while incomplete.
    pub fn to_value_string(&self) -> String {
        self.value()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    fn clamp_day(&mut self) {
        if let (Some(y), Some(m), Some(d)) = (self.year, self.month, self.day) {
            let max = days_in_month(y, m);
            if d > max {
                self.day = Some(max);
            }
        }
    }
}
