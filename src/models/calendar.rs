//! Calendar helpers. All scheduling happens at ISO-day granularity, so
//! dates are plain `NaiveDate`s. Date arithmetic is checked and never panics.

use chrono::{Duration, Local, NaiveDate};

/// Source of the current day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock day in the local timezone
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// `date` shifted by `days`, or `None` past the representable calendar.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Formats a date as `YYYY-MM-DD`
pub fn iso_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}
