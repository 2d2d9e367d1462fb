//! Date parsing for filenames, CLI bounds and CSV cells.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Format of day filenames and of the range bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Datetime layouts accepted in a file's Date column besides [`DATE_FORMAT`].
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{input}' (expected YYYY-MM-DD)")]
pub struct DateParseError {
    pub input: String,
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| DateParseError {
        input: input.to_string(),
    })
}

/// Parse a Date cell. Accepts a plain date or a datetime (time is dropped).
pub fn parse_date_cell(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if let Ok(date) = NaiveDate::parse_from_str(cell, DATE_FORMAT) {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .map(|dt| dt.date())
}

/// Parse a `YYYY-MM` month directory name into `(year, month)`.
pub fn parse_month(name: &str) -> Option<(i32, u32)> {
    NaiveDate::parse_from_str(&format!("{}-01", name.trim()), DATE_FORMAT)
        .ok()
        .map(|d| (d.year(), d.month()))
}
