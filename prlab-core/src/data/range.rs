//! Inclusive date window applied to the merged table.

use super::date::{parse_date, DateParseError};
use crate::domain::CombinedTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `[start, end]`, both bounds inclusive. A window with `start > end` selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse both bounds in the filename date format.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateParseError> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Keep the rows dated inside `range`.
pub fn filter_range(table: CombinedTable, range: &DateRange) -> CombinedTable {
    if range.is_empty() {
        return CombinedTable::default();
    }
    let rows = table
        .into_rows()
        .into_iter()
        .filter(|row| range.contains(row.date))
        .collect();
    CombinedTable::from_sorted(rows)
}
