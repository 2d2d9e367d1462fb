//! Expected-PR reference line.
//!
//! The budget starts at `start_value` on the anchor date and degrades by
//! `annual_degradation` at every anniversary of the anchor:
//!
//! `budget(d) = start_value * (1 - annual_degradation)^k`
//!
//! where `k` is the number of whole years between the anchor and `d`. Dates
//! before the anchor use `start_value`. Degradation keeps compounding for
//! every plant year after the anchor; there is no final year after which the
//! budget resets to `start_value`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUDGET_START_VALUE: f64 = 73.9;
pub const DEFAULT_ANNUAL_DEGRADATION: f64 = 0.008;

/// First day of the first plant year (July 1st, 2019).
pub fn default_budget_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 7, 1).expect("2019-07-01 is a valid date")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub start_value: f64,
    pub annual_degradation: f64,
    pub anchor: NaiveDate,
}

impl Default for BudgetLine {
    fn default() -> Self {
        Self {
            start_value: DEFAULT_BUDGET_START_VALUE,
            annual_degradation: DEFAULT_ANNUAL_DEGRADATION,
            anchor: default_budget_anchor(),
        }
    }
}

impl BudgetLine {
    /// Whole plant years elapsed at `date` (0 before the anchor).
    pub fn plant_year(&self, date: NaiveDate) -> u32 {
        if date < self.anchor {
            return 0;
        }
        let mut years = date.year() - self.anchor.year();
        if (date.month(), date.day()) < (self.anchor.month(), self.anchor.day()) {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }

    pub fn value_at(&self, date: NaiveDate) -> f64 {
        let years = i32::try_from(self.plant_year(date)).unwrap_or(i32::MAX);
        self.start_value * (1.0 - self.annual_degradation).powi(years)
    }

    /// Budget value for each date, in the given order.
    pub fn series(&self, dates: impl IntoIterator<Item = NaiveDate>) -> Vec<(NaiveDate, f64)> {
        dates
            .into_iter()
            .map(|date| (date, self.value_at(date)))
            .collect()
    }
}
