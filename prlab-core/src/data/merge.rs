//! Date-keyed join of the PR and GHI series.
//!
//! Outer joins keep every date seen in either series; the metric missing on a
//! date stays `None` rather than being filled with zero. Inner joins keep only
//! dates present in both.

use crate::domain::{CombinedTable, MergedRow, MetricSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How dates present in only one series are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Union of dates.
    #[default]
    Outer,
    /// Intersection of dates.
    Inner,
}

impl FromStr for JoinMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outer" => Ok(JoinMode::Outer),
            "inner" => Ok(JoinMode::Inner),
            other => Err(format!("unknown join mode '{other}' (expected outer or inner)")),
        }
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinMode::Outer => f.write_str("outer"),
            JoinMode::Inner => f.write_str("inner"),
        }
    }
}

/// Join PR and GHI on date into a sorted table with one row per date.
pub fn merge_series(pr: &MetricSeries, ghi: &MetricSeries, mode: JoinMode) -> CombinedTable {
    let dates: BTreeSet<NaiveDate> = match mode {
        JoinMode::Outer => pr.values.keys().chain(ghi.values.keys()).copied().collect(),
        JoinMode::Inner => pr
            .values
            .keys()
            .filter(|date| ghi.values.contains_key(date))
            .copied()
            .collect(),
    };

    let rows = dates
        .into_iter()
        .map(|date| MergedRow {
            date,
            ghi: ghi.get(date),
            pr: pr.get(date),
        })
        .collect();

    CombinedTable::from_sorted(rows)
}
