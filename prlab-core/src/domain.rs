//! Domain types shared by every pipeline stage.
//!
//! A `MetricSeries` is what the loader produces for one metric tree. Two series
//! are merged into a `CombinedTable`, which keeps its rows sorted by date with
//! one row per date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The two measurements tracked per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Metric {
    /// Performance Ratio.
    Pr,
    /// Global Horizontal Irradiance.
    Ghi,
}

impl Metric {
    /// Canonical column name in source and output CSV files.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Pr => "PR",
            Metric::Ghi => "GHI",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One measurement for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub value: f64,
}

/// Counters describing what the loader did with a metric tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// CSV files found at month depth.
    pub files_seen: usize,
    /// Files that contributed a value.
    pub files_loaded: usize,
    /// Files skipped with a warning.
    pub files_skipped: usize,
    /// Malformed rows ignored inside otherwise readable files.
    pub rows_skipped: usize,
    /// Dates seen more than once; the later file won.
    pub duplicates_overwritten: usize,
}

/// All daily values of one metric, keyed by date.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub metric: Metric,
    pub values: BTreeMap<NaiveDate, f64>,
    pub report: LoadReport,
}

impl MetricSeries {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            values: BTreeMap::new(),
            report: LoadReport::default(),
        }
    }

    /// Build a series directly from records (later records overwrite earlier ones).
    pub fn from_records(metric: Metric, records: impl IntoIterator<Item = DailyRecord>) -> Self {
        let mut series = Self::new(metric);
        for record in records {
            series.values.insert(record.date, record.value);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }

    /// Records in ascending date order.
    pub fn records(&self) -> impl Iterator<Item = DailyRecord> + '_ {
        self.values
            .iter()
            .map(|(&date, &value)| DailyRecord { date, value })
    }
}

/// One output row. A `None` field means the metric had no value that day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "GHI")]
    pub ghi: Option<f64>,
    #[serde(rename = "PR")]
    pub pr: Option<f64>,
}

/// Merged rows, sorted ascending by date, at most one row per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    rows: Vec<MergedRow>,
}

impl CombinedTable {
    /// Build a table from rows in any order. When a date repeats, the last row wins.
    pub fn from_rows(rows: impl IntoIterator<Item = MergedRow>) -> Self {
        let by_date: BTreeMap<NaiveDate, MergedRow> =
            rows.into_iter().map(|row| (row.date, row)).collect();
        Self {
            rows: by_date.into_values().collect(),
        }
    }

    /// Rows must already be strictly ascending by date.
    pub(crate) fn from_sorted(rows: Vec<MergedRow>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        Self { rows }
    }

    pub fn rows(&self) -> &[MergedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<MergedRow> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MergedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Rows with a PR value.
    pub fn pr_count(&self) -> usize {
        self.rows.iter().filter(|r| r.pr.is_some()).count()
    }

    /// Rows with a GHI value.
    pub fn ghi_count(&self) -> usize {
        self.rows.iter().filter(|r| r.ghi.is_some()).count()
    }

    /// `(date, pr)` for every row that has a PR value, in date order.
    pub fn pr_points(&self) -> Vec<(NaiveDate, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.pr.map(|pr| (r.date, pr)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a CombinedTable {
    type Item = &'a MergedRow;
    type IntoIter = std::slice::Iter<'a, MergedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
