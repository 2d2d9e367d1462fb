//! PRLab Core — domain types, daily file loading, merge, range filter, statistics.
//!
//! This crate contains the data side of the pipeline:
//! - Domain types (metrics, daily records, merged rows, the combined table)
//! - Loader for `<root>/<YYYY-MM>/<YYYY-MM-DD>.csv` trees with per-file tolerance
//! - Date-keyed outer/inner join of the PR and GHI series
//! - Inclusive date-range filter
//! - Rolling and trailing PR averages, and the budget reference line

pub mod budget;
pub mod data;
pub mod domain;
pub mod indicators;

pub use budget::BudgetLine;
pub use data::{
    filter_range, load_metric_dir, merge_series, DateParseError, DateRange, JoinMode, LoadError,
};
pub use domain::{CombinedTable, DailyRecord, LoadReport, MergedRow, Metric, MetricSeries};
