//! Data layer: daily file loading, merging, date filtering.

pub mod date;
pub mod loader;
pub mod merge;
pub mod range;

pub use date::{parse_date, parse_date_cell, DateParseError, DATE_FORMAT};
pub use loader::{load_metric_dir, LoadError, DATE_COLUMN};
pub use merge::{merge_series, JoinMode};
pub use range::{filter_range, DateRange};
