//! Daily file loading for one metric tree.
//!
//! Layout: `<root>/<YYYY-MM>/<YYYY-MM-DD>.csv`. Each day file holds a `Date`
//! column and the metric's value column. The value for a day is taken from the
//! first well-formed row whose date matches the date in the filename.
//!
//! Per-file problems never fail the load: the file is skipped with a warning
//! and the remaining files are still read. Only a missing or unreadable root
//! directory is an error.
//!
//! Files are visited in sorted path order, so when a date appears twice the
//! file that sorts last wins regardless of filesystem iteration order.

use super::date::{parse_date, parse_date_cell, parse_month};
use crate::domain::{Metric, MetricSeries};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the date column in every day file.
pub const DATE_COLUMN: &str = "Date";

/// Fatal loader errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{metric} directory '{}' does not exist or is not a directory", .path.display())]
    MissingRoot { metric: Metric, path: PathBuf },

    #[error("cannot read {metric} directory '{}': {source}", .path.display())]
    UnreadableRoot {
        metric: Metric,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single day file contributed nothing.
#[derive(Debug, Error)]
enum SkipReason {
    #[error("unreadable CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("no valid row dated {0}")]
    NoMatchingRow(NaiveDate),
}

/// Load every day file under `root` for `metric`.
pub fn load_metric_dir(root: &Path, metric: Metric) -> Result<MetricSeries, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::MissingRoot {
            metric,
            path: root.to_path_buf(),
        });
    }
    std::fs::read_dir(root).map_err(|source| LoadError::UnreadableRoot {
        metric,
        path: root.to_path_buf(),
        source,
    })?;

    info!(metric = %metric, root = %root.display(), "loading daily files");

    let mut series = MetricSeries::new(metric);
    let mut sources: BTreeMap<NaiveDate, PathBuf> = BTreeMap::new();
    let mut checked_months: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(root)
        .min_depth(2)
        .max_depth(2)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(metric = %metric, "skipping unreadable entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() {
            debug!(entry = %path.display(), "ignoring non-file entry");
            continue;
        }
        if !has_csv_extension(path) {
            debug!(file = %path.display(), "ignoring non-CSV file");
            continue;
        }
        series.report.files_seen += 1;

        let Some(file_date) = file_date(path) else {
            warn!(
                metric = %metric,
                file = %path.display(),
                "skipping file: name is not a YYYY-MM-DD date"
            );
            series.report.files_skipped += 1;
            continue;
        };

        if let Some(month_dir) = path.parent() {
            if checked_months.insert(month_dir.to_path_buf()) {
                check_month_dir(month_dir, metric);
            }
            warn_on_month_mismatch(month_dir, path, file_date);
        }

        let mut rows_skipped = 0;
        let value = read_day_file(path, metric, file_date, &mut rows_skipped);
        series.report.rows_skipped += rows_skipped;

        match value {
            Ok(value) => {
                if let Some(previous) = sources.insert(file_date, path.to_path_buf()) {
                    warn!(
                        metric = %metric,
                        date = %file_date,
                        previous = %previous.display(),
                        file = %path.display(),
                        "duplicate date, keeping the later file"
                    );
                    series.report.duplicates_overwritten += 1;
                }
                series.values.insert(file_date, value);
                series.report.files_loaded += 1;
            }
            Err(reason) => {
                warn!(
                    metric = %metric,
                    file = %path.display(),
                    "skipping file: {reason}"
                );
                series.report.files_skipped += 1;
            }
        }
    }

    info!(
        metric = %metric,
        days = series.len(),
        files_seen = series.report.files_seen,
        files_skipped = series.report.files_skipped,
        rows_skipped = series.report.rows_skipped,
        "loaded metric"
    );

    Ok(series)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn file_date(path: &Path) -> Option<NaiveDate> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| parse_date(stem).ok())
}

fn check_month_dir(month_dir: &Path, metric: Metric) {
    let name = month_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if parse_month(name).is_none() {
        warn!(
            metric = %metric,
            dir = %month_dir.display(),
            "month directory name is not YYYY-MM; loading its files anyway"
        );
    }
}

fn warn_on_month_mismatch(month_dir: &Path, path: &Path, file_date: NaiveDate) {
    let month = month_dir
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(parse_month);
    if let Some((year, month)) = month {
        if (file_date.year(), file_date.month()) != (year, month) {
            warn!(
                file = %path.display(),
                "file date {file_date} lies outside its month directory"
            );
        }
    }
}

/// Case-insensitive header lookup, ignoring surrounding whitespace and a BOM.
fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
}

fn read_day_file(
    path: &Path,
    metric: Metric,
    file_date: NaiveDate,
    rows_skipped: &mut usize,
) -> Result<f64, SkipReason> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let date_idx =
        find_column(&headers, DATE_COLUMN).ok_or(SkipReason::MissingColumn(DATE_COLUMN))?;
    let value_idx =
        find_column(&headers, metric.column()).ok_or(SkipReason::MissingColumn(metric.column()))?;

    for (i, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!(file = %path.display(), line, "skipping unreadable row: {e}");
                *rows_skipped += 1;
                continue;
            }
        };

        let Some(date) = record.get(date_idx).and_then(parse_date_cell) else {
            debug!(file = %path.display(), line, "skipping row with malformed date");
            *rows_skipped += 1;
            continue;
        };
        let Some(value) = record
            .get(value_idx)
            .and_then(|cell| cell.parse::<f64>().ok())
            .filter(|v| v.is_finite())
        else {
            debug!(file = %path.display(), line, "skipping row with non-numeric {metric}");
            *rows_skipped += 1;
            continue;
        };

        if date == file_date {
            return Ok(value);
        }
    }

    Err(SkipReason::NoMatchingRow(file_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn loads_value_from_matching_row() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2020-01/2020-01-01.csv", "Date,PR\n2020-01-01,0.85\n");
        write(dir.path(), "2020-01/2020-01-02.csv", "Date,PR\n2020-01-02,0.91\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(d("2020-01-01")), Some(0.85));
        assert_eq!(series.get(d("2020-01-02")), Some(0.91));
        assert_eq!(series.report.files_loaded, 2);
        assert_eq!(series.report.files_skipped, 0);
    }

    #[test]
    fn header_match_is_case_insensitive_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2020-01/2020-01-01.csv", " date , Ghi \n2020-01-01, 650.0\n");

        let series = load_metric_dir(dir.path(), Metric::Ghi).unwrap();
        assert_eq!(series.get(d("2020-01-01")), Some(650.0));
    }

    #[test]
    fn missing_value_column_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2020-01/2020-01-01.csv", "Date,GHI\n2020-01-01,650.0\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.report.files_skipped, 1);
    }

    #[test]
    fn missing_date_column_skips_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2020-01/2020-01-01.csv", "Day,PR\n2020-01-01,0.8\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.report.files_skipped, 1);
    }

    #[test]
    fn malformed_rows_are_skipped_individually() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "2020-01/2020-01-05.csv",
            "Date,PR\nnot-a-date,0.1\n2020-01-05,abc\n2020-01-05,0.77\n",
        );

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert_eq!(series.get(d("2020-01-05")), Some(0.77));
        assert_eq!(series.report.rows_skipped, 2);
    }

    #[test]
    fn file_without_matching_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2020-01/2020-01-05.csv", "Date,PR\n2020-01-06,0.77\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.report.files_skipped, 1);
    }

    #[test]
    fn bad_filename_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2020-01/summary.csv", "Date,PR\n2020-01-01,0.8\n");
        write(dir.path(), "2020-01/2020-01-02.csv", "Date,PR\n2020-01-02,0.8\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.report.files_seen, 2);
        assert_eq!(series.report.files_skipped, 1);
    }

    #[test]
    fn non_csv_and_root_level_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "2020-01-01.csv", "Date,PR\n2020-01-01,0.8\n");
        write(dir.path(), "2020-01/2020-01-02.txt", "Date,PR\n2020-01-02,0.8\n");
        write(dir.path(), "2020-01/2020-01-03.CSV", "Date,PR\n2020-01-03,0.6\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(d("2020-01-03")), Some(0.6));
    }

    #[test]
    fn duplicate_date_last_sorted_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        // Written in reverse order so creation order disagrees with path order.
        write(dir.path(), "2020-02/2020-01-31.csv", "Date,PR\n2020-01-31,0.9\n");
        write(dir.path(), "2020-01/2020-01-31.csv", "Date,PR\n2020-01-31,0.5\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert_eq!(series.get(d("2020-01-31")), Some(0.9));
        assert_eq!(series.report.duplicates_overwritten, 1);
    }

    #[test]
    fn oddly_named_month_directory_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "january/2020-01-01.csv", "Date,PR\n2020-01-01,0.8\n");

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert_eq!(series.get(d("2020-01-01")), Some(0.8));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_day_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        write(store.path(), "day.csv", "Date,PR\n2020-01-03,0.66\n");
        fs::create_dir_all(dir.path().join("2020-01")).unwrap();
        std::os::unix::fs::symlink(
            store.path().join("day.csv"),
            dir.path().join("2020-01/2020-01-03.csv"),
        )
        .unwrap();

        let series = load_metric_dir(dir.path(), Metric::Pr).unwrap();
        assert_eq!(series.get(d("2020-01-03")), Some(0.66));
        assert_eq!(series.report.files_loaded, 1);
    }

    #[test]
    fn missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_metric_dir(&dir.path().join("nope"), Metric::Ghi).unwrap_err();
        assert!(matches!(err, LoadError::MissingRoot { metric: Metric::Ghi, .. }));
        assert!(err.to_string().contains("GHI directory"));
    }
}
