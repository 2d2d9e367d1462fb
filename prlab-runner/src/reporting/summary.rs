//! Run summary: what was loaded, what was written, and the trailing PR averages.

use super::ReportError;
use chrono::NaiveDate;
use prlab_core::indicators::TrailingAverage;
use prlab_core::{CombinedTable, DateRange, JoinMode, LoadReport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub rows: usize,
    pub pr_rows: usize,
    pub ghi_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub range: DateRange,
    pub join: JoinMode,
    pub trailing: Vec<TrailingAverage>,
    pub pr_load: LoadReport,
    pub ghi_load: LoadReport,
    pub output_csv: PathBuf,
    pub output_plot: PathBuf,
}

impl RunSummary {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        table: &CombinedTable,
        range: DateRange,
        join: JoinMode,
        trailing: Vec<TrailingAverage>,
        pr_load: LoadReport,
        ghi_load: LoadReport,
        output_csv: &Path,
        output_plot: &Path,
    ) -> Self {
        Self {
            rows: table.len(),
            pr_rows: table.pr_count(),
            ghi_rows: table.ghi_count(),
            first_date: table.first_date(),
            last_date: table.last_date(),
            range,
            join,
            trailing,
            pr_load,
            ghi_load,
            output_csv: output_csv.to_path_buf(),
            output_plot: output_plot.to_path_buf(),
        }
    }

    /// Human-readable block printed by the CLI.
    pub fn render_text(&self) -> String {
        let span = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => "(no rows)".to_string(),
        };

        let mut lines = vec![
            format!(
                "Window:       {} to {} ({} join)",
                self.range.start, self.range.end, self.join
            ),
            format!("Rows:         {} ({span})", self.rows),
            format!("PR values:    {}", self.pr_rows),
            format!("GHI values:   {}", self.ghi_rows),
            format!(
                "Files:        PR {}/{} loaded, GHI {}/{} loaded",
                self.pr_load.files_loaded,
                self.pr_load.files_seen,
                self.ghi_load.files_loaded,
                self.ghi_load.files_seen
            ),
        ];
        lines.extend(self.trailing.iter().map(|t| match t.average {
            Some(avg) => format!("Avg PR {:>3}d:   {avg:.2} ({} samples)", t.days, t.samples),
            None => format!("Avg PR {:>3}d:   n/a", t.days),
        }));
        lines.push(format!("CSV:          {}", self.output_csv.display()));
        lines.push(format!("Plot:         {}", self.output_plot.display()));
        lines.join("\n")
    }
}

/// Write `summary` as pretty JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
