//! Pipeline orchestration: load both trees, merge, filter, write outputs.
//!
//! `run_pipeline()` is the single entry point used by the CLI. Configuration
//! errors and an unsupported plot extension are caught before any file is
//! touched, and a missing input root aborts the run before any output is
//! written.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use prlab_core::indicators::trailing_pr_averages;
use prlab_core::{filter_range, load_metric_dir, merge_series, CombinedTable, LoadError, Metric};

use crate::config::{ConfigError, PipelineConfig};
use crate::reporting::{
    render_plot, write_combined_csv, write_summary_json, OutputFormat, ReportError, RunSummary,
};

/// Errors from a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("cannot create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The filtered table and the summary of what was written.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub table: CombinedTable,
    pub summary: RunSummary,
}

/// Run the whole pipeline for `config`.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutcome, PipelineError> {
    config.plot.validate()?;
    OutputFormat::for_output(&config.output_plot)?;

    let pr = load_metric_dir(&config.pr_dir, Metric::Pr)?;
    let ghi = load_metric_dir(&config.ghi_dir, Metric::Ghi)?;

    ensure_parent_dir(&config.output_csv)?;
    ensure_parent_dir(&config.output_plot)?;
    if let Some(path) = &config.summary_json {
        ensure_parent_dir(path)?;
    }

    let merged = merge_series(&pr, &ghi, config.join);
    info!(rows = merged.len(), join = %config.join, "merged series");

    if config.range.is_empty() {
        warn!(
            start = %config.range.start,
            end = %config.range.end,
            "start date is after end date; the output will be empty"
        );
    }
    let table = filter_range(merged, &config.range);
    info!(
        rows = table.len(),
        start = %config.range.start,
        end = %config.range.end,
        "filtered to date range"
    );

    write_combined_csv(&config.output_csv, &table)?;
    info!(path = %config.output_csv.display(), "wrote combined CSV");

    render_plot(&table, &config.range, &config.plot, &config.output_plot)?;
    info!(path = %config.output_plot.display(), "rendered plot");

    let summary = RunSummary::new(
        &table,
        config.range,
        config.join,
        trailing_pr_averages(&table, &config.plot.trailing_periods),
        pr.report.clone(),
        ghi.report.clone(),
        &config.output_csv,
        &config.output_plot,
    );
    if let Some(path) = &config.summary_json {
        write_summary_json(path, &summary)?;
        info!(path = %path.display(), "wrote run summary");
    }

    Ok(PipelineOutcome { table, summary })
}

fn ensure_parent_dir(path: &Path) -> Result<(), PipelineError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| PipelineError::OutputDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
