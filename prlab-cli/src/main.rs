//! PRLab CLI — merge daily PR/GHI files, filter a date window, write CSV and plot.
//!
//! One command, flags only. Logs go to stderr (filter with `RUST_LOG`), the run
//! summary goes to stdout. Exit code is non-zero on any fatal error.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use prlab_core::data::parse_date;
use prlab_core::{DateRange, JoinMode};
use prlab_runner::config::{
    DEFAULT_END_DATE, DEFAULT_GHI_DIR, DEFAULT_OUTPUT_CSV, DEFAULT_OUTPUT_PLOT, DEFAULT_PR_DIR,
    DEFAULT_START_DATE,
};
use prlab_runner::{run_pipeline, ConfigFile, PipelineConfig, PlotConfig, RunSummary};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "prlab",
    about = "Merge daily PR and GHI files, then export a CSV and a PR evolution plot"
)]
struct Cli {
    /// Root of the PR tree (<root>/<YYYY-MM>/<YYYY-MM-DD>.csv).
    #[arg(long = "pr_dir", default_value = DEFAULT_PR_DIR)]
    pr_dir: PathBuf,

    /// Root of the GHI tree.
    #[arg(long = "ghi_dir", default_value = DEFAULT_GHI_DIR)]
    ghi_dir: PathBuf,

    /// Combined CSV output path.
    #[arg(long = "output_csv", default_value = DEFAULT_OUTPUT_CSV)]
    output_csv: PathBuf,

    /// Plot output path; `.svg` renders vector output, anything else a bitmap.
    #[arg(long = "output_plot", default_value = DEFAULT_OUTPUT_PLOT)]
    output_plot: PathBuf,

    /// First day of the window (YYYY-MM-DD, inclusive).
    #[arg(long = "start_date", default_value = DEFAULT_START_DATE, value_parser = parse_date)]
    start_date: NaiveDate,

    /// Last day of the window (YYYY-MM-DD, inclusive).
    #[arg(long = "end_date", default_value = DEFAULT_END_DATE, value_parser = parse_date)]
    end_date: NaiveDate,

    /// Keep every date (outer) or only dates present in both trees (inner).
    #[arg(long, default_value_t = JoinMode::Outer)]
    join: JoinMode,

    /// TOML file overriding the `[plot]` settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write the run summary as JSON.
    #[arg(long = "summary_json")]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = build_config(cli)?;
    info!(
        pr_dir = %config.pr_dir.display(),
        ghi_dir = %config.ghi_dir.display(),
        "starting run"
    );

    let outcome = run_pipeline(&config).context("pipeline run failed")?;
    print_summary(&outcome.summary);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: Cli) -> Result<PipelineConfig> {
    let plot = match &cli.config {
        Some(path) => {
            ConfigFile::from_file(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?
                .plot
        }
        None => PlotConfig::default(),
    };

    Ok(PipelineConfig {
        pr_dir: cli.pr_dir,
        ghi_dir: cli.ghi_dir,
        output_csv: cli.output_csv,
        output_plot: cli.output_plot,
        range: DateRange::new(cli.start_date, cli.end_date),
        join: cli.join,
        plot,
        summary_json: cli.summary_json,
    })
}

fn print_summary(summary: &RunSummary) {
    println!("=== PR/GHI Run Summary ===");
    println!("{}", summary.render_text());
}
