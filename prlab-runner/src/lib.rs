//! PRLab Runner — pipeline configuration, orchestration and reporting.
//!
//! This crate builds on `prlab-core` to provide:
//! - `PipelineConfig` with TOML-overridable plot settings
//! - The end-to-end run: load, merge, filter, write
//! - Combined CSV export, the PR evolution chart and the run summary

pub mod config;
pub mod reporting;
pub mod runner;

pub use config::{ConfigError, ConfigFile, PipelineConfig, PlotConfig};
pub use reporting::{
    read_combined_csv, render_plot, write_combined_csv, write_summary_json, ReportError,
    RunSummary,
};
pub use runner::{run_pipeline, PipelineError, PipelineOutcome};
