//! Output stage: combined CSV, PR evolution chart, run summary.

pub mod csv_export;
pub mod palette;
pub mod plot;
pub mod summary;

use std::path::PathBuf;
use thiserror::Error;

pub use csv_export::{read_combined_csv, write_combined_csv, CSV_HEADER};
pub use palette::GhiColorScale;
pub use plot::{render_plot, ChartData, OutputFormat};
pub use summary::{write_summary_json, RunSummary};

/// Errors from writing any run output.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on '{}': {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported plot format '{}' (expected svg, png, jpg, jpeg or bmp)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to render plot '{}': {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
