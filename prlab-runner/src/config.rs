//! Pipeline configuration.
//!
//! `PipelineConfig` is built once by the CLI and threaded through every
//! stage. Presentation constants live in `PlotConfig`, which can be overridden
//! from the `[plot]` table of a TOML file; omitted keys keep their defaults.

use chrono::NaiveDate;
use prlab_core::budget::{
    default_budget_anchor, BudgetLine, DEFAULT_ANNUAL_DEGRADATION, DEFAULT_BUDGET_START_VALUE,
};
use prlab_core::{DateRange, JoinMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PR_DIR: &str = "PR";
pub const DEFAULT_GHI_DIR: &str = "GHI";
pub const DEFAULT_OUTPUT_CSV: &str = "output/combined_data.csv";
pub const DEFAULT_OUTPUT_PLOT: &str = "output/pr_evolution.png";
pub const DEFAULT_START_DATE: &str = "2019-07-01";
pub const DEFAULT_END_DATE: &str = "2022-03-24";

/// Longest accepted trailing-average period, in days.
pub const MAX_TRAILING_DAYS: u32 = 36_500;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Chart constants: rolling window, budget formula, annotation periods, image size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Samples in the PR moving average.
    pub rolling_window: usize,
    /// Budget PR during the first plant year.
    pub budget_start_value: f64,
    /// Fractional budget loss applied at each anniversary of `budget_anchor`.
    pub budget_annual_degradation: f64,
    pub budget_anchor: NaiveDate,
    /// Day counts for the trailing-average annotation.
    pub trailing_periods: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            rolling_window: 30,
            budget_start_value: DEFAULT_BUDGET_START_VALUE,
            budget_annual_degradation: DEFAULT_ANNUAL_DEGRADATION,
            budget_anchor: default_budget_anchor(),
            trailing_periods: vec![7, 30, 60],
            width: 1200,
            height: 800,
        }
    }
}

impl PlotConfig {
    pub fn budget_line(&self) -> BudgetLine {
        BudgetLine {
            start_value: self.budget_start_value,
            annual_degradation: self.budget_annual_degradation,
            anchor: self.budget_anchor,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolling_window == 0 {
            return Err(ConfigError::Invalid("rolling_window must be >= 1".into()));
        }
        if !(0.0..1.0).contains(&self.budget_annual_degradation) {
            return Err(ConfigError::Invalid(format!(
                "budget_annual_degradation must be in [0, 1), got {}",
                self.budget_annual_degradation
            )));
        }
        if !self.budget_start_value.is_finite() {
            return Err(ConfigError::Invalid("budget_start_value must be finite".into()));
        }
        if let Some(&days) = self
            .trailing_periods
            .iter()
            .find(|&&d| d == 0 || d > MAX_TRAILING_DAYS)
        {
            return Err(ConfigError::Invalid(format!(
                "trailing_periods entries must be in 1..={MAX_TRAILING_DAYS}, got {days}"
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// On-disk form of the optional `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub plot: PlotConfig,
}

impl ConfigFile {
    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.plot.validate()?;
        Ok(file)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub pr_dir: PathBuf,
    pub ghi_dir: PathBuf,
    pub output_csv: PathBuf,
    pub output_plot: PathBuf,
    pub range: DateRange,
    pub join: JoinMode,
    pub plot: PlotConfig,
    /// Optional machine-readable run summary.
    pub summary_json: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pr_dir: PathBuf::from(DEFAULT_PR_DIR),
            ghi_dir: PathBuf::from(DEFAULT_GHI_DIR),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
            output_plot: PathBuf::from(DEFAULT_OUTPUT_PLOT),
            range: DateRange::parse(DEFAULT_START_DATE, DEFAULT_END_DATE)
                .expect("default date bounds are valid"),
            join: JoinMode::default(),
            plot: PlotConfig::default(),
            summary_json: None,
        }
    }
}
