//! PR evolution chart.
//!
//! Layers, bottom to top: GHI-colored PR scatter, rolling PR mean, budget
//! line, legend, trailing-average box. The backend follows the output
//! extension: `.svg` renders vector output, `.png`/`.jpg`/`.jpeg`/`.bmp` go
//! through the bitmap backend. Any other extension is rejected.
//!
//! An empty table still renders: the x axis falls back to the requested
//! window and the y axis to a fixed 0..100 span.

use super::palette::GhiColorScale;
use super::ReportError;
use crate::config::PlotConfig;
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use prlab_core::indicators::{pr_rolling_mean, trailing_pr_averages, TrailingAverage};
use prlab_core::{CombinedTable, DateRange};
use std::ops::Range;
use std::path::Path;

const ROLLING_COLOR: RGBColor = RGBColor(220, 20, 60);
const BUDGET_COLOR: RGBColor = RGBColor(0, 100, 0);
const EMPTY_Y_RANGE: Range<f64> = 0.0..100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Bitmap,
}

impl OutputFormat {
    /// `None` for extensions no backend can encode.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(OutputFormat::Svg),
            "png" | "jpg" | "jpeg" | "bmp" => Some(OutputFormat::Bitmap),
            _ => None,
        }
    }

    /// Like `from_path`, but as a reporting error.
    pub fn for_output(path: &Path) -> Result<Self, ReportError> {
        Self::from_path(path).ok_or_else(|| ReportError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

/// Everything the chart draws, computed up front so drawing is pure layout.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub scatter: Vec<(NaiveDate, f64, RGBColor)>,
    pub rolling: Vec<(NaiveDate, f64)>,
    pub budget: Vec<(NaiveDate, f64)>,
    pub trailing: Vec<TrailingAverage>,
    pub rolling_window: usize,
    pub x_range: Range<NaiveDate>,
    pub y_range: Range<f64>,
}

impl ChartData {
    pub fn build(table: &CombinedTable, range: &DateRange, plot: &PlotConfig) -> Self {
        let scale = GhiColorScale::from_table(table);
        let scatter: Vec<(NaiveDate, f64, RGBColor)> = table
            .iter()
            .filter_map(|row| row.pr.map(|pr| (row.date, pr, scale.color(row.ghi))))
            .collect();
        let rolling = pr_rolling_mean(table, plot.rolling_window);
        let x_range = x_range(table, range);

        let budget_line = plot.budget_line();
        let budget = budget_line.series(days(&x_range));

        let y_range = y_range(
            scatter
                .iter()
                .map(|&(_, pr, _)| pr)
                .chain(rolling.iter().map(|&(_, v)| v))
                .chain(budget.iter().map(|&(_, v)| v)),
            !scatter.is_empty(),
        );

        Self {
            scatter,
            rolling,
            budget,
            trailing: trailing_pr_averages(table, &plot.trailing_periods),
            rolling_window: plot.rolling_window,
            x_range,
            y_range,
        }
    }

    pub fn annotation_lines(&self) -> Vec<String> {
        self.trailing
            .iter()
            .map(|t| match t.average {
                Some(avg) => format!("Avg PR (last {} days): {avg:.2}", t.days),
                None => format!("Avg PR (last {} days): n/a", t.days),
            })
            .collect()
    }
}

/// Data span padded by a day on each side, or the requested window when empty.
fn x_range(table: &CombinedTable, range: &DateRange) -> Range<NaiveDate> {
    match (table.first_date(), table.last_date()) {
        (Some(first), Some(last)) => (first - Duration::days(1))..(last + Duration::days(1)),
        _ if range.start < range.end => range.start..range.end,
        _ => range.start..(range.start + Duration::days(1)),
    }
}

fn days(range: &Range<NaiveDate>) -> impl Iterator<Item = NaiveDate> {
    let end = range.end;
    range.start.iter_days().take_while(move |d| *d <= end)
}

/// Span of the plotted values with 5% headroom. Budget values alone do not
/// define the axis when there are no PR points.
fn y_range(values: impl Iterator<Item = f64>, has_points: bool) -> Range<f64> {
    if !has_points {
        return EMPTY_Y_RANGE;
    }
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return EMPTY_Y_RANGE;
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad)..(hi + pad)
}

/// Render the chart for `table` to `path`.
pub fn render_plot(
    table: &CombinedTable,
    range: &DateRange,
    plot: &PlotConfig,
    path: &Path,
) -> Result<(), ReportError> {
    let format = OutputFormat::for_output(path)?;
    let data = ChartData::build(table, range, plot);
    let size = (plot.width, plot.height);
    let render_err = |message: String| ReportError::Render {
        path: path.to_path_buf(),
        message,
    };

    match format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_chart(&root, &data).map_err(|e| render_err(e.to_string()))?;
            root.present().map_err(|e| render_err(e.to_string()))?;
        }
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_chart(&root, &data).map_err(|e| render_err(e.to_string()))?;
            root.present().map_err(|e| render_err(e.to_string()))?;
        }
    }
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &ChartData,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption("Performance Ratio Evolution", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(data.x_range.clone(), data.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Performance Ratio (%)")
        .x_labels(12)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
        .draw()?;

    chart.draw_series(
        data.scatter
            .iter()
            .map(|&(date, pr, color)| Circle::new((date, pr), 3, color.filled())),
    )?;

    chart
        .draw_series(LineSeries::new(
            data.rolling.iter().copied(),
            ROLLING_COLOR.stroke_width(2),
        ))?
        .label(format!("{}-day Moving Average", data.rolling_window))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &ROLLING_COLOR));

    chart
        .draw_series(LineSeries::new(
            data.budget.iter().copied(),
            BUDGET_COLOR.stroke_width(2),
        ))?
        .label("Budget PR")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BUDGET_COLOR));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    draw_annotation(&chart.plotting_area().strip_coord_spec(), &data.annotation_lines())?;

    Ok(())
}

/// Trailing-average box in the lower-right corner of the plotting area.
fn draw_annotation<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lines: &[String],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if lines.is_empty() {
        return Ok(());
    }
    let (width, height) = area.dim_in_pixel();
    let line_height = 18;
    let box_w = 240;
    let box_h = line_height * lines.len() as i32 + 12;
    let x0 = width as i32 - box_w - 10;
    let y0 = height as i32 - box_h - 10;
    let corners = [(x0, y0), (x0 + box_w, y0 + box_h)];

    area.draw(&Rectangle::new(corners, WHITE.mix(0.8).filled()))?;
    area.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))?;
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.as_str(),
            (x0 + 8, y0 + 6 + i as i32 * line_height),
            ("sans-serif", 15).into_font(),
        ))?;
    }
    Ok(())
}
