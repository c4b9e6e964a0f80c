//! Chart output: per-series time-series panels and a pairwise scatter matrix.
//!
//! Both charts are rendered with Plotters' SVG backend into the results
//! directory under fixed file names, replacing any file from a previous run.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use plotters::style::RGBColor;
use tracing::info;

use crate::domain::{Region, TimeTable};
use crate::error::AppError;

pub mod scatter;
pub mod timeseries;

/// File name of the scatter matrix chart.
pub const SCATTER_MATRIX_FILE: &str = "scatter_matrix.svg";

/// Series colors, cycled by column index.
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

/// Paths of the charts written by [`write_plots`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotArtifacts {
    pub indicators: PathBuf,
    pub scatter_matrix: PathBuf,
}

/// File name of the time-series chart for a region, e.g. `ohio_indicators.svg`.
pub fn indicators_file_name(region: &Region) -> String {
    format!("{}_indicators.svg", region.slug())
}

/// Chart title for a region, e.g. `Economic Indicators in Ohio`.
pub fn indicators_title(region: &Region) -> String {
    format!("Economic Indicators in {}", region.name)
}

/// Render both charts into `results_dir`, creating it if needed.
pub fn write_plots(
    table: &TimeTable,
    region: &Region,
    results_dir: &Path,
) -> Result<PlotArtifacts, AppError> {
    std::fs::create_dir_all(results_dir).map_err(|e| AppError::filesystem(results_dir, e))?;

    let indicators = results_dir.join(indicators_file_name(region));
    timeseries::draw_indicator_panels(table, &indicators_title(region), &indicators)
        .map_err(|e| AppError::filesystem(&indicators, e))?;
    info!(path = %indicators.display(), "wrote time-series chart");

    let scatter_matrix = results_dir.join(SCATTER_MATRIX_FILE);
    scatter::draw_scatter_matrix(&table.drop_missing(), &scatter_matrix)
        .map_err(|e| AppError::filesystem(&scatter_matrix, e))?;
    info!(path = %scatter_matrix.display(), "wrote scatter matrix");

    Ok(PlotArtifacts {
        indicators,
        scatter_matrix,
    })
}

pub(crate) fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Min/max of the finite values, padded by 5% (or ±1 for a constant series).
pub(crate) fn padded_range(values: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values.iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < 1e-12 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad, hi + pad)
}

/// Dates are plotted as days since 0001-01-01 so the axis is a plain `f64` range.
pub(crate) fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

pub(crate) fn x_to_label(x: f64, with_month: bool) -> String {
    match NaiveDate::from_num_days_from_ce_opt(x.round() as i32) {
        Some(d) if with_month => d.format("%Y-%m").to_string(),
        Some(d) => d.format("%Y").to_string(),
        None => String::new(),
    }
}
