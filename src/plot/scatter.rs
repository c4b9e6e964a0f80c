//! Pairwise scatter matrix with per-variable histograms on the diagonal.

use std::error::Error;
use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::domain::TimeTable;
use crate::plot::{padded_range, series_color};

const SIZE: (u32, u32) = (800, 800);
const HISTOGRAM_BINS: usize = 10;

/// Render an n×n scatter matrix of the table's columns into an SVG file.
///
/// Cell `(row, col)` plots column `col` on x against column `row` on y. The
/// caller is expected to pass a table without missing cells; any that remain
/// are skipped pairwise.
pub fn draw_scatter_matrix(table: &TimeTable, path: &Path) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let columns = table.columns();
    let n = columns.len();
    if n == 0 {
        root.present()?;
        return Ok(());
    }

    let ranges: Vec<(f64, f64)> = columns
        .iter()
        .map(|c| padded_range(&table.present_values(&c.name)))
        .collect();

    let cells = root.split_evenly((n, n));
    for (idx, cell) in cells.iter().enumerate() {
        let (row, col) = (idx / n, idx % n);
        let is_bottom = row + 1 == n;
        let is_left = col == 0;
        let (x0, x1) = ranges[col];

        if row == col {
            let values = table.present_values(&columns[col].name);
            let bins = histogram(&values, x0, x1, HISTOGRAM_BINS);
            let max_count = bins.iter().copied().max().unwrap_or(0).max(1) as f64;

            let mut chart = ChartBuilder::on(cell)
                .margin(4)
                .x_label_area_size(if is_bottom { 40 } else { 0 })
                .y_label_area_size(if is_left { 50 } else { 0 })
                .build_cartesian_2d(x0..x1, 0.0..max_count * 1.1)?;
            draw_cell_mesh(&mut chart, is_bottom, is_left, &columns[col].name, &columns[row].name)?;

            let width = (x1 - x0) / HISTOGRAM_BINS as f64;
            let fill = series_color(col).mix(0.6).filled();
            chart.draw_series(bins.iter().enumerate().map(|(b, &count)| {
                let left = x0 + b as f64 * width;
                Rectangle::new([(left, 0.0), (left + width, count as f64)], fill)
            }))?;
        } else {
            let (y0, y1) = ranges[row];
            let mut chart = ChartBuilder::on(cell)
                .margin(4)
                .x_label_area_size(if is_bottom { 40 } else { 0 })
                .y_label_area_size(if is_left { 50 } else { 0 })
                .build_cartesian_2d(x0..x1, y0..y1)?;
            draw_cell_mesh(&mut chart, is_bottom, is_left, &columns[col].name, &columns[row].name)?;

            let points = columns[col]
                .values
                .iter()
                .zip(&columns[row].values)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)));
            let style = series_color(0).mix(0.6).filled();
            chart.draw_series(points.map(|p| Circle::new(p, 2, style)))?;
        }
    }

    root.present()?;
    Ok(())
}

fn draw_cell_mesh<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    is_bottom: bool,
    is_left: bool,
    x_name: &str,
    y_name: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let fmt = |v: &f64| compact(*v);
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(3)
        .y_labels(3)
        .x_label_formatter(&fmt)
        .y_label_formatter(&fmt)
        .label_style(("sans-serif", 9));
    if is_bottom {
        mesh.x_desc(x_name);
    }
    if is_left {
        mesh.y_desc(y_name);
    }
    mesh.draw()
}

/// Count values into `bins` equal-width bins over `[lo, hi]`.
fn histogram(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 || !(hi > lo) {
        return counts;
    }
    let width = (hi - lo) / bins as f64;
    for &v in values.iter().filter(|v| v.is_finite()) {
        let b = ((v - lo) / width).floor();
        if b < 0.0 {
            continue;
        }
        counts[(b as usize).min(bins - 1)] += 1;
    }
    counts
}

fn compact(v: f64) -> String {
    let a = v.abs();
    if a >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}
