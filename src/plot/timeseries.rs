//! Stacked time-series panels, one per table column, on a shared date axis.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::domain::TimeTable;
use crate::plot::{date_to_x, padded_range, series_color, x_to_label};

const SIZE: (u32, u32) = (1000, 800);

/// Render one panel per column into an SVG file at `path`.
///
/// Every panel spans the full date range of the table; only the bottom panel
/// carries date tick labels. Missing cells break the line.
pub fn draw_indicator_panels(
    table: &TimeTable,
    title: &str,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 24))?;

    let xs: Vec<f64> = table.dates().iter().map(|&d| date_to_x(d)).collect();
    let (x0, x1) = match (xs.first(), xs.last()) {
        (Some(&a), Some(&b)) if b > a => (a, b),
        (Some(&a), _) => (a - 15.0, a + 15.0),
        _ => (0.0, 1.0),
    };
    // Short samples get month-level tick labels.
    let with_month = x1 - x0 < 3.0 * 365.0;

    let n = table.columns().len().max(1);
    let panels = root.split_evenly((n, 1));

    for (i, (panel, column)) in panels.iter().zip(table.columns()).enumerate() {
        let is_bottom = i + 1 == table.columns().len();
        let present: Vec<f64> = column.values.iter().flatten().copied().collect();
        let (y0, y1) = padded_range(&present);

        let mut chart = ChartBuilder::on(panel)
            .caption(&column.name, ("sans-serif", 14))
            .margin(6)
            .x_label_area_size(if is_bottom { 30 } else { 0 })
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(8)
            .y_labels(4)
            .x_label_formatter(&|x| x_to_label(*x, with_month))
            .y_label_formatter(&|y| format!("{y:.1}"))
            .label_style(("sans-serif", 11))
            .draw()?;

        let color = series_color(i);
        for segment in segments(&xs, &column.values) {
            if let [single] = segment.as_slice() {
                chart.draw_series(std::iter::once(Circle::new(*single, 2, color.filled())))?;
            } else {
                chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

/// Split a column into runs of consecutive present values.
fn segments(xs: &[f64], values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (&x, value) in xs.iter().zip(values) {
        match value {
            Some(y) => current.push((x, *y)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}
