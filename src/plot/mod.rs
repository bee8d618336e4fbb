//! PNG chart rendering with Plotters.
//!
//! All charts are written as bitmap artifacts next to the CSV exports. We keep
//! the drawing code data-driven: callers hand in already-computed series and
//! bounds come from the data, so these functions stay pure render steps.
//!
//! The x axis for time charts is "days since the first aligned date" as f64,
//! with a tick formatter mapping back to calendar dates. This avoids pulling
//! Plotters' date-coordinate machinery in for what is a fixed weekly grid.

use std::path::Path;

use chrono::{Days, NaiveDate};
use plotters::prelude::*;

use crate::domain::{AlignedFrame, RegressionResult, Spread};
use crate::error::AppError;
use crate::models::predict;

const CHART_SIZE: (u32, u32) = (1280, 720);
const PANEL_SIZE: (u32, u32) = (1800, 560);

/// Spread history line chart with a horizontal mean line.
pub fn spread_history(path: &Path, spread: &Spread, title: &str) -> Result<(), AppError> {
    draw_spread_history(path, spread, title).map_err(|e| chart_error(path, e))
}

/// Both legs of a spread on one chart, in percent.
pub fn rates_comparison(
    path: &Path,
    frame: &AlignedFrame,
    labels: [&str; 2],
    title: &str,
) -> Result<(), AppError> {
    draw_rates_comparison(path, frame, labels, title).map_err(|e| chart_error(path, e))
}

/// One scatter-plus-fit panel per fitted model.
pub fn regression_panel(
    path: &Path,
    x: &[f64],
    y: &[f64],
    fits: &[RegressionResult],
    x_label: &str,
    y_label: &str,
) -> Result<(), AppError> {
    if fits.is_empty() {
        return Err(AppError::fit("No fitted models to plot."));
    }
    draw_regression_panel(path, x, y, fits, x_label, y_label).map_err(|e| chart_error(path, e))
}

/// Residuals of the chosen fit over time, around a zero line.
pub fn residuals_chart(
    path: &Path,
    dates: &[NaiveDate],
    fit: &RegressionResult,
    title: &str,
) -> Result<(), AppError> {
    draw_residuals(path, dates, fit, title).map_err(|e| chart_error(path, e))
}

fn chart_error(path: &Path, e: Box<dyn std::error::Error>) -> AppError {
    AppError::io(format!("Failed to render chart '{}': {e}", path.display()))
}

fn day_offsets(dates: &[NaiveDate]) -> Vec<f64> {
    let Some(&first) = dates.first() else {
        return Vec::new();
    };
    dates.iter().map(|d| (*d - first).num_days() as f64).collect()
}

fn format_day_offset(first: NaiveDate, offset: f64) -> String {
    let days = offset.round().max(0.0) as u64;
    (first + Days::new(days)).format("%Y-%m").to_string()
}

fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(1e-6);
    (min - pad, max + pad)
}

fn draw_spread_history(
    path: &Path,
    spread: &Spread,
    title: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = *spread
        .dates
        .first()
        .ok_or("Cannot plot an empty spread series.")?;
    let xs = day_offsets(&spread.dates);
    let (y0, y1) = padded_bounds(&spread.values_bp);
    let x1 = xs.last().copied().unwrap_or(1.0).max(1.0);
    let mean = spread.values_bp.iter().sum::<f64>() / spread.values_bp.len() as f64;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(0.0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(format!("{} (bp)", spread.name))
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| format_day_offset(first, *v))
        .draw()?;

    let line: Vec<(f64, f64)> = xs.iter().copied().zip(spread.values_bp.iter().copied()).collect();

    chart.draw_series(AreaSeries::new(line.iter().copied(), y0, BLUE.mix(0.15)))?;
    chart
        .draw_series(LineSeries::new(line.iter().copied(), &BLUE))?
        .label(spread.name.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new([(0.0, mean), (x1, mean)], &RED))?
        .label(format!("Mean: {mean:.1} bp"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_rates_comparison(
    path: &Path,
    frame: &AlignedFrame,
    labels: [&str; 2],
    title: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = *frame
        .dates()
        .first()
        .ok_or("Cannot plot an empty aligned frame.")?;
    let xs = day_offsets(frame.dates());
    let x1 = xs.last().copied().unwrap_or(1.0).max(1.0);

    let mut all = Vec::new();
    for label in labels {
        let col = frame
            .column(label)
            .ok_or_else(|| format!("Column '{label}' not found in aligned frame."))?;
        all.extend_from_slice(col);
    }
    let (y0, y1) = padded_bounds(&all);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(0.0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Rate (%)")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| format_day_offset(first, *v))
        .draw()?;

    let colors = [BLUE, RED];
    for (label, color) in labels.into_iter().zip(colors) {
        let col = frame.column(label).unwrap_or(&[]);
        let series: Vec<(f64, f64)> = xs.iter().copied().zip(col.iter().copied()).collect();
        chart
            .draw_series(LineSeries::new(series, &color))?
            .label(label.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_regression_panel(
    path: &Path,
    x: &[f64],
    y: &[f64],
    fits: &[RegressionResult],
    x_label: &str,
    y_label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x0, x1) = padded_bounds(x);
    let (y0, y1) = padded_bounds(y);

    let root = BitMapBackend::new(path, PANEL_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, fits.len()));

    for (area, fit) in panels.iter().zip(fits) {
        let mut chart = ChartBuilder::on(area)
            .caption(
                format!("{}  R²={:.4}", fit.model.display_name(), fit.quality.r_squared),
                ("sans-serif", 22),
            )
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 56)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(6)
            .y_labels(6)
            .draw()?;

        chart.draw_series(
            x.iter()
                .zip(y)
                .map(|(&xi, &yi)| Circle::new((xi, yi), 2, BLUE.mix(0.4).filled())),
        )?;

        // Evaluate the fitted polynomial on a dense grid so curvature shows.
        let steps = 200;
        let curve: Vec<(f64, f64)> = (0..=steps)
            .map(|i| {
                let xi = x0 + (x1 - x0) * i as f64 / steps as f64;
                (xi, predict(xi, &fit.coefficients))
            })
            .collect();
        chart.draw_series(LineSeries::new(curve, &RED))?;
    }

    root.present()?;
    Ok(())
}

fn draw_residuals(
    path: &Path,
    dates: &[NaiveDate],
    fit: &RegressionResult,
    title: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let first = *dates.first().ok_or("Cannot plot residuals for an empty fit.")?;
    let xs = day_offsets(dates);
    let x1 = xs.last().copied().unwrap_or(1.0).max(1.0);
    let (y0, y1) = padded_bounds(&fit.residuals);
    // Keep the zero line visible even when residuals are one-sided.
    let y0 = y0.min(0.0);
    let y1 = y1.max(0.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44)
        .build_cartesian_2d(0.0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Residual (bp)")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|v| format_day_offset(first, *v))
        .draw()?;

    chart.draw_series(LineSeries::new([(0.0, 0.0), (x1, 0.0)], &BLACK))?;
    chart.draw_series(
        xs.iter()
            .zip(&fit.residuals)
            .map(|(&xi, &ri)| Circle::new((xi, ri), 2, RED.mix(0.6).filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn day_offsets_are_relative_to_the_first_date() {
        let dates = vec![d(2024, 1, 3), d(2024, 1, 10), d(2024, 1, 24)];
        assert_eq!(day_offsets(&dates), vec![0.0, 7.0, 21.0]);
    }

    #[test]
    fn offset_formatter_maps_back_to_calendar_months() {
        assert_eq!(format_day_offset(d(2024, 1, 3), 0.0), "2024-01");
        assert_eq!(format_day_offset(d(2024, 1, 3), 60.0), "2024-03");
    }

    #[test]
    fn padded_bounds_never_collapse() {
        let (lo, hi) = padded_bounds(&[5.0, 5.0, 5.0]);
        assert!(lo < 5.0 && hi > 5.0);
        let (lo, hi) = padded_bounds(&[]);
        assert!(lo < hi);
    }
}
