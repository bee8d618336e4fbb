//! Weekly alignment of heterogeneous-frequency series.
//!
//! PMMS is a weekly survey (published Thursdays, dated Thursdays on FRED);
//! Treasury and mortgage-index data are daily. To compare them we join all
//! series onto a common weekly grid anchored on Wednesdays, the convention
//! the original survey week closes on.
//!
//! Policy: for each grid date, take the series' last observation on or before
//! that date (forward fill), or linearly interpolate between the bracketing
//! observations when `FillPolicy::Interpolate` is selected. Grid dates where
//! any series still has no value are dropped, so every surviving row is
//! complete.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::domain::{AlignedFrame, FillPolicy, FrameColumn, TimeSeries};
use crate::error::AppError;

/// First Wednesday on or after `date`.
pub fn next_wednesday(date: NaiveDate) -> NaiveDate {
    let target = Weekday::Wed.num_days_from_monday() as i64;
    let current = date.weekday().num_days_from_monday() as i64;
    let offset = (target - current).rem_euclid(7) as u64;
    date + Days::new(offset)
}

/// Every Wednesday in `[start, end]` (dates snapped forward to Wednesday).
pub fn wednesday_grid(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut date = next_wednesday(start);
    while date <= end {
        out.push(date);
        date = date + Days::new(7);
    }
    out
}

/// Join `series` onto the weekly Wednesday grid spanning their overlap.
///
/// The grid starts at the first Wednesday on or after the latest series
/// start (dropping leading dates where some series has no data yet) and ends
/// at the earliest series end (so interpolation never extrapolates).
pub fn align(series: &[&TimeSeries], policy: FillPolicy) -> Result<AlignedFrame, AppError> {
    if series.is_empty() {
        return Err(AppError::missing_data("No series to align."));
    }
    for s in series {
        if s.is_empty() {
            return Err(AppError::missing_data(format!(
                "Series {} ({}) has no observations in the requested range.",
                s.label(),
                s.id()
            )));
        }
    }

    // first_date/last_date are Some for every series after the emptiness check.
    let latest_start = series.iter().filter_map(|s| s.first_date()).max();
    let earliest_end = series.iter().filter_map(|s| s.last_date()).min();
    let (Some(start), Some(end)) = (latest_start, earliest_end) else {
        return Err(AppError::missing_data("No series to align."));
    };

    let mut dates = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); series.len()];

    'grid: for date in wednesday_grid(start, end) {
        let mut row = Vec::with_capacity(series.len());
        for s in series {
            let value = match policy {
                FillPolicy::ForwardFill => s.value_on_or_before(date),
                FillPolicy::Interpolate => s.interpolate_at(date),
            };
            match value {
                Some(v) => row.push(v),
                // Incomplete row: drop the date entirely rather than
                // fabricate a value.
                None => continue 'grid,
            }
        }
        dates.push(date);
        for (col, v) in values.iter_mut().zip(row) {
            col.push(v);
        }
    }

    if dates.is_empty() {
        return Err(AppError::missing_data(format!(
            "No overlapping weekly dates across {} series (overlap {start} to {end}).",
            series.len()
        )));
    }

    let columns = series
        .iter()
        .zip(values)
        .map(|(s, values)| FrameColumn {
            label: s.label().to_string(),
            values,
        })
        .collect();

    AlignedFrame::new(dates, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Unit;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(label: &str, points: Vec<(NaiveDate, f64)>) -> TimeSeries {
        TimeSeries::new("TEST", label, Unit::Percent, points)
    }

    #[test]
    fn next_wednesday_snaps_forward() {
        // 2024-01-03 is a Wednesday.
        assert_eq!(next_wednesday(d(2024, 1, 1)), d(2024, 1, 3));
        assert_eq!(next_wednesday(d(2024, 1, 3)), d(2024, 1, 3));
        assert_eq!(next_wednesday(d(2024, 1, 4)), d(2024, 1, 10));
    }

    #[test]
    fn grid_is_every_seven_days() {
        let grid = wednesday_grid(d(2024, 1, 1), d(2024, 1, 31));
        assert_eq!(
            grid,
            vec![d(2024, 1, 3), d(2024, 1, 10), d(2024, 1, 17), d(2024, 1, 24), d(2024, 1, 31)]
        );
        for date in grid {
            assert_eq!(date.weekday(), Weekday::Wed);
        }
    }

    #[test]
    fn every_aligned_row_is_complete() {
        // Weekly survey dated Thursdays vs daily data with a gap.
        let weekly = series(
            "W",
            vec![(d(2024, 1, 4), 6.6), (d(2024, 1, 11), 6.7), (d(2024, 1, 18), 6.8)],
        );
        let daily = series(
            "D",
            vec![
                (d(2024, 1, 2), 4.0),
                (d(2024, 1, 9), 4.1),
                (d(2024, 1, 16), 4.2),
                (d(2024, 1, 23), 4.3),
            ],
        );
        let frame = align(&[&weekly, &daily], FillPolicy::ForwardFill).unwrap();
        assert!(!frame.is_empty());
        let w = frame.column("W").unwrap();
        let d_col = frame.column("D").unwrap();
        assert_eq!(w.len(), frame.len());
        assert_eq!(d_col.len(), frame.len());
        for v in w.iter().chain(d_col) {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn forward_fill_carries_the_last_observation() {
        let weekly = series("W", vec![(d(2024, 1, 4), 6.6), (d(2024, 1, 11), 6.7)]);
        let daily = series(
            "D",
            vec![(d(2024, 1, 8), 4.0), (d(2024, 1, 10), 4.5), (d(2024, 1, 15), 5.0)],
        );
        let frame = align(&[&weekly, &daily], FillPolicy::ForwardFill).unwrap();
        // Overlap is [Jan 8, Jan 11]; the only Wednesday is Jan 10.
        assert_eq!(frame.dates(), &[d(2024, 1, 10)]);
        assert_eq!(frame.column("W").unwrap(), &[6.6]);
        assert_eq!(frame.column("D").unwrap(), &[4.5]);
    }

    #[test]
    fn leading_dates_before_all_series_have_data_are_dropped() {
        let early = series(
            "A",
            vec![(d(2024, 1, 3), 1.0), (d(2024, 1, 10), 1.0), (d(2024, 1, 17), 1.0)],
        );
        let late = series("B", vec![(d(2024, 1, 15), 2.0), (d(2024, 1, 22), 2.0)]);
        let frame = align(&[&early, &late], FillPolicy::ForwardFill).unwrap();
        // B starts Jan 15, so Jan 3 and Jan 10 must not appear.
        assert_eq!(frame.dates(), &[d(2024, 1, 17)]);
    }

    #[test]
    fn empty_series_is_missing_data() {
        let a = series("A", vec![(d(2024, 1, 3), 1.0)]);
        let b = series("B", vec![]);
        let err = align(&[&a, &b], FillPolicy::ForwardFill).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MissingData);
    }

    #[test]
    fn disjoint_ranges_are_missing_data() {
        let a = series("A", vec![(d(2024, 1, 3), 1.0), (d(2024, 1, 10), 1.0)]);
        let b = series("B", vec![(d(2024, 3, 6), 2.0), (d(2024, 3, 13), 2.0)]);
        let err = align(&[&a, &b], FillPolicy::ForwardFill).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::MissingData);
    }

    #[test]
    fn interpolation_uses_bracketing_observations() {
        let weekly = series("W", vec![(d(2024, 1, 3), 6.0), (d(2024, 1, 10), 6.0)]);
        // Daily series observed Mon Jan 8 (2.0) and Fri Jan 12 (4.0);
        // Wednesday Jan 10 sits halfway.
        let daily = series("D", vec![(d(2024, 1, 8), 2.0), (d(2024, 1, 12), 4.0)]);
        let frame = align(&[&weekly, &daily], FillPolicy::Interpolate).unwrap();
        assert_eq!(frame.dates(), &[d(2024, 1, 10)]);
        let v = frame.column("D").unwrap()[0];
        assert!((v - 3.0).abs() < 1e-12);
    }
}
