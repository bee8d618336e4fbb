//! Spread computation between two aligned series.
//!
//! Pure pointwise subtraction: no smoothing, no resampling, and the output
//! carries exactly the frame's timestamp set.

use crate::domain::{AlignedFrame, Spread};
use crate::error::AppError;

/// Conversion from a percentage-point difference to basis points.
pub const BP_PER_PERCENT: f64 = 100.0;

/// Compute `(a - b) * 100` in basis points over an aligned frame.
pub fn compute(
    frame: &AlignedFrame,
    leg_a: &str,
    leg_b: &str,
    name: &str,
) -> Result<Spread, AppError> {
    let a = frame
        .column(leg_a)
        .ok_or_else(|| AppError::usage(format!("Column '{leg_a}' not found in aligned frame.")))?;
    let b = frame
        .column(leg_b)
        .ok_or_else(|| AppError::usage(format!("Column '{leg_b}' not found in aligned frame.")))?;

    let values_bp = a
        .iter()
        .zip(b)
        .map(|(&va, &vb)| (va - vb) * BP_PER_PERCENT)
        .collect();

    Ok(Spread {
        name: name.to_string(),
        leg_a: leg_a.to_string(),
        leg_b: leg_b.to_string(),
        dates: frame.dates().to_vec(),
        values_bp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FrameColumn;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn frame(a: Vec<f64>, b: Vec<f64>) -> AlignedFrame {
        let dates = (0..a.len() as u64)
            .map(|i| d(2024, 1, 3) + chrono::Days::new(7 * i))
            .collect();
        AlignedFrame::new(
            dates,
            vec![
                FrameColumn { label: "A".to_string(), values: a },
                FrameColumn { label: "B".to_string(), values: b },
            ],
        )
        .unwrap()
    }

    #[test]
    fn spread_is_difference_times_one_hundred_exactly() {
        let f = frame(vec![6.72, 6.60, 6.95], vec![4.25, 4.10, 4.40]);
        let s = compute(&f, "A", "B", "Spread").unwrap();
        for (i, (&a, &b)) in f
            .column("A")
            .unwrap()
            .iter()
            .zip(f.column("B").unwrap())
            .enumerate()
        {
            assert_eq!(s.values_bp[i], (a - b) * 100.0);
        }
    }

    #[test]
    fn constant_legs_give_constant_spread() {
        let f = frame(vec![2.0, 2.0, 2.0], vec![0.5, 0.5, 0.5]);
        let s = compute(&f, "A", "B", "Spread").unwrap();
        assert_eq!(s.values_bp, vec![150.0, 150.0, 150.0]);
    }

    #[test]
    fn timestamps_are_preserved_exactly() {
        let f = frame(vec![1.0, 2.0], vec![0.5, 0.5]);
        let s = compute(&f, "A", "B", "Spread").unwrap();
        assert_eq!(s.dates, f.dates());
        assert_eq!(s.len(), f.len());
    }

    #[test]
    fn unknown_column_is_a_usage_error() {
        let f = frame(vec![1.0], vec![0.5]);
        let err = compute(&f, "A", "C", "Spread").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Usage);
    }
}
