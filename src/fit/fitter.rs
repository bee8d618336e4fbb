//! Low-level fitting for a single model kind.
//!
//! Given regressor values `x_i` and observations `y_i`, we solve the ordinary
//! least squares problem over the polynomial basis of the requested degree
//! and derive the diagnostics the report and the charts need: fitted values,
//! residuals, SSE, RMSE, R², and BIC.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitQuality, ModelKind, RegressionResult};
use crate::error::AppError;
use crate::math::solve_least_squares;
use crate::models::{fill_design_row, predict};

/// Floor for SSE inside the BIC logarithm; an exact fit would otherwise
/// produce `ln(0)`.
const SSE_FLOOR: f64 = 1e-12;

/// Fit one polynomial model by OLS.
///
/// Fails with `InsufficientData` when there are fewer than
/// `degree + 2` observations: with `degree + 1` points a polynomial
/// interpolates them exactly, which is a degenerate "fit".
pub fn fit_model(model: ModelKind, x: &[f64], y: &[f64]) -> Result<RegressionResult, AppError> {
    if x.len() != y.len() {
        return Err(AppError::fit(format!(
            "Regressor and observation lengths differ ({} vs {}).",
            x.len(),
            y.len()
        )));
    }

    let n = x.len();
    if n < model.min_points() {
        return Err(AppError::insufficient_data(format!(
            "{} regression needs at least {} observations, got {n}.",
            model.display_name(),
            model.min_points()
        )));
    }

    let p = model.param_count();
    let mut design = DMatrix::zeros(n, p);
    let mut row = vec![0.0; p];
    for (i, &xi) in x.iter().enumerate() {
        fill_design_row(model, xi, &mut row);
        for (j, &v) in row.iter().enumerate() {
            design[(i, j)] = v;
        }
    }

    let yv = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &yv).ok_or_else(|| {
        AppError::fit(format!(
            "{} regression is too ill-conditioned to solve.",
            model.display_name()
        ))
    })?;
    let coefficients: Vec<f64> = beta.iter().copied().collect();

    let mut fitted = Vec::with_capacity(n);
    let mut residuals = Vec::with_capacity(n);
    for (&xi, &yi) in x.iter().zip(y) {
        let y_fit = predict(xi, &coefficients);
        if !y_fit.is_finite() {
            return Err(AppError::fit(
                "Non-finite model prediction during residual computation.",
            ));
        }
        fitted.push(y_fit);
        residuals.push(yi - y_fit);
    }

    let quality = quality_of(&residuals, y, p);

    Ok(RegressionResult {
        model,
        coefficients,
        quality,
        fitted,
        residuals,
    })
}

fn quality_of(residuals: &[f64], y: &[f64], param_count: usize) -> FitQuality {
    let n = y.len();
    let nf = n as f64;

    let sse: f64 = residuals.iter().map(|r| r * r).sum();
    let rmse = (sse / nf).sqrt();

    let mean = y.iter().sum::<f64>() / nf;
    let ss_tot: f64 = y.iter().map(|v| (v - mean) * (v - mean)).sum();

    // A constant dependent variable has no variance to explain; report R² = 0
    // rather than failing. Otherwise OLS guarantees R² in [0, 1] up to
    // floating-point noise, which the clamp absorbs.
    let r_squared = if ss_tot == 0.0 {
        0.0
    } else {
        (1.0 - sse / ss_tot).clamp(0.0, 1.0)
    };

    let bic = nf * (sse.max(SSE_FLOOR) / nf).ln() + (param_count as f64) * nf.ln();

    FitQuality {
        sse,
        rmse,
        r_squared,
        bic,
        n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn linear_fit_recovers_a_line() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 150.0 + 12.5 * v).collect();
        let fit = fit_model(ModelKind::Linear, &x, &y).unwrap();
        assert!((fit.coefficients[0] - 150.0).abs() < 1e-8);
        assert!((fit.coefficients[1] - 12.5).abs() < 1e-8);
        assert!(fit.quality.r_squared > 0.999999);
    }

    #[test]
    fn linear_residuals_sum_to_zero() {
        // OLS with an intercept has zero-sum residuals.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [3.1, 2.7, 5.2, 4.9, 7.3, 6.6];
        let fit = fit_model(ModelKind::Linear, &x, &y).unwrap();
        let sum: f64 = fit.residuals.iter().sum();
        assert!(sum.abs() < 1e-8, "residual sum should be ~0, got {sum}");
    }

    #[test]
    fn r_squared_stays_in_unit_interval() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, -3.0, 7.0, 0.5, 2.0];
        for kind in ModelKind::ALL {
            let fit = fit_model(kind, &x, &y).unwrap();
            assert!(
                (0.0..=1.0).contains(&fit.quality.r_squared),
                "{:?} R² out of range: {}",
                kind,
                fit.quality.r_squared
            );
        }
    }

    #[test]
    fn constant_observations_fit_without_crashing() {
        // Spread of [2,2,2] vs [0.5,0.5,0.5] legs: 150bp at every date.
        let x = [0.0, 1.0, 2.0];
        let y = [150.0, 150.0, 150.0];
        let fit = fit_model(ModelKind::Linear, &x, &y).unwrap();
        assert!(fit.coefficients[1].abs() < 1e-8, "slope should be ~0");
        assert_eq!(fit.quality.r_squared, 0.0);
        assert!(fit.quality.sse < 1e-12);
    }

    #[test]
    fn cubic_on_three_points_is_insufficient_data() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.0, 4.0, 9.0];
        let err = fit_model(ModelKind::Poly3, &x, &y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(err.to_string().contains("at least 5"));
    }

    #[test]
    fn quadratic_fit_recovers_a_parabola() {
        let x = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 - v + 0.5 * v * v).collect();
        let fit = fit_model(ModelKind::Poly2, &x, &y).unwrap();
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-8);
        assert!((fit.coefficients[1] + 1.0).abs() < 1e-8);
        assert!((fit.coefficients[2] - 0.5).abs() < 1e-8);
        assert!(fit.quality.rmse < 1e-8);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = fit_model(ModelKind::Linear, &[1.0, 2.0, 3.0], &[1.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fit);
    }
}
