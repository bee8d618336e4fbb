//! Run the requested model families and select the best fit.
//!
//! In `Auto`/`All` mode a family that cannot be fit (e.g. a cubic on too few
//! weeks) is recorded with its reason and the remaining families proceed;
//! explicitly requesting a single family makes its failure terminal.

use crate::domain::{ModelKind, ModelSpec, RegressionResult};
use crate::error::AppError;
use crate::fit::fitter::fit_model;

/// Outcome of fitting the requested families.
#[derive(Debug, Clone)]
pub struct FitSelection {
    /// Successful fits, in request order.
    pub fits: Vec<RegressionResult>,
    /// Families that could not be fit, with the reason.
    pub skipped: Vec<(ModelKind, String)>,
    /// Index into `fits` of the lowest-BIC model.
    best: usize,
}

impl FitSelection {
    pub fn best(&self) -> &RegressionResult {
        &self.fits[self.best]
    }
}

/// Fit the families requested by `spec` against `(x, y)`.
pub fn fit_and_select(spec: ModelSpec, x: &[f64], y: &[f64]) -> Result<FitSelection, AppError> {
    let kinds: Vec<ModelKind> = match spec.to_kind() {
        Some(kind) => vec![kind],
        None => ModelKind::ALL.to_vec(),
    };
    let single = kinds.len() == 1;

    let mut fits = Vec::new();
    let mut skipped = Vec::new();
    for kind in kinds {
        match fit_model(kind, x, y) {
            Ok(fit) => fits.push(fit),
            Err(err) if single => return Err(err),
            Err(err) => skipped.push((kind, err.to_string())),
        }
    }

    let best = fits
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.quality
                .bic
                .partial_cmp(&b.quality.bic)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .ok_or_else(|| {
            AppError::insufficient_data(format!(
                "No model could be fit: {}",
                skipped
                    .iter()
                    .map(|(kind, reason)| format!("{}: {reason}", kind.display_name()))
                    .collect::<Vec<_>>()
                    .join(" | ")
            ))
        })?;

    Ok(FitSelection { fits, skipped, best })
}
