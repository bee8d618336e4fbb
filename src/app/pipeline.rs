//! Shared analysis pipeline used by every CLI subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! FRED fetch -> weekly alignment -> spread -> statistics -> regressions
//!
//! The command handlers then focus on presentation (printing, CSV, PNG).

use crate::align;
use crate::data::{self, Cc30Source, FredClient};
use crate::domain::{AlignedFrame, AnalysisConfig, Regressor, Spread};
use crate::error::AppError;
use crate::fit::{FitSelection, fit_and_select};
use crate::report::stats::{SpreadStats, describe};
use crate::spread;

/// All computed outputs of a single spread analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub frame: AlignedFrame,
    pub spread: Spread,
    pub stats: SpreadStats,
    pub regressor: Regressor,
    pub regression: FitSelection,
    /// Extra provenance for the report (e.g. the CC30 proxy note).
    pub source_note: Option<String>,
}

/// PMMS vs 10-year Treasury: spread history plus a trend regression of the
/// spread on the weekly time index.
pub fn treasury_spread(
    config: &AnalysisConfig,
    client: &FredClient,
) -> Result<AnalysisOutput, AppError> {
    let pmms = client.fetch_pmms(config.start, config.end)?;
    let treasury = client.fetch_treasury_10y(config.start, config.end)?;

    let frame = align::align(&[&pmms, &treasury], config.fill)?;
    let spread = spread::compute(
        &frame,
        data::LABEL_PMMS,
        data::LABEL_TREASURY,
        "PMMS_Treasury_Spread",
    )?;
    finish(config, frame, spread, Regressor::TimeIndex, None)
}

/// PMMS vs 30-year current coupon: the primary-secondary spread (PSS30),
/// regressed on the CC30 level as in the original study.
pub fn coupon_spread(
    config: &AnalysisConfig,
    client: &FredClient,
) -> Result<AnalysisOutput, AppError> {
    let pmms = client.fetch_pmms(config.start, config.end)?;
    let (cc30, source) = client.fetch_cc30(&pmms, config.start, config.end)?;

    let note = match &source {
        Cc30Source::Fred(_) => format!("CC30 from {}", source.describe()),
        Cc30Source::PmmsProxy => format!("CC30 is a {}", source.describe()),
    };

    let frame = align::align(&[&pmms, &cc30], config.fill)?;
    let spread = spread::compute(&frame, data::LABEL_PMMS, data::LABEL_CC30, "PSS30")?;
    finish(
        config,
        frame,
        spread,
        Regressor::Column(data::LABEL_CC30.to_string()),
        Some(note),
    )
}

/// Shared tail of both analyses: statistics + regressions.
fn finish(
    config: &AnalysisConfig,
    frame: AlignedFrame,
    spread: Spread,
    regressor: Regressor,
    source_note: Option<String>,
) -> Result<AnalysisOutput, AppError> {
    let stats = describe(&spread.values_bp).ok_or_else(|| {
        AppError::missing_data(format!("Spread {} has no aligned rows.", spread.name))
    })?;

    let x = regressor_values(&frame, &regressor)?;
    let regression = fit_and_select(config.model_spec, &x, &spread.values_bp)?;

    Ok(AnalysisOutput {
        frame,
        spread,
        stats,
        regressor,
        regression,
        source_note,
    })
}

/// Materialize the independent variable for a regression.
pub fn regressor_values(frame: &AlignedFrame, regressor: &Regressor) -> Result<Vec<f64>, AppError> {
    match regressor {
        Regressor::TimeIndex => Ok((0..frame.len()).map(|i| i as f64).collect()),
        Regressor::Column(name) => frame
            .column(name)
            .map(|values| values.to_vec())
            .ok_or_else(|| {
                AppError::usage(format!("Regressor column '{name}' not found in aligned frame."))
            }),
    }
}
