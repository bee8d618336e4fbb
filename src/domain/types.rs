//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during alignment and fitting
//! - exported to CSV
//! - reloaded later for plotting or comparisons

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Unit of a rate series' values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Percentage points (e.g. `6.72` for 6.72%). FRED rate series use this.
    Percent,
    /// Basis points (e.g. `245.0`). Spreads are kept in bp internally.
    BasisPoints,
}

impl Unit {
    pub fn label(self) -> &'static str {
        match self {
            Unit::Percent => "%",
            Unit::BasisPoints => "bp",
        }
    }
}

/// An immutable, date-ordered rate series as returned by the fetcher.
///
/// Invariants (enforced by the constructor):
/// - dates are strictly increasing
/// - at most one value per date (the last one supplied wins)
/// - all values are finite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    id: String,
    label: String,
    unit: Unit,
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    /// Build a series from raw observations, sorting and deduplicating by date.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        unit: Unit,
        points: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        let map: BTreeMap<NaiveDate, f64> = points
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .collect();
        Self {
            id: id.into(),
            label: label.into(),
            unit,
            points: map.into_iter().collect(),
        }
    }

    /// Source identifier (e.g. the FRED series id).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Column label used in frames, CSV headers, and reports.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|(d, _)| *d)
    }

    /// Last observation on or before `date` (last-observation-carried-forward).
    pub fn value_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.points.partition_point(|(d, _)| *d <= date);
        if idx == 0 {
            None
        } else {
            Some(self.points[idx - 1].1)
        }
    }

    /// Value at `date`, linearly interpolated between the bracketing
    /// observations. `None` outside the observed span (no extrapolation).
    pub fn interpolate_at(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.points.partition_point(|(d, _)| *d < date);
        if let Some(&(d, v)) = self.points.get(idx) {
            if d == date {
                return Some(v);
            }
        }
        if idx == 0 || idx == self.points.len() {
            return None;
        }
        let (d0, v0) = self.points[idx - 1];
        let (d1, v1) = self.points[idx];
        let span = (d1 - d0).num_days() as f64;
        let frac = (date - d0).num_days() as f64 / span;
        Some(v0 + (v1 - v0) * frac)
    }

    /// Derive a new series by applying `f` to every value.
    ///
    /// Used for the CC30 proxy (PMMS shifted by a fixed offset); the receiver
    /// is untouched.
    pub fn map_values(
        &self,
        id: impl Into<String>,
        label: impl Into<String>,
        f: impl Fn(f64) -> f64,
    ) -> TimeSeries {
        TimeSeries::new(
            id,
            label,
            self.unit,
            self.points.iter().map(|&(d, v)| (d, f(v))),
        )
    }
}

/// One named column of an [`AlignedFrame`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameColumn {
    pub label: String,
    pub values: Vec<f64>,
}

/// Series joined onto a common weekly date grid.
///
/// Invariant: every column has exactly one value per date (no partial rows);
/// the constructor rejects ragged input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<FrameColumn>,
}

impl AlignedFrame {
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<FrameColumn>) -> Result<Self, AppError> {
        for col in &columns {
            if col.values.len() != dates.len() {
                return Err(AppError::missing_data(format!(
                    "Aligned column '{}' has {} values for {} dates.",
                    col.label,
                    col.values.len(),
                    dates.len()
                )));
            }
        }
        Ok(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.label.as_str())
    }

    pub fn column(&self, label: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.values.as_slice())
    }
}

/// A spread between two aligned series, in basis points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spread {
    pub name: String,
    pub leg_a: String,
    pub leg_b: String,
    pub dates: Vec<NaiveDate>,
    pub values_bp: Vec<f64>,
}

impl Spread {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Gap policy when joining series onto the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Use the last observation on or before each grid date.
    #[value(name = "forward")]
    ForwardFill,
    /// Linearly interpolate between the bracketing observations.
    Interpolate,
}

/// Which regression model(s) to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    /// Fit all families and choose the best by BIC.
    Auto,
    Linear,
    Poly2,
    Poly3,
    /// Fit and report all families.
    All,
}

impl ModelSpec {
    /// The single requested kind, or `None` for `Auto`/`All`.
    pub fn to_kind(self) -> Option<ModelKind> {
        match self {
            ModelSpec::Auto | ModelSpec::All => None,
            ModelSpec::Linear => Some(ModelKind::Linear),
            ModelSpec::Poly2 => Some(ModelKind::Poly2),
            ModelSpec::Poly3 => Some(ModelKind::Poly3),
        }
    }
}

/// Concrete fitted model kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Linear,
    Poly2,
    Poly3,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::Poly2, ModelKind::Poly3];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear",
            ModelKind::Poly2 => "Poly (deg 2)",
            ModelKind::Poly3 => "Poly (deg 3)",
        }
    }

    /// Polynomial degree of the model.
    pub fn degree(self) -> usize {
        match self {
            ModelKind::Linear => 1,
            ModelKind::Poly2 => 2,
            ModelKind::Poly3 => 3,
        }
    }

    /// Number of coefficients (intercept + one per power).
    pub fn param_count(self) -> usize {
        self.degree() + 1
    }

    /// Minimum observations required for a non-degenerate fit.
    ///
    /// One more than the parameter count, so there is at least one residual
    /// degree of freedom.
    pub fn min_points(self) -> usize {
        self.degree() + 2
    }
}

/// The independent variable of a regression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regressor {
    /// Row index on the weekly grid (0, 1, 2, ...).
    TimeIndex,
    /// A named column of the aligned frame, in its native unit.
    Column(String),
}

impl Regressor {
    pub fn label(&self) -> &str {
        match self {
            Regressor::TimeIndex => "week index",
            Regressor::Column(name) => name,
        }
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub bic: f64,
    pub n: usize,
}

/// Fit output for a single model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionResult {
    pub model: ModelKind,
    /// Coefficients in ascending powers of x (intercept first).
    pub coefficients: Vec<f64>,
    pub quality: FitQuality,
    /// Predicted values, one per input row.
    pub fitted: Vec<f64>,
    /// `observed - predicted`, one per input row.
    pub residuals: Vec<f64>,
}

/// A full analysis' configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub fill: FillPolicy,
    pub model_spec: ModelSpec,
    pub out_dir: PathBuf,
    /// Number of recent weekly rows to print in the report.
    pub recent: usize,
    pub plot: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_sorts_and_dedupes_by_date() {
        let ts = TimeSeries::new(
            "TEST",
            "Test",
            Unit::Percent,
            vec![
                (d(2024, 1, 3), 2.0),
                (d(2024, 1, 1), 1.0),
                (d(2024, 1, 3), 3.0),
            ],
        );
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.points()[0], (d(2024, 1, 1), 1.0));
        // Later value for a duplicate date wins.
        assert_eq!(ts.points()[1], (d(2024, 1, 3), 3.0));
    }

    #[test]
    fn locf_picks_on_or_before() {
        let ts = TimeSeries::new(
            "TEST",
            "Test",
            Unit::Percent,
            vec![(d(2024, 1, 1), 1.0), (d(2024, 1, 8), 2.0)],
        );
        assert_eq!(ts.value_on_or_before(d(2023, 12, 31)), None);
        assert_eq!(ts.value_on_or_before(d(2024, 1, 1)), Some(1.0));
        assert_eq!(ts.value_on_or_before(d(2024, 1, 5)), Some(1.0));
        assert_eq!(ts.value_on_or_before(d(2024, 1, 8)), Some(2.0));
        assert_eq!(ts.value_on_or_before(d(2024, 2, 1)), Some(2.0));
    }

    #[test]
    fn interpolation_is_exact_at_observations_and_linear_between() {
        let ts = TimeSeries::new(
            "TEST",
            "Test",
            Unit::Percent,
            vec![(d(2024, 1, 1), 1.0), (d(2024, 1, 5), 3.0)],
        );
        assert_eq!(ts.interpolate_at(d(2024, 1, 1)), Some(1.0));
        assert_eq!(ts.interpolate_at(d(2024, 1, 5)), Some(3.0));
        let mid = ts.interpolate_at(d(2024, 1, 3)).unwrap();
        assert!((mid - 2.0).abs() < 1e-12);
        // No extrapolation.
        assert_eq!(ts.interpolate_at(d(2023, 12, 31)), None);
        assert_eq!(ts.interpolate_at(d(2024, 1, 6)), None);
    }

    #[test]
    fn frame_rejects_ragged_columns() {
        let dates = vec![d(2024, 1, 3), d(2024, 1, 10)];
        let cols = vec![FrameColumn {
            label: "A".to_string(),
            values: vec![1.0],
        }];
        assert!(AlignedFrame::new(dates, cols).is_err());
    }

    #[test]
    fn min_points_leaves_a_residual_degree_of_freedom() {
        assert_eq!(ModelKind::Linear.min_points(), 3);
        assert_eq!(ModelKind::Poly2.min_points(), 4);
        assert_eq!(ModelKind::Poly3.min_points(), 5);
    }
}
