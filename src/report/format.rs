//! Formatted terminal output for a spread analysis.

use crate::domain::{AlignedFrame, RegressionResult, Regressor, Spread};
use crate::fit::FitSelection;
use crate::report::stats::SpreadStats;

/// Format the run header + dataset summary for one analysis.
pub fn format_analysis_summary(
    title: &str,
    frame: &AlignedFrame,
    spread: &Spread,
    stats: &SpreadStats,
    source_note: Option<&str>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {title} ===\n"));
    if let (Some(first), Some(last)) = (frame.dates().first(), frame.dates().last()) {
        out.push_str(&format!(
            "Weekly rows (Wed): n={} | {first} to {last}\n",
            frame.len()
        ));
    }
    out.push_str(&format!(
        "Legs: {} - {} -> {} (bp)\n",
        spread.leg_a, spread.leg_b, spread.name
    ));
    if let Some(note) = source_note {
        out.push_str(&format!("Note: {note}\n"));
    }

    out.push_str(&format!("\n{} summary (bp):\n", spread.name));
    out.push_str(&format_stats(stats));
    out.push('\n');

    out
}

/// Format `describe`-style statistics, one stat per line.
pub fn format_stats(stats: &SpreadStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("  count  {}\n", stats.count));
    out.push_str(&format!("  mean   {:>10.2}\n", stats.mean));
    out.push_str(&format!("  std    {:>10.2}\n", stats.std));
    out.push_str(&format!("  min    {:>10.2}\n", stats.min));
    out.push_str(&format!("  25%    {:>10.2}\n", stats.q25));
    out.push_str(&format!("  50%    {:>10.2}\n", stats.median));
    out.push_str(&format!("  75%    {:>10.2}\n", stats.q75));
    out.push_str(&format!("  max    {:>10.2}\n", stats.max));
    out
}

/// Format regression diagnostics for every fitted family.
pub fn format_regression_summary(
    selection: &FitSelection,
    regressor: &Regressor,
    dependent: &str,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Regression of {dependent} (bp) on {}:\n",
        regressor.label()
    ));
    for fit in &selection.fits {
        let chosen = if std::ptr::eq(fit, selection.best()) { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<12} {}\n              R²={:.4} RMSE={:.2}bp BIC={:.1} n={}\n",
            fit.model.display_name(),
            format_equation(fit, dependent, regressor.label()),
            fit.quality.r_squared,
            fit.quality.rmse,
            fit.quality.bic,
            fit.quality.n,
        ));
    }
    for (kind, reason) in &selection.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", kind.display_name()));
    }

    out
}

/// Render the fitted equation, e.g. `PSS30 = 312.1 - 28.4·x + 1.9·x^2`.
fn format_equation(fit: &RegressionResult, dependent: &str, x_name: &str) -> String {
    let mut terms = String::new();
    for (power, &c) in fit.coefficients.iter().enumerate() {
        let magnitude = c.abs();
        let sign = if c < 0.0 { "-" } else { "+" };
        if power == 0 {
            if c < 0.0 {
                terms.push_str(&format!("-{magnitude:.4}"));
            } else {
                terms.push_str(&format!("{magnitude:.4}"));
            }
        } else {
            terms.push_str(&format!(" {sign} {magnitude:.4}·x"));
            if power > 1 {
                terms.push_str(&format!("^{power}"));
            }
        }
    }
    format!("{dependent} = {terms}  (x = {x_name})")
}

/// Format the last `n` weekly rows as a table: date, both legs, spread.
pub fn format_recent_weeks(frame: &AlignedFrame, spread: &Spread, n: usize) -> String {
    let mut out = String::new();

    let start = frame.len().saturating_sub(n);
    out.push_str(&format!(
        "Recent weekly data (last {} of {} rows):\n",
        frame.len() - start,
        frame.len()
    ));
    out.push_str(&format!(
        "  {:<12} {:>12} {:>12} {:>12}\n",
        "Date", spread.leg_a, spread.leg_b, spread.name
    ));

    let a = frame.column(&spread.leg_a).unwrap_or(&[]);
    let b = frame.column(&spread.leg_b).unwrap_or(&[]);
    for i in start..frame.len() {
        out.push_str(&format!(
            "  {:<12} {:>12.2} {:>12.2} {:>12.1}\n",
            frame.dates()[i],
            a.get(i).copied().unwrap_or(f64::NAN),
            b.get(i).copied().unwrap_or(f64::NAN),
            spread.values_bp[i],
        ));
    }

    out
}
