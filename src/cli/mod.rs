//! Command-line parsing for the FRED-based mortgage spread analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the alignment/regression code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{FillPolicy, ModelSpec};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mspread", version, about = "Mortgage Spread Analyzer (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run both spread analyses end-to-end (Treasury spread + PSS30).
    Run(AnalysisArgs),
    /// PMMS vs 10-year Treasury spread only.
    Treasury(AnalysisArgs),
    /// PMMS vs 30-year current-coupon spread (PSS30), with the regression study.
    Coupon(AnalysisArgs),
}

/// Common options for all analyses.
#[derive(Debug, Parser, Clone)]
pub struct AnalysisArgs {
    /// First observation date to request from FRED.
    #[arg(long, value_name = "YYYY-MM-DD", default_value = "2000-01-01")]
    pub start: NaiveDate,

    /// Last observation date (defaults to the latest available).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,

    /// Gap policy when joining daily series onto the weekly Wednesday grid.
    #[arg(long, value_enum, default_value_t = FillPolicy::ForwardFill)]
    pub fill: FillPolicy,

    /// Which regression model(s) to fit.
    #[arg(long, value_enum, default_value_t = ModelSpec::Auto)]
    pub model: ModelSpec,

    /// Output directory for CSV and PNG artifacts.
    #[arg(long, default_value = "out")]
    pub out: PathBuf,

    /// Number of recent weekly rows to print.
    #[arg(long, default_value_t = 20)]
    pub recent: usize,

    /// Skip PNG chart rendering.
    #[arg(long)]
    pub no_plot: bool,
}
