//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - fetches FRED data
//! - runs alignment, spread, and regression
//! - prints reports
//! - writes CSV and PNG artifacts

use clap::Parser;

use crate::cli::{AnalysisArgs, Cli, Command};
use crate::data::{self, FredClient};
use crate::domain::AnalysisConfig;
use crate::error::AppError;
use crate::{io, plot, report};

pub mod pipeline;

use pipeline::AnalysisOutput;

/// Entry point for the `mspread` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `mspread` (and `mspread --start ...`) to behave like
    // `mspread run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the default invocation a single end-to-end command.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => {
            let config = analysis_config_from_args(&args);
            let client = FredClient::from_env()?;
            handle_treasury(&config, &client)?;
            println!();
            handle_coupon(&config, &client)
        }
        Command::Treasury(args) => {
            let config = analysis_config_from_args(&args);
            let client = FredClient::from_env()?;
            handle_treasury(&config, &client)
        }
        Command::Coupon(args) => {
            let config = analysis_config_from_args(&args);
            let client = FredClient::from_env()?;
            handle_coupon(&config, &client)
        }
    }
}

fn handle_treasury(config: &AnalysisConfig, client: &FredClient) -> Result<(), AppError> {
    let run = pipeline::treasury_spread(config, client)?;
    print_analysis(&run, "PMMS vs 10-Year Treasury Spread", config);

    let csv_path = io::write_spread_csv(
        &config.out_dir.join("pmms_treasury_spread.csv"),
        &run.frame,
        &run.spread,
    )?;
    println!("Data saved to: {}", csv_path.display());

    if config.plot {
        let history = config.out_dir.join("pmms_treasury_spread_chart.png");
        plot::spread_history(&history, &run.spread, "30-Year PMMS vs 10-Year Treasury Spread")?;
        println!("Chart saved as: {}", history.display());

        let comparison = config.out_dir.join("rates_comparison.png");
        plot::rates_comparison(
            &comparison,
            &run.frame,
            [data::LABEL_PMMS, data::LABEL_TREASURY],
            "30-Year PMMS vs 10-Year Treasury Rate",
        )?;
        println!("Chart saved as: {}", comparison.display());
    }

    Ok(())
}

fn handle_coupon(config: &AnalysisConfig, client: &FredClient) -> Result<(), AppError> {
    let run = pipeline::coupon_spread(config, client)?;
    print_analysis(&run, "Primary-Secondary Spread (PSS30): PMMS vs CC30", config);

    let csv_path = io::write_spread_csv(
        &config.out_dir.join("primary_secondary_spread.csv"),
        &run.frame,
        &run.spread,
    )?;
    println!("Data saved to: {}", csv_path.display());

    if config.plot {
        let history = config.out_dir.join("primary_secondary_spread_chart.png");
        plot::spread_history(
            &history,
            &run.spread,
            "Primary-Secondary Spread (PSS30): PMMS vs CC30",
        )?;
        println!("Chart saved as: {}", history.display());

        let x = pipeline::regressor_values(&run.frame, &run.regressor)?;
        let panel = config.out_dir.join("regression_analysis.png");
        plot::regression_panel(
            &panel,
            &x,
            &run.spread.values_bp,
            &run.regression.fits,
            run.regressor.label(),
            &format!("{} (bp)", run.spread.name),
        )?;
        println!("Chart saved as: {}", panel.display());

        let residuals = config.out_dir.join("regression_residuals.png");
        plot::residuals_chart(
            &residuals,
            &run.spread.dates,
            run.regression.best(),
            "PSS30 Regression Residuals",
        )?;
        println!("Chart saved as: {}", residuals.display());
    }

    Ok(())
}

fn print_analysis(run: &AnalysisOutput, title: &str, config: &AnalysisConfig) {
    println!(
        "{}",
        report::format_analysis_summary(
            title,
            &run.frame,
            &run.spread,
            &run.stats,
            run.source_note.as_deref(),
        )
    );
    println!(
        "{}",
        report::format_regression_summary(&run.regression, &run.regressor, &run.spread.name)
    );
    println!(
        "{}",
        report::format_recent_weeks(&run.frame, &run.spread, config.recent)
    );
}

pub fn analysis_config_from_args(args: &AnalysisArgs) -> AnalysisConfig {
    AnalysisConfig {
        start: args.start,
        end: args.end,
        fill: args.fill,
        model_spec: args.model,
        out_dir: args.out.clone(),
        recent: args.recent,
        plot: !args.no_plot,
    }
}

/// Rewrite argv so `mspread` defaults to `mspread run`.
///
/// Rules:
/// - `mspread`                      -> `mspread run`
/// - `mspread --start 2010-01-01`   -> `mspread run --start 2010-01-01`
/// - `mspread --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "treasury" | "coupon");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is (clap will produce the usage error).
    argv
}
