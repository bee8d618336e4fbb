//! Regression fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit a single model kind by OLS (`fitter`)
//! - run the requested model families and pick the best by BIC (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
