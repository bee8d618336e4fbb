//! Reporting utilities: summary statistics and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;
pub mod stats;

pub use format::*;
pub use stats::*;
