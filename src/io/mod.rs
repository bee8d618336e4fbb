//! Input/output helpers.
//!
//! - spread CSV exports (`export`)

pub mod export;

pub use export::*;
