//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`FillPolicy`, `ModelSpec`, `Regressor`)
//! - the fetched series type (`TimeSeries`)
//! - alignment outputs (`AlignedFrame`, `Spread`)
//! - fit outputs (`RegressionResult`, `FitQuality`)

pub mod types;

pub use types::*;
