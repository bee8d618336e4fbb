//! Data acquisition.
//!
//! All series come from the FRED observations API (`fred`); the only derived
//! input is the documented CC30 proxy, which is labeled as such in reports.

pub mod fred;

pub use fred::*;
