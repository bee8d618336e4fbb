//! Export aligned rates + spread to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts. Re-running the pipeline overwrites the file deliberately; the
//! resolved path is returned so the caller can report it.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{AlignedFrame, Spread};
use crate::error::AppError;

/// Write `Date,<legA>,<legB>,Spread_bps` rows to `path`.
///
/// The parent directory is created if needed. Returns the path written.
pub fn write_spread_csv(
    path: &Path,
    frame: &AlignedFrame,
    spread: &Spread,
) -> Result<PathBuf, AppError> {
    let a = frame.column(&spread.leg_a).ok_or_else(|| {
        AppError::usage(format!("Column '{}' not found in aligned frame.", spread.leg_a))
    })?;
    let b = frame.column(&spread.leg_b).ok_or_else(|| {
        AppError::usage(format!("Column '{}' not found in aligned frame.", spread.leg_b))
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::io(format!(
                    "Failed to create output directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "Date,{},{},Spread_bps", spread.leg_a, spread.leg_b)
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for (i, date) in frame.dates().iter().enumerate() {
        writeln!(
            file,
            "{date},{:.4},{:.4},{:.4}",
            a[i], b[i], spread.values_bp[i]
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(path.to_path_buf())
}
