//! Export overview results to disk.
//!
//! - the overview response body as pretty JSON
//! - the product leaderboard as CSV, easy to consume in spreadsheets

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{OverviewResponse, ProductTotal};
use crate::error::AppError;

/// Write the overview response body as pretty-printed JSON.
pub fn write_overview_json(path: &Path, response: &OverviewResponse) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create overview JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, response)
        .map_err(|e| AppError::output(format!("Failed to write overview JSON: {e}")))?;

    Ok(())
}

/// Write a ranked product leaderboard to a CSV file.
pub fn write_totals_csv(path: &Path, totals: &[ProductTotal]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create totals CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "rank,name,total")
        .map_err(|e| AppError::output(format!("Failed to write totals CSV header: {e}")))?;

    for (idx, t) in totals.iter().enumerate() {
        writeln!(file, "{},{},{}", idx + 1, csv_field(&t.name), t.total)
            .map_err(|e| AppError::output(format!("Failed to write totals CSV row: {e}")))?;
    }

    Ok(())
}

/// Quote a field when it would otherwise break the row.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
