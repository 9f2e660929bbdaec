//! Coercion rules for untrusted dataset cells.
//!
//! The loader and the analytics never reject a row because one cell is bad.
//! Instead every lenient conversion lives here, so the rules can be tested on
//! their own:
//!
//! - sales cells: blank, unparsable, or non-finite values become `0`
//! - date labels: a small set of common layouts; anything else is `None`
//!   and the bucketer skips the observation
//! - percentages: fixed two-decimal formatting, never `-0.00`

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only layouts, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];

/// Date-time layouts, tried in order.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Coerce a raw sales cell into a number.
pub fn coerce_sales(cell: &str) -> f64 {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0.0;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse an observation's date label into a sortable timestamp.
///
/// Date-only labels resolve to midnight.
pub fn parse_observation_date(label: &str) -> Option<NaiveDateTime> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(label, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(label, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(label).ok().map(|dt| dt.naive_utc())
}

/// Format a percentage (or any figure) with exactly two decimals.
pub fn format_fixed2(value: f64) -> String {
    let out = format!("{value:.2}");
    // Negative zero and tiny negative residue both round to "-0.00".
    if out == "-0.00" { "0.00".to_string() } else { out }
}
