//! Plain-text terminal output.
//!
//! Output is deterministic (fixed column widths, trailing whitespace
//! trimmed) so it can be compared verbatim in tests.

use crate::domain::{Observation, OverviewResult, ProductTotal, format_fixed2};
use crate::store::LoadReport;

/// Format the full overview: headline figures, monthly series, leaderboard.
pub fn format_overview(overview: &OverviewResult, scope: Option<&str>, load: &LoadReport) -> String {
    let mut out = String::new();

    out.push_str("=== sov - Sales Overview ===\n");
    out.push_str(&format!("Scope: {}\n", scope.unwrap_or("all products")));
    out.push_str(&format!(
        "Dataset: rows={} | observations={} | skipped={}\n",
        load.rows_read, load.observations, load.skipped_rows
    ));
    if let Some(err) = &load.error {
        out.push_str(&format!("Dataset unavailable: {err}\n"));
    }

    out.push('\n');
    out.push_str(&format!("Total sales : {}\n", format_fixed2(overview.total_sales)));
    out.push_str(&format!("Growth      : {}%\n", overview.growth_percent));
    let forecast = if overview.forecast_percent.is_available() {
        format!("{}%", overview.forecast_percent)
    } else {
        overview.forecast_percent.to_string()
    };
    out.push_str(&format!("Forecast    : {forecast}\n"));
    out.push_str(&format!("Top product : {}\n", overview.top_product_name));

    out.push_str("\nMonthly peaks:\n");
    if overview.series.is_empty() {
        out.push_str("  (no dated observations)\n");
    } else {
        out.push_str(&format_row(&format!("{:<8} {:<20} {:>12}", "month", "date", "sales")));
        out.push_str(&format_row(&format!("{:-<8} {:-<20} {:-<12}", "", "", "")));
        for p in &overview.series.points {
            out.push_str(&format_row(&format!(
                "{:<8} {:<20} {:>12}",
                p.month_key,
                truncate(&p.label, 20),
                format_fixed2(p.value)
            )));
        }
    }

    out.push_str("\nTop products:\n");
    out.push_str(&format_leaderboard(&overview.top));

    out
}

/// Format a ranked leaderboard table.
pub fn format_leaderboard(rows: &[ProductTotal]) -> String {
    let mut out = String::new();
    out.push_str(&format_row(&format!("{:>4} {:<24} {:>14}", "rank", "product", "total")));
    out.push_str(&format_row(&format!("{:-<4} {:-<24} {:-<14}", "", "", "")));

    for (idx, t) in rows.iter().enumerate() {
        out.push_str(&format_row(&format!(
            "{:>4} {:<24} {:>14}",
            idx + 1,
            truncate(&t.name, 24),
            format_fixed2(t.total)
        )));
    }

    out
}

/// One product name per line.
pub fn format_products(products: &[String]) -> String {
    let mut out = String::new();
    for p in products {
        out.push_str(p);
        out.push('\n');
    }
    out
}

/// Format search hits as a table, capped at `limit` rows.
pub fn format_search_results(hits: &[Observation], limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format_row(&format!("{:<24} {:<20} {:>12}", "product", "date", "sales")));
    out.push_str(&format_row(&format!("{:-<24} {:-<20} {:-<12}", "", "", "")));

    for o in hits.iter().take(limit) {
        out.push_str(&format_row(&format!(
            "{:<24} {:<20} {:>12}",
            truncate(&o.product, 24),
            truncate(&o.date, 20),
            format_fixed2(o.sales)
        )));
    }
    if hits.len() > limit {
        out.push_str(&format!("... {} more\n", hits.len() - limit));
    }

    out
}

fn format_row(line: &str) -> String {
    let mut row = line.trim_end().to_string();
    row.push('\n');
    row
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
