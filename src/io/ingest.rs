//! CSV ingest and normalization.
//!
//! The sales dataset arrives as a *wide* table: one date column plus one
//! column per product, with a sales figure in every cell. This module melts it
//! into a flat list of `Observation`s (one per product cell).
//!
//! Design goals:
//! - **Strict schema** only for the date column (clear error, exit code 2)
//! - **Lenient cells**: bad sales values coerce to `0`, bad dates survive
//!   untouched and are dropped later by the bucketer
//! - **Row-level validation**: unreadable records are skipped and reported
//! - **Deterministic order**: rows in file order, products in header order

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use indexmap::IndexSet;

use crate::domain::{Observation, coerce_sales};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: melted observations + product columns + row errors.
#[derive(Debug, Clone, Default)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    /// Product columns in header order.
    pub products: Vec<String>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// A resolved table layout: where the date lives and which columns are products.
#[derive(Debug, Clone)]
struct TableLayout {
    date_idx: usize,
    products: Vec<(usize, String)>,
}

/// Open and melt a wide CSV file.
pub fn load_wide_csv(path: &Path, date_column: &str) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_wide_table(file, date_column)
}

/// Melt a wide table from any reader.
pub fn read_wide_table<R: Read>(input: R, date_column: &str) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let layout = resolve_layout(&headers, date_column)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    // Byte records: a cell that is not valid UTF-8 only spoils that cell.
    for (idx, result) in reader.byte_records().enumerate() {
        // +2: records start after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };

        melt_row(&record, &layout, &mut observations);
    }

    if !row_errors.is_empty() {
        tracing::warn!(skipped = row_errors.len(), "skipped unreadable CSV records");
    }

    Ok(IngestedData {
        observations,
        products: layout.products.into_iter().map(|(_, name)| name).collect(),
        row_errors,
        rows_read,
    })
}

fn resolve_layout(headers: &StringRecord, date_column: &str) -> Result<TableLayout, AppError> {
    let wanted = date_column.trim();
    let mut date_idx = None;
    let mut seen = IndexSet::new();
    let mut products = Vec::new();

    for (idx, raw) in headers.iter().enumerate() {
        let name = normalize_header_name(raw);
        if date_idx.is_none() && name.eq_ignore_ascii_case(wanted) {
            date_idx = Some(idx);
            continue;
        }
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_string()) {
            tracing::warn!(column = name, "duplicate product column ignored");
            continue;
        }
        products.push((idx, name.to_string()));
    }

    let date_idx = date_idx
        .ok_or_else(|| AppError::input(format!("Missing required date column: `{wanted}`")))?;

    Ok(TableLayout { date_idx, products })
}

fn normalize_header_name(name: &str) -> &str {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim()
}

fn melt_row(record: &ByteRecord, layout: &TableLayout, out: &mut Vec<Observation>) {
    let date = String::from_utf8_lossy(record.get(layout.date_idx).unwrap_or(b""));
    for (idx, product) in &layout.products {
        let cell = record
            .get(*idx)
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .unwrap_or("");
        out.push(Observation::new(product.as_str(), coerce_sales(cell), &*date).with_cell(cell));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melts_wide_rows_in_header_order() {
        let csv = "datum,M01AB,N02BE\n1/2/2014,3,10\n1/3/2014,1.5,7\n";
        let data = read_wide_table(csv.as_bytes(), "datum").unwrap();

        assert_eq!(data.products, vec!["M01AB", "N02BE"]);
        assert_eq!(data.rows_read, 2);
        assert_eq!(
            data.observations,
            vec![
                Observation::new("M01AB", 3.0, "1/2/2014"),
                Observation::new("N02BE", 10.0, "1/2/2014"),
                Observation::new("M01AB", 1.5, "1/3/2014"),
                Observation::new("N02BE", 7.0, "1/3/2014"),
            ]
        );
    }

    #[test]
    fn date_column_can_sit_anywhere_and_match_case_insensitively() {
        let csv = "A,Datum,B\n1,2020-01-01,2\n";
        let data = read_wide_table(csv.as_bytes(), "datum").unwrap();
        assert_eq!(data.products, vec!["A", "B"]);
        assert_eq!(data.observations[0].date, "2020-01-01");
        assert_eq!(data.observations[1].sales, 2.0);
    }

    #[test]
    fn bad_cells_coerce_and_short_rows_fill_with_zero() {
        let csv = "datum,A,B\n2020-01-01,oops,\n2020-01-02,4\n";
        let data = read_wide_table(csv.as_bytes(), "datum").unwrap();

        let sales: Vec<f64> = data.observations.iter().map(|o| o.sales).collect();
        assert_eq!(sales, vec![0.0, 0.0, 4.0, 0.0]);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn invalid_utf8_cell_only_zeroes_that_cell() {
        let mut bytes = b"datum,A,B\n2020-01-01,5,".to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        bytes.extend_from_slice(b"\n2020-02-01,1,1\n");
        let data = read_wide_table(bytes.as_slice(), "datum").unwrap();

        assert!(data.row_errors.is_empty());
        assert_eq!(
            data.observations,
            vec![
                Observation::new("A", 5.0, "2020-01-01"),
                Observation::new("B", 0.0, "2020-01-01").with_cell(""),
                Observation::new("A", 1.0, "2020-02-01"),
                Observation::new("B", 1.0, "2020-02-01"),
            ]
        );
    }

    /// Serves `data` once, then fails, then reports end of input.
    struct FlakyReader {
        data: &'static [u8],
        stage: u8,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.stage += 1;
            match self.stage {
                1 => {
                    buf[..self.data.len()].copy_from_slice(self.data);
                    Ok(self.data.len())
                }
                2 => Err(std::io::Error::other("disk went away")),
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn unreadable_record_is_reported_with_its_line() {
        let input = FlakyReader {
            data: b"datum,A\n2020-01-01,1\n",
            stage: 0,
        };
        let data = read_wide_table(input, "datum").unwrap();

        assert_eq!(data.observations[0], Observation::new("A", 1.0, "2020-01-01"));
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 3);
        assert!(data.row_errors[0].message.contains("disk went away"));
        assert!(!data.row_errors[0].message.starts_with("CSV parse error: CSV parse error"));
    }

    #[test]
    fn raw_cell_text_is_kept_for_search() {
        let data = read_wide_table("datum,A\n2020-01-01,3.50\n".as_bytes(), "datum").unwrap();
        assert_eq!(data.observations[0].sales, 3.5);
        assert_eq!(data.observations[0].cell, "3.50");
    }

    #[test]
    fn malformed_dates_are_kept_for_the_bucketer() {
        let csv = "datum,A\nsomeday,5\n";
        let data = read_wide_table(csv.as_bytes(), "datum").unwrap();
        assert_eq!(data.observations, vec![Observation::new("A", 5.0, "someday")]);
    }

    #[test]
    fn strips_bom_from_first_header() {
        let csv = "\u{feff}datum,A\n2020-01-01,1\n";
        let data = read_wide_table(csv.as_bytes(), "datum").unwrap();
        assert_eq!(data.products, vec!["A"]);
    }

    #[test]
    fn duplicate_and_blank_product_columns_are_ignored() {
        let csv = "datum,A,,A\n2020-01-01,1,2,3\n";
        let data = read_wide_table(csv.as_bytes(), "datum").unwrap();
        assert_eq!(data.products, vec!["A"]);
        assert_eq!(data.observations, vec![Observation::new("A", 1.0, "2020-01-01")]);
    }

    #[test]
    fn missing_date_column_is_an_input_error() {
        let err = read_wide_table("date,A\n2020-01-01,1\n".as_bytes(), "datum").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("datum"));
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_wide_csv(Path::new("/definitely/not/here.csv"), "datum").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
