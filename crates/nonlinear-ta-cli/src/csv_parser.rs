//! CSV parsing module for reading a numeric series from a CSV file.
//!
//! The file must have a header row. One numeric column is selected as the
//! series:
//!
//! - the column named with `--column`, if given (case-insensitive)
//! - otherwise the first of `close`, `price`, `adj close`, `adjusted close`,
//!   `value`
//! - otherwise the only numeric column, if there is exactly one
//!
//! Date columns (`date`, `time`, `datetime`, `timestamp`, `dt`) are kept for
//! output alignment but not parsed as numbers. Empty cells become NaN.

use crate::error::{CliError, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Header names tried, in order, when no column is given.
const SERIES_COLUMNS: &[&str] = &["close", "price", "adj close", "adjusted close", "value"];

/// Parsed CSV data with column mapping.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Column headers from the CSV.
    pub headers: Vec<String>,
    /// Mapping of normalized column name to column index.
    pub column_map: HashMap<String, usize>,
    /// Date column values (if found).
    pub dates: Option<Vec<String>>,
    /// All numeric data columns by index.
    pub columns: HashMap<usize, Vec<f64>>,
    /// Number of rows parsed.
    pub row_count: usize,
}

/// A selected series with its dates.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Name of the column the values came from.
    pub name: String,
    /// The values, one per row.
    pub values: Vec<f64>,
    /// Date column values (if found).
    pub dates: Option<Vec<String>>,
}

impl ParsedCsv {
    /// Get a column by normalized name.
    pub fn get_column(&self, name: &str) -> Option<&Vec<f64>> {
        self.column_map
            .get(&normalize_header(name))
            .and_then(|idx| self.columns.get(idx))
    }

    /// Selects the series column.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` if the named column does not
    /// exist, or if no column can be chosen automatically.
    pub fn select(&self, column: Option<&str>) -> Result<Series> {
        let name = match column {
            Some(name) => {
                if self.get_column(name).is_none() {
                    return Err(CliError::InvalidArgument {
                        argument: "column".to_string(),
                        reason: format!("no numeric column named '{name}'"),
                        suggestion: Some(self.available_columns()),
                    });
                }
                normalize_header(name)
            }
            None => self.default_column()?,
        };
        let values = self.get_column(&name).cloned().unwrap_or_default();
        Ok(Series {
            name,
            values,
            dates: self.dates.clone(),
        })
    }

    fn default_column(&self) -> Result<String> {
        if let Some(name) = SERIES_COLUMNS
            .iter()
            .find(|name| self.column_map.contains_key(**name))
        {
            return Ok((*name).to_string());
        }
        if self.column_map.len() == 1 {
            if let Some(name) = self.column_map.keys().next() {
                return Ok(name.clone());
            }
        }
        Err(CliError::InvalidArgument {
            argument: "column".to_string(),
            reason: "cannot choose a series column automatically".to_string(),
            suggestion: Some(format!("Pass --column. {}", self.available_columns())),
        })
    }

    fn available_columns(&self) -> String {
        let mut names: Vec<(&usize, &String)> =
            self.column_map.iter().map(|(name, idx)| (idx, name)).collect();
        names.sort();
        let names: Vec<&str> = names.into_iter().map(|(_, name)| name.as_str()).collect();
        format!("Available columns: {}", names.join(", "))
    }
}

/// Normalize a column header name for matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Check if a header represents a date column.
fn is_date_column(header: &str) -> bool {
    matches!(
        normalize_header(header).as_str(),
        "date" | "time" | "datetime" | "timestamp" | "dt"
    )
}

/// Parse a string value to f64, treating empty as NaN.
fn parse_value(value: &str) -> std::result::Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Ok(f64::NAN)
    } else {
        trimmed
            .parse::<f64>()
            .map_err(|_| format!("cannot parse '{trimmed}' as number"))
    }
}

/// Parse a CSV file into a structured format.
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be read, or
/// `CliError::CsvParseError` if the CSV is malformed.
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<ParsedCsv> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    parse_csv_from_reader(BufReader::new(file))
}

/// Parse CSV data from a reader.
///
/// # Errors
///
/// Returns `CliError::CsvParseError` if the CSV is malformed or a numeric
/// cell cannot be parsed.
pub fn parse_csv_from_reader<R: Read>(reader: R) -> Result<ParsedCsv> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(1),
        })?
        .iter()
        .map(String::from)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CliError::CsvParseError {
            message: "CSV file has no headers".to_string(),
            line: Some(1),
        });
    }

    let mut column_map = HashMap::new();
    let mut date_column_idx: Option<usize> = None;
    for (idx, header) in headers.iter().enumerate() {
        if is_date_column(header) {
            date_column_idx = Some(idx);
        } else {
            column_map.insert(normalize_header(header), idx);
        }
    }

    let mut columns: HashMap<usize, Vec<f64>> =
        column_map.values().map(|&idx| (idx, Vec::new())).collect();
    let mut dates: Vec<String> = Vec::new();

    let mut row_count = 0;
    for (line_idx, result) in csv_reader.records().enumerate() {
        // +2 for the header and 0-indexing
        let line = line_idx + 2;
        let record = result.map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(line),
        })?;

        if let Some(date_idx) = date_column_idx {
            dates.push(record.get(date_idx).unwrap_or_default().to_string());
        }

        for (&col_idx, values) in &mut columns {
            let parsed = parse_value(record.get(col_idx).unwrap_or(""))
                .map_err(|message| CliError::CsvParseError {
                    message,
                    line: Some(line),
                })?;
            values.push(parsed);
        }

        row_count += 1;
    }

    tracing::debug!(rows = row_count, columns = headers.len(), "parsed CSV");

    Ok(ParsedCsv {
        headers,
        column_map,
        dates: date_column_idx.map(|_| dates),
        columns,
        row_count,
    })
}

/// Reads one series from a CSV file.
///
/// # Errors
///
/// See [`parse_csv`] and [`ParsedCsv::select`].
pub fn read_series<P: AsRef<Path>>(path: P, column: Option<&str>) -> Result<Series> {
    parse_csv(path)?.select(column)
}
