//! CSV output module for writing aligned indicator results.
//!
//! Row semantics:
//!
//! - Leading rows that are warm-up in every column are dropped
//! - The date column, when present, stays aligned with the input rows
//!
//! Cell semantics:
//!
//! - Warm-up (not yet computed) is an empty cell
//! - Undefined (the window was evaluated but has no value) is `NaN`
//! - Cancelled (the window was never evaluated) is `cancelled`
//! - Defined values use the shortest representation that round-trips

use crate::error::{CliError, Result};
use nonlinear_ta::{AlignedOutput, Slot};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Output destination: either stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputDest {
    /// Destination from an optional `--output` path.
    pub fn from_option(path: Option<&str>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_string()))
    }

    /// Create a writer for this output destination.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IoError` if the file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout())),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| CliError::IoError {
                    source: e,
                    path: Some(path.clone()),
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// One output cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Inside the column's warm-up prefix.
    WarmUp,
    /// Skipped after cancellation.
    Cancelled,
    /// Evaluated without a defined value.
    Undefined,
    /// Defined value.
    Value(f64),
}

impl Cell {
    fn render(self) -> String {
        match self {
            Self::WarmUp => String::new(),
            Self::Cancelled => "cancelled".to_string(),
            Self::Undefined => "NaN".to_string(),
            Self::Value(v) => v.to_string(),
        }
    }
}

/// One output column: a header, its warm-up length and one cell per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column header.
    pub header: String,
    /// Number of leading warm-up rows.
    pub lookback: usize,
    /// Cells, one per input row.
    pub cells: Vec<Cell>,
}

impl Column {
    /// Extracts a column from an aligned output.
    ///
    /// A value for which `f` returns `None` is written as undefined.
    pub fn from_output<R, F>(header: impl Into<String>, output: &AlignedOutput<R>, f: F) -> Self
    where
        F: Fn(&R) -> Option<f64>,
    {
        let cells = output
            .iter()
            .map(|slot| match slot {
                Slot::WarmUp => Cell::WarmUp,
                Slot::Cancelled => Cell::Cancelled,
                Slot::Undefined(_) => Cell::Undefined,
                Slot::Value(v) => f(v).map_or(Cell::Undefined, Cell::Value),
            })
            .collect();
        Self {
            header: header.into(),
            lookback: output.lookback(),
            cells,
        }
    }
}

/// Writes columns side by side.
///
/// Rows before the smallest lookback are dropped.
///
/// # Errors
///
/// Returns `CliError::IoError` if writing fails.
pub fn write_columns(columns: &[Column], dates: Option<&[String]>, dest: &OutputDest) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }
    let mut writer = dest.writer()?;

    let mut headers: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    if dates.is_some() {
        headers.push("date");
    }
    headers.extend(columns.iter().map(|c| c.header.as_str()));
    writeln!(writer, "{}", headers.join(","))?;

    let first = columns.iter().map(|c| c.lookback).min().unwrap_or(0);
    let len = columns.iter().map(|c| c.cells.len()).max().unwrap_or(0);

    for i in first..len {
        let mut cells: Vec<String> = Vec::with_capacity(headers.len());
        if let Some(dates) = dates {
            cells.push(dates.get(i).cloned().unwrap_or_default());
        }
        for column in columns {
            cells.push(column.cells.get(i).map_or_else(String::new, |c| c.render()));
        }
        writeln!(writer, "{}", cells.join(","))?;
    }

    writer.flush()?;
    tracing::debug!(rows = len.saturating_sub(first), columns = columns.len(), "wrote CSV");
    Ok(())
}
