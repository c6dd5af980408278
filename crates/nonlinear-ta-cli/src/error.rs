//! CLI error types for handling file I/O, parsing, configuration and
//! indicator errors.
//!
//! Error messages are meant to be actionable: they say what went wrong and,
//! where possible, how to fix it.

use std::fmt;
use std::io;

/// CLI error type encompassing all possible error conditions.
#[derive(Debug)]
pub enum CliError {
    /// An I/O error occurred while reading or writing files.
    IoError {
        /// The underlying I/O error.
        source: io::Error,
        /// Path that caused the error, if known.
        path: Option<String>,
    },
    /// An error occurred while parsing CSV data.
    CsvParseError {
        /// Description of the parse error.
        message: String,
        /// Line number where the error occurred, if known.
        line: Option<usize>,
    },
    /// The indicator configuration was rejected.
    IndicatorError {
        /// The underlying nonlinear-ta error.
        source: nonlinear_ta::Error,
    },
    /// An invalid argument was provided.
    InvalidArgument {
        /// Name of the invalid argument.
        argument: String,
        /// Description of why it's invalid.
        reason: String,
        /// Suggestion for valid values.
        suggestion: Option<String>,
    },
    /// A JSON run configuration could not be read.
    ConfigError {
        /// Description of the problem.
        message: String,
        /// Path of the configuration file, if known.
        path: Option<String>,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError { source, path } => {
                if let Some(p) = path {
                    write!(f, "I/O error with file '{p}': {source}. ")?;
                    write!(f, "Check that the file exists and you have read permissions.")
                } else {
                    write!(f, "I/O error: {source}")
                }
            }
            Self::CsvParseError { message, line } => {
                if let Some(l) = line {
                    write!(f, "CSV parse error on line {l}: {message}. ")?;
                } else {
                    write!(f, "CSV parse error: {message}. ")?;
                }
                write!(f, "Ensure your CSV has a header row and numeric data columns.")
            }
            Self::IndicatorError { source } => {
                write!(f, "Indicator configuration error: {source}")
            }
            Self::InvalidArgument {
                argument,
                reason,
                suggestion,
            } => {
                write!(f, "Invalid argument '{argument}': {reason}")?;
                if let Some(s) = suggestion {
                    write!(f, ". {s}")?;
                }
                Ok(())
            }
            Self::ConfigError { message, path } => {
                if let Some(p) = path {
                    write!(f, "Invalid run configuration '{p}': {message}")
                } else {
                    write!(f, "Invalid run configuration: {message}")
                }
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::IndicatorError { source } => Some(source),
            Self::CsvParseError { .. } | Self::InvalidArgument { .. } | Self::ConfigError { .. } => {
                None
            }
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            source: err,
            path: None,
        }
    }
}

impl From<nonlinear_ta::Error> for CliError {
    fn from(err: nonlinear_ta::Error) -> Self {
        Self::IndicatorError { source: err }
    }
}

impl From<csv::Error> for CliError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .and_then(|p| usize::try_from(p.line()).ok());
        Self::CsvParseError {
            message: err.to_string(),
            line,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError {
            message: format!("{err} (line {}, column {})", err.line(), err.column()),
            path: None,
        }
    }
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_io_error_with_path() {
        let err = CliError::IoError {
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            path: Some("/path/to/file.csv".to_string()),
        };
        let display = err.to_string();
        assert!(display.contains("/path/to/file.csv"));
        assert!(display.contains("file not found"));
        assert!(display.contains("Check that the file exists"));
    }

    #[test]
    fn test_display_io_error_without_path() {
        let err = CliError::from(io::Error::other("network error"));
        let display = err.to_string();
        assert!(display.contains("I/O error"));
        assert!(display.contains("network error"));
    }

    #[test]
    fn test_display_csv_parse_error() {
        let with_line = CliError::CsvParseError {
            message: "invalid float".to_string(),
            line: Some(10),
        };
        assert!(with_line.to_string().contains("line 10"));

        let without_line = CliError::CsvParseError {
            message: "unexpected end of input".to_string(),
            line: None,
        };
        let display = without_line.to_string();
        assert!(display.contains("unexpected end of input"));
        assert!(display.contains("header row"));
    }

    #[test]
    fn test_indicator_error_conversion() {
        let err = CliError::from(nonlinear_ta::Error::invalid_parameter(
            "rqa",
            "radius",
            "must be positive",
        ));
        let display = err.to_string();
        assert!(display.contains("radius"));
        assert!(display.contains("rqa"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::InvalidArgument {
            argument: "column".to_string(),
            reason: "no column named 'px'".to_string(),
            suggestion: Some("Available columns: close, volume".to_string()),
        };
        let display = err.to_string();
        assert!(display.contains("'column'"));
        assert!(display.contains("Available columns"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_serde_json_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = CliError::from(json_err);
        assert!(matches!(err, CliError::ConfigError { path: None, .. }));
        assert!(err.to_string().contains("line 1"));
    }
}
