//! Error types for nonlinear-ta.
//!
//! Two levels of failure are kept apart:
//!
//! - [`Error`] is a configuration error. It is raised before any window is
//!   evaluated and aborts the whole run.
//! - [`WindowError`] is a numerical failure local to one window. The builder
//!   records it in that window's output slot and keeps going.

use thiserror::Error;

/// The main error type for nonlinear-ta operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input data series is empty.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// A window length or kernel parameter is outside its valid range.
    ///
    /// Returned by parameter validation, before the first window is processed.
    #[error("invalid parameter `{parameter}` for {indicator}: {reason}")]
    InvalidParameter {
        /// Indicator whose configuration was rejected.
        indicator: &'static str,
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Failed to convert a numeric value to the target type.
    ///
    /// This error occurs when using `NumCast::from()` to convert values
    /// (e.g., converting a `usize` count to a generic `Float` type) and
    /// the conversion fails.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

impl Error {
    /// Shorthand for building an [`Error::InvalidParameter`].
    pub fn invalid_parameter(
        indicator: &'static str,
        parameter: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            indicator,
            parameter,
            reason: reason.into(),
        }
    }

    /// Attributes an [`Error::InvalidParameter`] to `indicator`; other
    /// variants pass through.
    #[must_use]
    pub fn with_indicator(self, indicator: &'static str) -> Self {
        match self {
            Self::InvalidParameter {
                parameter, reason, ..
            } => Self::InvalidParameter {
                indicator,
                parameter,
                reason,
            },
            other => other,
        }
    }
}

/// A failure to produce a defined value for one window.
///
/// These never abort a batch. The aligned output stores them as
/// [`Slot::Undefined`](crate::output::Slot::Undefined), which stays distinct
/// from the warm-up marker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The window does not hold enough usable samples or pairs.
    #[error("insufficient data: {reason}")]
    InsufficientData {
        /// What was missing.
        reason: &'static str,
    },

    /// A search finished without finding what it looks for.
    #[error("insufficient evidence: {reason}")]
    InsufficientEvidence {
        /// What the search failed to find.
        reason: &'static str,
    },

    /// The multifractal spectrum collapsed to fewer than two usable points.
    #[error("degenerate spectrum: {valid} usable moment orders, at least 2 required")]
    DegenerateSpectrum {
        /// Number of moment orders with finite `alpha` and `f(alpha)`.
        valid: usize,
    },

    /// The window's values violate the kernel's domain.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Which domain rule was violated.
        reason: &'static str,
    },

    /// The computation produced NaN or an infinity.
    #[error("non-finite result: {quantity}")]
    NonFinite {
        /// Which quantity came out non-finite.
        quantity: &'static str,
    },
}

/// Convenience type alias for Results using the nonlinear-ta Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Result of evaluating a kernel on a single window.
pub type WindowResult<T> = std::result::Result<T, WindowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_error() {
        let err = Error::EmptyInput;
        assert_eq!(err.to_string(), "empty input: no data provided");
    }

    #[test]
    fn test_invalid_parameter_error() {
        let err = Error::invalid_parameter("lyapunov", "window_len", "must be at least 3");
        assert_eq!(
            err.to_string(),
            "invalid parameter `window_len` for lyapunov: must be at least 3"
        );
    }

    #[test]
    fn test_numeric_conversion_error() {
        let err = Error::NumericConversion {
            context: "converting count to float",
        };
        assert_eq!(
            err.to_string(),
            "numeric conversion failed: converting count to float"
        );
    }

    #[test]
    fn test_window_error_messages() {
        assert_eq!(
            WindowError::InsufficientData {
                reason: "fewer than 2 divergence points"
            }
            .to_string(),
            "insufficient data: fewer than 2 divergence points"
        );
        assert_eq!(
            WindowError::DegenerateSpectrum { valid: 1 }.to_string(),
            "degenerate spectrum: 1 usable moment orders, at least 2 required"
        );
        assert_eq!(
            WindowError::NonFinite {
                quantity: "approximate entropy"
            }
            .to_string(),
            "non-finite result: approximate entropy"
        );
    }

    #[test]
    fn test_with_indicator() {
        let err = Error::invalid_parameter("window", "window_len", "too long").with_indicator("rqa");
        assert_eq!(err, Error::invalid_parameter("rqa", "window_len", "too long"));
        assert_eq!(Error::EmptyInput.with_indicator("rqa"), Error::EmptyInput);
    }

    #[test]
    fn test_error_equality() {
        let err1 = Error::invalid_parameter("rqa", "radius", "must be positive");
        let err2 = Error::invalid_parameter("rqa", "radius", "must be positive");
        let err3 = Error::invalid_parameter("rqa", "time_delay", "must be positive");

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }

    #[test]
    fn test_window_error_clone() {
        let err = WindowError::InsufficientEvidence {
            reason: "no local minimum",
        };
        let err_clone = err.clone();
        assert_eq!(err, err_clone);
    }

    #[test]
    fn test_error_debug() {
        let err = Error::NumericConversion {
            context: "test context",
        };
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("NumericConversion"));
        assert!(debug_str.contains("test context"));
    }

    #[test]
    fn test_result_type_alias() {
        fn test_fn(succeed: bool) -> Result<i32> {
            if succeed {
                Ok(42)
            } else {
                Err(Error::EmptyInput)
            }
        }

        assert_eq!(test_fn(true).unwrap(), 42);
        assert!(test_fn(false).is_err());
    }

    #[test]
    fn test_error_is_std_error() {
        fn accepts_std_error<E: std::error::Error>(_: E) {}
        accepts_std_error(Error::EmptyInput);
        accepts_std_error(WindowError::InvalidInput { reason: "negative" });
    }
}
