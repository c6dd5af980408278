//! Core traits for nonlinear-ta numeric operations.
//!
//! # Overview
//!
//! [`SeriesElement`] abstracts over `f32` and `f64` series values.
//! [`IndicatorKernel`] is the capability every indicator implements: a pure
//! function from one window (plus the kernel's own parameters) to a result.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::traits::{IndicatorKernel, SeriesElement};
//! use nonlinear_ta::error::{Result, WindowResult};
//!
//! /// Range of the window: max minus min.
//! struct Range;
//!
//! impl<T: SeriesElement> IndicatorKernel<T> for Range {
//!     type Output = T;
//!
//!     fn name(&self) -> &'static str {
//!         "range"
//!     }
//!
//!     fn evaluate(&self, window: &[T]) -> WindowResult<T> {
//!         let max = window.iter().fold(T::neg_infinity(), |m, &x| m.max(x));
//!         let min = window.iter().fold(T::infinity(), |m, &x| m.min(x));
//!         Ok(max - min)
//!     }
//! }
//!
//! let data = vec![1.0_f64, 4.0, 2.0];
//! assert_eq!(Range.evaluate(&data).unwrap(), 3.0);
//! ```

use std::fmt::Debug;

use num_traits::{Float, NumCast};

use crate::error::{Error, Result, WindowError, WindowResult};

/// A trait for types that can be used as elements in a data series.
///
/// This trait provides a common interface for numeric operations on series data,
/// abstracting over `f32` and `f64` types. It extends `num_traits::Float` with
/// conversions used by the kernels.
pub trait SeriesElement:
    Float + NumCast + Copy + Default + Debug + Send + Sync + 'static
{
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `i32` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_i32(value: i32) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "i32 to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Converts a count while evaluating a window.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::NonFinite` if the count is not representable.
    #[inline]
    fn count(value: usize) -> WindowResult<Self> {
        <Self as NumCast>::from(value).ok_or(WindowError::NonFinite {
            quantity: "count conversion",
        })
    }

    /// Converts an `f64` constant while evaluating a window.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::NonFinite` if the constant is not representable.
    #[inline]
    fn constant(value: f64) -> WindowResult<Self> {
        <Self as NumCast>::from(value).ok_or(WindowError::NonFinite {
            quantity: "constant conversion",
        })
    }

    /// Converts this element to `f64`, mapping failures to NaN.
    #[inline]
    #[must_use]
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    /// Returns the constant 2 as this type.
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }
}

// Blanket implementation for all types that satisfy the bounds
impl<T: Float + NumCast + Copy + Default + Debug + Send + Sync + 'static> SeriesElement for T {}

/// An indicator evaluated independently on each window of a series.
///
/// Implementations are pure: the same window and parameters always give the
/// same result, and nothing is shared between evaluations. That is what lets
/// [`IndicatorSeriesBuilder`](crate::builder::IndicatorSeriesBuilder) dispatch
/// windows in any order.
pub trait IndicatorKernel<T: SeriesElement>: Send + Sync {
    /// Value produced for one window.
    type Output: Send + Sync + Clone + Debug;

    /// Short identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Smallest window length the kernel accepts.
    fn min_window_len(&self) -> usize {
        1
    }

    /// Validates the kernel parameters against a window length.
    ///
    /// Called once, before the first window is evaluated.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` when a parameter is out of range or
    /// the window is shorter than [`min_window_len`](Self::min_window_len).
    fn validate(&self, window_len: usize) -> Result<()> {
        validate_window_len(self.name(), window_len, self.min_window_len())
    }

    /// Evaluates the kernel on one window.
    ///
    /// # Errors
    ///
    /// Returns a [`WindowError`] when this window cannot produce a defined value.
    fn evaluate(&self, window: &[T]) -> WindowResult<Self::Output>;
}

impl<T: SeriesElement, K: IndicatorKernel<T> + ?Sized> IndicatorKernel<T> for &K {
    type Output = K::Output;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn min_window_len(&self) -> usize {
        (**self).min_window_len()
    }

    fn validate(&self, window_len: usize) -> Result<()> {
        (**self).validate(window_len)
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<Self::Output> {
        (**self).evaluate(window)
    }
}

/// Validates a window length against a kernel's minimum.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` if `window_len` is zero or below `min_len`.
#[inline]
pub fn validate_window_len(indicator: &'static str, window_len: usize, min_len: usize) -> Result<()> {
    if window_len == 0 {
        return Err(Error::invalid_parameter(
            indicator,
            "window_len",
            "window length must be at least 1",
        ));
    }
    if window_len < min_len {
        return Err(Error::invalid_parameter(
            indicator,
            "window_len",
            format!("window length {window_len} is below the minimum of {min_len}"),
        ));
    }
    Ok(())
}

/// Validates that a floating-point parameter is finite and strictly positive.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` otherwise.
#[inline]
pub fn validate_positive(indicator: &'static str, parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            indicator,
            parameter,
            format!("must be finite and positive, got {value}"),
        ))
    }
}
