//! Numeric helpers shared by the kernels.
//!
//! # Floating-Point Comparison
//!
//! The estimators here are regression- and logarithm-heavy, so exact equality
//! is rarely meaningful. [`approx_eq`] and [`approx_eq_relative`] give
//! tolerance-based comparison for tests and validation.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::utils::{approx_eq, mean, EPSILON};
//!
//! let m = mean(&[1.0_f64, 2.0, 3.0]);
//! assert!(approx_eq(m, 2.0, EPSILON));
//! ```

use num_traits::NumCast;

use crate::traits::SeriesElement;

/// Standard epsilon for high-precision floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for results built from many accumulated operations
/// (regressions over log-averages, spectrum slopes).
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Approximate equality check for floating-point values.
///
/// Returns `true` if `a` and `b` are within `tolerance` of each other,
/// or if both are NaN (for testing convenience).
///
/// # Example
///
/// ```
/// use nonlinear_ta::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
/// assert!(!approx_eq(1.0, 2.0, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < tolerance
}

/// Relative approximate equality check for floating-point values.
///
/// Returns `true` if the relative difference between `a` and `b` is less than
/// `rel_tolerance`, or if both are NaN.
///
/// # Example
///
/// ```
/// use nonlinear_ta::utils::approx_eq_relative;
///
/// assert!(approx_eq_relative(1e10, 1e10 + 1.0, 1e-9));
/// ```
#[inline]
#[must_use]
pub fn approx_eq_relative<T: SeriesElement>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }

    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());

    if max_abs == T::zero() {
        return diff == T::zero();
    }

    diff / max_abs < rel_tolerance
}

/// Arithmetic mean. NaN for an empty slice.
#[must_use]
pub fn mean<T: SeriesElement>(data: &[T]) -> T {
    let Some(n) = <T as NumCast>::from(data.len()) else {
        return T::nan();
    };
    if data.is_empty() {
        return T::nan();
    }
    data.iter().fold(T::zero(), |acc, &x| acc + x) / n
}

/// Population standard deviation (divides by `n`). NaN for an empty slice.
#[must_use]
pub fn population_std<T: SeriesElement>(data: &[T]) -> T {
    let m = mean(data);
    let Some(n) = <T as NumCast>::from(data.len()) else {
        return T::nan();
    };
    let ss = data.iter().fold(T::zero(), |acc, &x| acc + (x - m) * (x - m));
    (ss / n).sqrt()
}

/// Largest power of two not greater than `n` (0 for `n == 0`).
///
/// ```
/// use nonlinear_ta::utils::floor_power_of_two;
///
/// assert_eq!(floor_power_of_two(20), 16);
/// assert_eq!(floor_power_of_two(16), 16);
/// ```
#[inline]
#[must_use]
pub const fn floor_power_of_two(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}
