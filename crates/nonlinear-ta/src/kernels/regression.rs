//! Ordinary least-squares line fit with a coefficient of determination.
//!
//! Both the Lyapunov estimator (divergence curve against step) and the
//! multifractal estimator (moments against log scale) reduce to fitting a
//! straight line and reading its slope, so they share this kernel.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::kernels::regression::linear_fit;
//!
//! let x = [0.0_f64, 1.0, 2.0, 3.0];
//! let y = [1.0_f64, 3.0, 5.0, 7.0];
//! let fit = linear_fit(&x, &y).unwrap();
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! assert!((fit.intercept - 1.0).abs() < 1e-12);
//! assert!((fit.r_squared - 1.0).abs() < 1e-12);
//! ```

use crate::error::{WindowError, WindowResult};
use crate::traits::SeriesElement;

/// Result of fitting `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearFit<T> {
    /// Fitted slope.
    pub slope: T,
    /// Fitted intercept.
    pub intercept: T,
    /// Squared Pearson correlation of `x` and `y`.
    ///
    /// Zero when either variable has no variance.
    pub r_squared: T,
}

/// Fits a line through `(x[i], y[i])`.
///
/// Only the common prefix of `x` and `y` is used.
///
/// # Errors
///
/// - `WindowError::InsufficientData` for fewer than 2 points
/// - `WindowError::NonFinite` when all `x` are equal (the slope is undefined)
pub fn linear_fit<T: SeriesElement>(x: &[T], y: &[T]) -> WindowResult<LinearFit<T>> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(WindowError::InsufficientData {
            reason: "a line fit needs at least 2 points",
        });
    }
    let (x, y) = (&x[..n], &y[..n]);
    let count = T::count(n)?;

    let mean_x = x.iter().fold(T::zero(), |acc, &v| acc + v) / count;
    let mean_y = y.iter().fold(T::zero(), |acc, &v| acc + v) / count;

    let mut sxx = T::zero();
    let mut syy = T::zero();
    let mut sxy = T::zero();
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx = sxx + dx * dx;
        syy = syy + dy * dy;
        sxy = sxy + dx * dy;
    }

    if sxx == T::zero() {
        return Err(WindowError::NonFinite {
            quantity: "regression slope",
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let r = if syy == T::zero() {
        T::zero()
    } else {
        let r = sxy / (sxx * syy).sqrt();
        // Rounding can push |r| a hair past 1
        if r.is_finite() {
            r.max(-T::one()).min(T::one())
        } else {
            r
        }
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared: r * r,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{approx_eq, EPSILON};

    #[test]
    fn test_exact_line() {
        let x = [1.0_f64, 2.0, 3.0];
        let y = [-1.0_f64, -3.0, -5.0];
        let fit = linear_fit(&x, &y).unwrap();
        assert!(approx_eq(fit.slope, -2.0, EPSILON));
        assert!(approx_eq(fit.intercept, 1.0, EPSILON));
        assert!(approx_eq(fit.r_squared, 1.0, EPSILON));
    }

    #[test]
    fn test_noisy_line() {
        let x = [0.0_f64, 1.0, 2.0, 3.0];
        let y = [0.0_f64, 1.0, 1.0, 2.0];
        let fit = linear_fit(&x, &y).unwrap();
        // sxy = 3.5, sxx = 5, syy = 2.75
        assert!(approx_eq(fit.slope, 0.7, EPSILON));
        assert!(approx_eq(fit.intercept, 0.0 + 1.0 - 0.7 * 1.5, EPSILON));
        assert!(approx_eq(fit.r_squared, 3.5 * 3.5 / (5.0 * 2.75), EPSILON));
    }

    #[test]
    fn test_flat_y_has_zero_r_squared() {
        let fit = linear_fit(&[0.0_f64, 1.0, 2.0], &[4.0, 4.0, 4.0]).unwrap();
        assert!(approx_eq(fit.slope, 0.0, EPSILON));
        assert!(approx_eq(fit.r_squared, 0.0, EPSILON));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            linear_fit(&[1.0_f64], &[1.0]),
            Err(WindowError::InsufficientData { .. })
        ));
        assert!(matches!(
            linear_fit(&[1.0_f64, 1.0], &[1.0, 2.0]),
            Err(WindowError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_uses_common_prefix() {
        let fit = linear_fit(&[0.0_f64, 1.0, 2.0, 3.0], &[0.0, 2.0]).unwrap();
        assert!(approx_eq(fit.slope, 2.0, EPSILON));
    }
}
