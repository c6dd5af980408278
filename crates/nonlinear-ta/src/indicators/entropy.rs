//! Shannon entropy and approximate entropy.
//!
//! # Shannon Entropy
//!
//! The window is read as an unnormalized probability mass `p_k = x_k / Σx`
//! and the entropy `-Σ p_k log2(p_k)` is returned in bits, with
//! `0 * log2(0) = 0`. Negative values, NaN, or a zero total make the window
//! [`InvalidInput`](crate::error::WindowError::InvalidInput).
//!
//! # Approximate Entropy
//!
//! For pattern length `m` and tolerance `r`:
//!
//! ```text
//! C_i(m) = #{ j : max_k |x[i+k] - x[j+k]| <= r } / (N - m + 1)
//! Φ(m)   = mean_i ln C_i(m)
//! ApEn   = Φ(m) - Φ(m+1)
//! ```
//!
//! Every template counts itself as a match, so `C_i > 0` on finite input.
//! The tolerance is absolute, not scaled by the window's deviation.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::indicators::entropy::{shannon, ApproximateEntropy};
//! use nonlinear_ta::traits::IndicatorKernel;
//!
//! let h = shannon(&[5.0_f64, 5.0, 5.0, 5.0]).unwrap();
//! assert!((h - 2.0).abs() < 1e-12);
//!
//! let window = [1.0_f64, 3.0, 2.0, 5.0, 4.0, 6.0, 2.0, 1.0, 3.0, 4.0];
//! let apen = ApproximateEntropy::new().tolerance(1.0).evaluate(&window).unwrap();
//! assert!((apen - 0.344_315_084_716_913).abs() < 1e-9);
//! ```

use crate::error::{Error, Result, WindowError, WindowResult};
use crate::output::AlignedOutput;
use crate::traits::{validate_positive, validate_window_len, IndicatorKernel, SeriesElement};

/// Returns the warm-up length of an entropy series.
#[inline]
#[must_use]
pub const fn entropy_lookback(window_len: usize) -> usize {
    window_len.saturating_sub(1)
}

/// Shannon entropy of one window, in bits.
///
/// # Errors
///
/// Returns `WindowError::InvalidInput` if a value is negative or NaN, or the
/// values sum to zero.
pub fn shannon<T: SeriesElement>(window: &[T]) -> WindowResult<T> {
    if window.iter().any(|&x| x.is_nan() || x < T::zero()) {
        return Err(WindowError::InvalidInput {
            reason: "probability mass must be non-negative",
        });
    }
    let total = window.iter().fold(T::zero(), |acc, &x| acc + x);
    if total == T::zero() {
        return Err(WindowError::InvalidInput {
            reason: "probability mass sums to zero",
        });
    }
    if !total.is_finite() {
        return Err(WindowError::NonFinite {
            quantity: "probability mass total",
        });
    }

    let h = window.iter().fold(T::zero(), |acc, &x| {
        let p = x / total;
        if p > T::zero() {
            acc - p * p.log2()
        } else {
            acc
        }
    });
    Ok(h)
}

/// Shannon entropy kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShannonEntropy;

impl ShannonEntropy {
    /// Creates the kernel. It has no parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T: SeriesElement> IndicatorKernel<T> for ShannonEntropy {
    type Output = T;

    fn name(&self) -> &'static str {
        "shannon_entropy"
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<T> {
        shannon(window)
    }
}

/// Shannon entropy over every window of `data`.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidParameter` if `window_len` is zero or exceeds `data.len()`
pub fn shannon_entropy<T: SeriesElement>(data: &[T], window_len: usize) -> Result<AlignedOutput<T>> {
    crate::builder::IndicatorSeriesBuilder::new(ShannonEntropy, window_len).build(data)
}

/// Approximate entropy configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ApproximateEntropy {
    pattern_len: usize,
    tolerance: f64,
}

impl Default for ApproximateEntropy {
    /// `m = 2`, `r = 3.0`.
    fn default() -> Self {
        Self {
            pattern_len: 2,
            tolerance: 3.0,
        }
    }
}

impl ApproximateEntropy {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pattern length `m`.
    ///
    /// Default: 2
    #[must_use]
    pub const fn pattern_len(mut self, m: usize) -> Self {
        self.pattern_len = m;
        self
    }

    /// Sets the absolute tolerance `r`.
    ///
    /// Default: 3.0
    #[must_use]
    pub const fn tolerance(mut self, r: f64) -> Self {
        self.tolerance = r;
        self
    }

    /// Returns `m`.
    #[must_use]
    pub const fn get_pattern_len(&self) -> usize {
        self.pattern_len
    }

    /// Returns `r`.
    #[must_use]
    pub const fn get_tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Computes the aligned ApEn series.
    ///
    /// # Errors
    ///
    /// Returns a configuration error; per-window failures are recorded in the
    /// output.
    pub fn compute<T: SeriesElement>(&self, data: &[T], window_len: usize) -> Result<AlignedOutput<T>> {
        crate::builder::IndicatorSeriesBuilder::new(*self, window_len).build(data)
    }
}

/// `Φ(m)`: mean log fraction of templates within `r` of each template.
fn phi<T: SeriesElement>(window: &[T], m: usize, r: T) -> WindowResult<T> {
    let templates = window.len() + 1 - m;
    let denom = T::count(templates)?;
    let mut total = T::zero();
    for i in 0..templates {
        let a = &window[i..i + m];
        let matches = (0..templates)
            .filter(|&j| {
                window[j..j + m]
                    .iter()
                    .zip(a)
                    .all(|(&x, &y)| (x - y).abs() <= r)
            })
            .count();
        total = total + (T::count(matches)? / denom).ln();
    }
    Ok(total / denom)
}

/// Approximate entropy of one window.
///
/// # Errors
///
/// - `WindowError::InsufficientData` if `window.len() <= m + 1` or `m == 0`
/// - `WindowError::NonFinite` if the result is NaN or infinite
pub fn approximate_entropy_window<T: SeriesElement>(window: &[T], m: usize, r: T) -> WindowResult<T> {
    if m == 0 || window.len() <= m + 1 {
        return Err(WindowError::InsufficientData {
            reason: "window must be longer than pattern length + 1",
        });
    }
    let apen = phi(window, m, r)? - phi(window, m + 1, r)?;
    if apen.is_finite() {
        Ok(apen)
    } else {
        Err(WindowError::NonFinite {
            quantity: "approximate entropy",
        })
    }
}

impl<T: SeriesElement> IndicatorKernel<T> for ApproximateEntropy {
    type Output = T;

    fn name(&self) -> &'static str {
        "approximate_entropy"
    }

    fn min_window_len(&self) -> usize {
        self.pattern_len + 2
    }

    fn validate(&self, window_len: usize) -> Result<()> {
        if self.pattern_len == 0 {
            return Err(Error::invalid_parameter(
                "approximate_entropy",
                "pattern_len",
                "must be at least 1",
            ));
        }
        validate_positive("approximate_entropy", "tolerance", self.tolerance)?;
        T::from_f64(self.tolerance)?;
        validate_window_len("approximate_entropy", window_len, self.pattern_len + 2)
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<T> {
        approximate_entropy_window(window, self.pattern_len, T::constant(self.tolerance)?)
    }
}

/// Approximate entropy over every window of `data`.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidParameter` if `m == 0`, `r` is not positive and finite,
///   or `window_len <= m + 1`
pub fn approximate_entropy<T: SeriesElement>(
    data: &[T],
    window_len: usize,
    pattern_len: usize,
    tolerance: f64,
) -> Result<AlignedOutput<T>> {
    ApproximateEntropy::new()
        .pattern_len(pattern_len)
        .tolerance(tolerance)
        .compute(data, window_len)
}
