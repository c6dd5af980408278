//! Lempel-Ziv (LZ76) structural complexity.
//!
//! Each window is binarized against its own mean (`1` if `x >= mean`, else
//! `0`), then the Kaspar-Schuster form of the LZ76 parsing counts how many
//! new phrases are needed to build the sequence from its own past.
//!
//! A constant window binarizes to all ones; its complexity stays at 2 for any
//! length above one. A random binary sequence of length `n` approaches
//! `n / log2(n)`.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::indicators::lempel_ziv::lempel_ziv_complexity;
//!
//! assert_eq!(lempel_ziv_complexity(&[1, 0, 0, 1, 0, 1, 1, 0]), 5);
//! ```

use crate::error::{Result, WindowResult};
use crate::output::AlignedOutput;
use crate::traits::{IndicatorKernel, SeriesElement};
use crate::utils::mean;

/// Returns the warm-up length of a Lempel-Ziv series.
#[inline]
#[must_use]
pub const fn lempel_ziv_lookback(window_len: usize) -> usize {
    window_len.saturating_sub(1)
}

/// Maps each value to `1` if it is at or above the mean of `window`, else `0`.
#[must_use]
pub fn binarize<T: SeriesElement>(window: &[T]) -> Vec<u8> {
    let m = mean(window);
    window.iter().map(|&x| u8::from(x >= m)).collect()
}

/// LZ76 complexity of a symbol sequence.
///
/// Empty input gives 0 and a single symbol gives 1.
#[must_use]
pub fn lempel_ziv_complexity<S: PartialEq>(s: &[S]) -> usize {
    let n = s.len();
    if n <= 1 {
        return n;
    }

    // i: start of the candidate earlier match, k: current match length,
    // l: start of the phrase being parsed
    let (mut i, mut k, mut l) = (0, 1, 1);
    let (mut complexity, mut k_max) = (1, 1);
    loop {
        if s[i + k - 1] == s[l + k - 1] {
            k += 1;
            if l + k > n {
                complexity += 1;
                break;
            }
        } else {
            k_max = k_max.max(k);
            i += 1;
            if i == l {
                complexity += 1;
                l += k_max;
                if l + 1 > n {
                    break;
                }
                i = 0;
                k = 1;
                k_max = 1;
            } else {
                k = 1;
            }
        }
    }
    complexity
}

/// Lempel-Ziv complexity kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LempelZiv;

impl LempelZiv {
    /// Creates the kernel. It has no parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the aligned complexity series.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty series or an out-of-range
    /// window length.
    pub fn compute<T: SeriesElement>(&self, data: &[T], window_len: usize) -> Result<AlignedOutput<usize>> {
        crate::builder::IndicatorSeriesBuilder::new(*self, window_len).build(data)
    }
}

impl<T: SeriesElement> IndicatorKernel<T> for LempelZiv {
    type Output = usize;

    fn name(&self) -> &'static str {
        "lempel_ziv"
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<usize> {
        Ok(lempel_ziv_complexity(&binarize(window)))
    }
}

/// Lempel-Ziv complexity over every window of `data`.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidParameter` if `window_len` is zero or exceeds `data.len()`
pub fn lempel_ziv<T: SeriesElement>(data: &[T], window_len: usize) -> Result<AlignedOutput<usize>> {
    LempelZiv::new().compute(data, window_len)
}
