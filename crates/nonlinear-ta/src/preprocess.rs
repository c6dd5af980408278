//! Window normalization.
//!
//! The multifractal estimator needs strictly positive, bounded input. The
//! [`Preprocessor`] maps a raw window into `(0, 1)`: z-score with the
//! population standard deviation, then the logistic function.
//!
//! A finite zero-variance window z-scores to all zeros, so it comes out as
//! 0.5 everywhere. NaN and infinities propagate.

use crate::traits::SeriesElement;
use crate::utils::{mean, population_std};

/// Normalization applied to a window before a kernel sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preprocessor {
    /// Pass values through unchanged.
    Identity,
    /// Z-score followed by the logistic squash.
    #[default]
    ZScoreLogistic,
}

impl Preprocessor {
    /// Applies the normalization, returning a new vector.
    #[must_use]
    pub fn apply<T: SeriesElement>(self, window: &[T]) -> Vec<T> {
        match self {
            Self::Identity => window.to_vec(),
            Self::ZScoreLogistic => {
                let mut out = zscore(window);
                for v in &mut out {
                    *v = logistic(*v);
                }
                out
            }
        }
    }
}

/// Standardizes to zero mean and unit population standard deviation.
///
/// A constant finite input gives all zeros. A non-finite value makes the
/// whole output NaN.
#[must_use]
pub fn zscore<T: SeriesElement>(window: &[T]) -> Vec<T> {
    let m = mean(window);
    let sd = population_std(window);
    if sd.is_finite() && sd <= T::zero() {
        return vec![T::zero(); window.len()];
    }
    window.iter().map(|&x| (x - m) / sd).collect()
}

/// The logistic function `1 / (1 + e^-x)`.
#[inline]
#[must_use]
pub fn logistic<T: SeriesElement>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{approx_eq, EPSILON};

    #[test]
    fn test_zscore() {
        let z = zscore(&[1.0_f64, 2.0, 3.0]);
        let sd = (2.0_f64 / 3.0).sqrt();
        assert!(approx_eq(z[0], -1.0 / sd, EPSILON));
        assert!(approx_eq(z[1], 0.0, EPSILON));
        assert!(approx_eq(z[2], 1.0 / sd, EPSILON));
    }

    #[test]
    fn test_flat_window_maps_to_half() {
        let out = Preprocessor::ZScoreLogistic.apply(&[3.0_f64; 8]);
        assert!(out.iter().all(|&v| approx_eq(v, 0.5, EPSILON)));
    }

    #[test]
    fn test_nan_propagates() {
        let out = Preprocessor::ZScoreLogistic.apply(&[1.0_f64, f64::NAN, 3.0, 4.0]);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_output_strictly_inside_unit_interval() {
        let data: Vec<f64> = (0..50).map(|i| f64::from(i).powi(2)).collect();
        let out = Preprocessor::default().apply(&data);
        assert!(out.iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_identity() {
        let data = [1.0_f32, -2.0];
        assert_eq!(Preprocessor::Identity.apply(&data), vec![1.0, -2.0]);
    }

    #[test]
    fn test_logistic() {
        assert!(approx_eq(logistic(0.0_f64), 0.5, EPSILON));
        assert!(logistic(40.0_f64) > 0.999);
    }
}
