//! Largest Lyapunov exponent estimator.
//!
//! Estimates the average exponential rate at which nearby states of a window
//! diverge.
//!
//! # Algorithm
//!
//! 1. **Diameter search**: walk a geometric ladder of candidate diameters from
//!    `start` down to `start * 2^final_exponent`. Stop at the first (largest)
//!    diameter for which at most `max_pairs` index pairs `(i, j)` satisfy
//!    `|x_i - x_j| <= d`. If none qualifies, the smallest candidate is used.
//! 2. **Divergence tracking**: for every pair closer than the chosen diameter,
//!    follow both trajectories forward and record `ln|x_{i+k} - x_{j+k}|` at
//!    each step `k`, skipping zero and undefined distances. The mean log
//!    distance per step is the divergence curve `y(k)`.
//! 3. **Regression selection**: fit `y` against `k` over growing prefixes of
//!    the curve (at least `min_fit_points`) and keep the first prefix with the
//!    highest R². Its slope is the exponent.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::indicators::lyapunov::lyapunov_exponent;
//!
//! let window: Vec<f64> = (0..20)
//!     .map(|t| f64::from(t % 7) + 0.3 * f64::from(t % 3))
//!     .collect();
//! let estimate = lyapunov_exponent(&window, &Default::default()).unwrap();
//!
//! assert!(estimate.exponent > 0.0);
//! assert_eq!(estimate.cutoff, 3);
//! ```

use std::cmp::Ordering;

use crate::error::{Error, Result, WindowError, WindowResult};
use crate::kernels::regression::{linear_fit, LinearFit};
use crate::output::AlignedOutput;
use crate::traits::{validate_positive, IndicatorKernel, SeriesElement};

/// Shortest window the estimator accepts.
pub const LYAPUNOV_MIN_WINDOW: usize = 3;

/// Returns the warm-up length of a Lyapunov series.
///
/// ```
/// use nonlinear_ta::indicators::lyapunov::lyapunov_lookback;
///
/// assert_eq!(lyapunov_lookback(20), 19);
/// ```
#[inline]
#[must_use]
pub const fn lyapunov_lookback(window_len: usize) -> usize {
    window_len.saturating_sub(1)
}

/// The geometric ladder of candidate diameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiameterSearch {
    start: f64,
    final_exponent: f64,
    steps: usize,
    max_pairs: usize,
}

impl Default for DiameterSearch {
    /// 200 candidates from `5` down to `5 * 2^-50`, accepting at most 15 pairs.
    fn default() -> Self {
        Self {
            start: 5.0,
            final_exponent: -50.0,
            steps: 200,
            max_pairs: 15,
        }
    }
}

impl DiameterSearch {
    /// Creates the default ladder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the largest candidate.
    ///
    /// Default: 5.0
    #[must_use]
    pub const fn start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Sets the base-2 exponent of the last candidate relative to `start`.
    ///
    /// Default: -50.0
    #[must_use]
    pub const fn final_exponent(mut self, final_exponent: f64) -> Self {
        self.final_exponent = final_exponent;
        self
    }

    /// Sets the number of candidates.
    ///
    /// Default: 200
    #[must_use]
    pub const fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the largest acceptable number of near pairs.
    ///
    /// Default: 15
    #[must_use]
    pub const fn max_pairs(mut self, max_pairs: usize) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    /// Returns the largest candidate.
    #[must_use]
    pub const fn get_start(&self) -> f64 {
        self.start
    }

    /// Returns the final exponent.
    #[must_use]
    pub const fn get_final_exponent(&self) -> f64 {
        self.final_exponent
    }

    /// Returns the number of candidates.
    #[must_use]
    pub const fn get_steps(&self) -> usize {
        self.steps
    }

    /// Returns the pair limit.
    #[must_use]
    pub const fn get_max_pairs(&self) -> usize {
        self.max_pairs
    }

    /// Candidate diameters, largest first.
    pub fn candidates(&self) -> impl Iterator<Item = f64> + '_ {
        let last = self.steps.saturating_sub(1).max(1) as f64;
        (0..self.steps).map(move |i| self.start * (self.final_exponent * i as f64 / last).exp2())
    }

    /// Validates the ladder.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` if `start` is not positive and
    /// finite, `final_exponent` is not finite, or `steps` is zero.
    pub fn validate(&self) -> Result<()> {
        validate_positive("lyapunov", "diameter_start", self.start)?;
        if !self.final_exponent.is_finite() {
            return Err(Error::invalid_parameter(
                "lyapunov",
                "final_exponent",
                "must be finite",
            ));
        }
        if self.steps == 0 {
            return Err(Error::invalid_parameter(
                "lyapunov",
                "steps",
                "at least one candidate diameter is required",
            ));
        }
        Ok(())
    }
}

/// Lyapunov estimator configuration.
///
/// # Example
///
/// ```
/// use nonlinear_ta::indicators::lyapunov::{DiameterSearch, Lyapunov};
///
/// let data: Vec<f64> = (0..60).map(|t| f64::from(t % 7)).collect();
/// let estimator = Lyapunov::new()
///     .search(DiameterSearch::new().max_pairs(10))
///     .min_fit_points(4);
/// let output = estimator.compute(&data, 20).unwrap();
/// assert_eq!(output.lookback(), 19);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Lyapunov {
    search: DiameterSearch,
    min_fit_points: usize,
}

impl Default for Lyapunov {
    fn default() -> Self {
        Self {
            search: DiameterSearch::default(),
            min_fit_points: 3,
        }
    }
}

impl Lyapunov {
    /// Creates the default estimator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diameter search.
    #[must_use]
    pub const fn search(mut self, search: DiameterSearch) -> Self {
        self.search = search;
        self
    }

    /// Sets the smallest prefix considered by the regression.
    ///
    /// Default: 3
    #[must_use]
    pub const fn min_fit_points(mut self, points: usize) -> Self {
        self.min_fit_points = points;
        self
    }

    /// Returns the diameter search.
    #[must_use]
    pub const fn get_search(&self) -> &DiameterSearch {
        &self.search
    }

    /// Returns the smallest regression prefix.
    #[must_use]
    pub const fn get_min_fit_points(&self) -> usize {
        self.min_fit_points
    }

    /// Computes the aligned estimate series.
    ///
    /// # Errors
    ///
    /// Returns a configuration error; per-window failures are recorded in the
    /// output.
    pub fn compute<T: SeriesElement>(
        &self,
        data: &[T],
        window_len: usize,
    ) -> Result<AlignedOutput<LyapunovEstimate<T>>> {
        crate::builder::IndicatorSeriesBuilder::new(*self, window_len).build(data)
    }
}

/// Lyapunov estimate for one window, with its fit diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LyapunovEstimate<T> {
    /// Slope of the selected fit: the exponent.
    pub exponent: T,
    /// Intercept of the selected fit.
    pub intercept: T,
    /// R² of the selected fit.
    pub r_squared: T,
    /// Number of curve points in the selected prefix.
    pub cutoff: usize,
    /// Diameter chosen by the search.
    pub diameter: T,
    /// Number of points on the divergence curve.
    pub points: usize,
}

/// Picks the neighborhood diameter for a window.
///
/// # Errors
///
/// Returns `WindowError::NonFinite` if a candidate cannot be represented in `T`.
pub fn select_diameter<T: SeriesElement>(window: &[T], search: &DiameterSearch) -> WindowResult<T> {
    let mut distances = Vec::with_capacity(window.len() * window.len().saturating_sub(1) / 2);
    for (i, &xi) in window.iter().enumerate() {
        for &xj in &window[i + 1..] {
            let d = (xi - xj).abs();
            if !d.is_nan() {
                distances.push(d);
            }
        }
    }
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut chosen = None;
    for candidate in search.candidates() {
        let d = T::constant(candidate)?;
        chosen = Some(d);
        if distances.partition_point(|&x| x <= d) <= search.max_pairs {
            break;
        }
    }
    chosen.ok_or(WindowError::InsufficientData {
        reason: "no candidate diameter",
    })
}

/// Mean log-divergence per step for pairs closer than `diameter`.
///
/// Returns the `(step, mean log distance)` points; steps with no usable
/// distance are left out.
///
/// # Errors
///
/// Returns `WindowError::NonFinite` if a step index cannot be represented in `T`.
pub fn divergence_curve<T: SeriesElement>(window: &[T], diameter: T) -> WindowResult<(Vec<T>, Vec<T>)> {
    let len = window.len();
    let mut sums = vec![T::zero(); len];
    let mut counts = vec![0_usize; len];

    for i in 0..len {
        for j in i + 1..len {
            if !((window[i] - window[j]).abs() < diameter) {
                continue;
            }
            for k in 0..len - j {
                let d = (window[i + k] - window[j + k]).abs();
                if d == T::zero() || d.is_nan() {
                    continue;
                }
                sums[k] = sums[k] + d.ln();
                counts[k] += 1;
            }
        }
    }

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (k, (&sum, &count)) in sums.iter().zip(&counts).enumerate() {
        if count > 0 {
            xs.push(T::count(k)?);
            ys.push(sum / T::count(count)?);
        }
    }
    Ok((xs, ys))
}

/// Estimates the Lyapunov exponent of one window.
///
/// # Errors
///
/// - `WindowError::InsufficientData` if the divergence curve has fewer than 2 points
/// - `WindowError::NonFinite` if the selected fit is not finite
pub fn lyapunov_exponent<T: SeriesElement>(
    window: &[T],
    config: &Lyapunov,
) -> WindowResult<LyapunovEstimate<T>> {
    let diameter = select_diameter(window, &config.search)?;
    let (xs, ys) = divergence_curve(window, diameter)?;
    let points = xs.len();
    if points < 2 {
        return Err(WindowError::InsufficientData {
            reason: "fewer than 2 divergence points",
        });
    }

    let first = config.min_fit_points.clamp(2, points);
    let mut best: Option<(usize, LinearFit<T>)> = None;
    for cutoff in first..=points {
        let fit = linear_fit(&xs[..cutoff], &ys[..cutoff])?;
        if best.map_or(true, |(_, b)| fit.r_squared > b.r_squared) {
            best = Some((cutoff, fit));
        }
    }
    let (cutoff, fit) = best.ok_or(WindowError::InsufficientData {
        reason: "no regression prefix",
    })?;

    if !fit.slope.is_finite() {
        return Err(WindowError::NonFinite {
            quantity: "lyapunov exponent",
        });
    }

    Ok(LyapunovEstimate {
        exponent: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        cutoff,
        diameter,
        points,
    })
}

impl<T: SeriesElement> IndicatorKernel<T> for Lyapunov {
    type Output = LyapunovEstimate<T>;

    fn name(&self) -> &'static str {
        "lyapunov"
    }

    fn min_window_len(&self) -> usize {
        LYAPUNOV_MIN_WINDOW
    }

    fn validate(&self, window_len: usize) -> Result<()> {
        self.search.validate()?;
        if self.min_fit_points < 2 {
            return Err(Error::invalid_parameter(
                "lyapunov",
                "min_fit_points",
                "a line fit needs at least 2 points",
            ));
        }
        crate::traits::validate_window_len("lyapunov", window_len, LYAPUNOV_MIN_WINDOW)
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<LyapunovEstimate<T>> {
        lyapunov_exponent(window, self)
    }
}

/// Lyapunov estimates over every window of `data`, with default parameters.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidParameter` if `window_len < 3` or `window_len > data.len()`
pub fn lyapunov<T: SeriesElement>(
    data: &[T],
    window_len: usize,
) -> Result<AlignedOutput<LyapunovEstimate<T>>> {
    Lyapunov::new().compute(data, window_len)
}
