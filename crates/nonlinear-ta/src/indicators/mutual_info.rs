//! Mutual-information delay estimator.
//!
//! Two mutually exclusive modes, selected by [`MutualInfoMode`]:
//!
//! - **Constant delay**: mutual information between the `period` samples
//!   ending `delay` steps ago and the `period` samples ending now. The
//!   window handed to the kernel is therefore `period + delay` long, and the
//!   warm-up is `period + delay - 1`.
//! - **First local minimum**: for `tau = 1, 2, ..., max_delay`, the mutual
//!   information between the window and itself shifted by `tau`. The search
//!   stops at the first `tau` whose value exceeds the previous one and
//!   reports `tau - 1`. Without such a rise the window is
//!   [`InsufficientEvidence`](crate::error::WindowError::InsufficientEvidence).
//!
//! Values are discretized with a [`Binning`] rule and mutual information is
//! measured in bits.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::indicators::mutual_info::{MutualInfoMode, MutualInformation};
//!
//! let data: Vec<f64> = (0..64).map(|t| (0.3 * f64::from(t)).sin()).collect();
//!
//! let mode: MutualInfoMode = "first_local_minimum".parse().unwrap();
//! let estimator = MutualInformation::new().mode(mode).max_delay(20);
//! let delays = estimator.compute(&data, 64).unwrap();
//! assert_eq!(delays.len(), 64);
//!
//! assert!("first minimum".parse::<MutualInfoMode>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result, WindowError, WindowResult};
use crate::kernels::histogram::{mutual_information_pair, Binning};
use crate::output::AlignedOutput;
use crate::traits::{validate_window_len, IndicatorKernel, SeriesElement};

/// How the delay is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MutualInfoMode {
    /// Fixed-lag mutual information.
    #[default]
    ConstantDelay,
    /// Delay at the first local minimum of the lagged mutual information.
    FirstLocalMinimum,
}

impl MutualInfoMode {
    /// The mode's canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConstantDelay => "constant_delay",
            Self::FirstLocalMinimum => "first_local_minimum",
        }
    }
}

impl fmt::Display for MutualInfoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MutualInfoMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "constant_delay" => Ok(Self::ConstantDelay),
            "first_local_minimum" => Ok(Self::FirstLocalMinimum),
            other => Err(Error::invalid_parameter(
                "mutual_information",
                "mode",
                format!("unknown mode `{other}`, expected `constant_delay` or `first_local_minimum`"),
            )),
        }
    }
}

/// Returns the warm-up length of a mutual-information series.
///
/// ```
/// use nonlinear_ta::indicators::mutual_info::{mutual_information_lookback, MutualInfoMode};
///
/// assert_eq!(mutual_information_lookback(20, 3, MutualInfoMode::ConstantDelay), 22);
/// assert_eq!(mutual_information_lookback(20, 3, MutualInfoMode::FirstLocalMinimum), 19);
/// ```
#[inline]
#[must_use]
pub const fn mutual_information_lookback(period: usize, delay: usize, mode: MutualInfoMode) -> usize {
    match mode {
        MutualInfoMode::ConstantDelay => (period + delay).saturating_sub(1),
        MutualInfoMode::FirstLocalMinimum => period.saturating_sub(1),
    }
}

/// Mutual information between a window and its own `delay`-step shift.
///
/// # Errors
///
/// Returns `WindowError::InsufficientData` if `delay >= window.len()`, or an
/// error from discretization.
pub fn delayed_mutual_information<T: SeriesElement>(
    window: &[T],
    delay: usize,
    binning: Binning,
) -> WindowResult<T> {
    if delay >= window.len() {
        return Err(WindowError::InsufficientData {
            reason: "delay leaves no overlapping samples",
        });
    }
    let overlap = window.len() - delay;
    mutual_information_pair(&window[..overlap], &window[delay..], binning)
}

/// Finds the first local minimum of the lagged mutual information.
///
/// Delays that leave no overlap end the search.
///
/// # Errors
///
/// Returns `WindowError::InsufficientEvidence` if the sequence never rises
/// within `max_delay`.
pub fn first_local_minimum<T: SeriesElement>(
    window: &[T],
    max_delay: usize,
    binning: Binning,
) -> WindowResult<usize> {
    let mut previous: Option<T> = None;
    for tau in 1..=max_delay.min(window.len().saturating_sub(1)) {
        let info = delayed_mutual_information(window, tau, binning)?;
        if previous.is_some_and(|p| p < info) {
            return Ok(tau - 1);
        }
        previous = Some(info);
    }
    Err(WindowError::InsufficientEvidence {
        reason: "no local minimum of mutual information within max_delay",
    })
}

/// Mutual-information estimator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MutualInformation {
    mode: MutualInfoMode,
    delay: usize,
    max_delay: usize,
    binning: Binning,
}

impl Default for MutualInformation {
    /// Constant delay of 1, `max_delay` 10, 8 equal-width bins.
    fn default() -> Self {
        Self {
            mode: MutualInfoMode::ConstantDelay,
            delay: 1,
            max_delay: 10,
            binning: Binning::default(),
        }
    }
}

impl MutualInformation {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mode.
    #[must_use]
    pub const fn mode(mut self, mode: MutualInfoMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the lag used in constant-delay mode.
    ///
    /// Default: 1
    #[must_use]
    pub const fn delay(mut self, delay: usize) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the largest lag tried in first-local-minimum mode.
    ///
    /// Default: 10
    #[must_use]
    pub const fn max_delay(mut self, max_delay: usize) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sets the discretization rule.
    ///
    /// Default: 8 equal-width bins
    #[must_use]
    pub const fn binning(mut self, binning: Binning) -> Self {
        self.binning = binning;
        self
    }

    /// Returns the mode.
    #[must_use]
    pub const fn get_mode(&self) -> MutualInfoMode {
        self.mode
    }

    /// Returns the constant delay.
    #[must_use]
    pub const fn get_delay(&self) -> usize {
        self.delay
    }

    /// Returns the largest searched delay.
    #[must_use]
    pub const fn get_max_delay(&self) -> usize {
        self.max_delay
    }

    /// Returns the discretization rule.
    #[must_use]
    pub const fn get_binning(&self) -> Binning {
        self.binning
    }

    /// Kernel window length for a given `period`.
    #[must_use]
    pub const fn window_len(&self, period: usize) -> usize {
        match self.mode {
            MutualInfoMode::ConstantDelay => period + self.delay,
            MutualInfoMode::FirstLocalMinimum => period,
        }
    }

    /// Warm-up length for a given `period`.
    #[must_use]
    pub const fn lookback(&self, period: usize) -> usize {
        mutual_information_lookback(period, self.delay, self.mode)
    }

    /// Computes the aligned series for windows of `period` samples.
    ///
    /// # Errors
    ///
    /// Returns a configuration error; per-window failures are recorded in the
    /// output.
    pub fn compute<T: SeriesElement>(&self, data: &[T], period: usize) -> Result<AlignedOutput<T>> {
        if period == 0 {
            return Err(Error::invalid_parameter(
                "mutual_information",
                "period",
                "period must be at least 1",
            ));
        }
        crate::builder::IndicatorSeriesBuilder::new(*self, self.window_len(period)).build(data)
    }
}

impl<T: SeriesElement> IndicatorKernel<T> for MutualInformation {
    type Output = T;

    fn name(&self) -> &'static str {
        "mutual_information"
    }

    fn min_window_len(&self) -> usize {
        match self.mode {
            MutualInfoMode::ConstantDelay => self.delay + 1,
            MutualInfoMode::FirstLocalMinimum => 3,
        }
    }

    fn validate(&self, window_len: usize) -> Result<()> {
        self.binning.validate("mutual_information")?;
        if self.mode == MutualInfoMode::FirstLocalMinimum && self.max_delay < 2 {
            return Err(Error::invalid_parameter(
                "mutual_information",
                "max_delay",
                "a local minimum needs at least 2 delays",
            ));
        }
        validate_window_len(
            "mutual_information",
            window_len,
            IndicatorKernel::<T>::min_window_len(self),
        )
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<T> {
        match self.mode {
            MutualInfoMode::ConstantDelay => {
                delayed_mutual_information(window, self.delay, self.binning)
            }
            MutualInfoMode::FirstLocalMinimum => {
                T::count(first_local_minimum(window, self.max_delay, self.binning)?)
            }
        }
    }
}

/// Mutual-information series for windows of `period` samples.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidParameter` if the period, delays or bins are out of range
pub fn mutual_information<T: SeriesElement>(
    data: &[T],
    period: usize,
    config: &MutualInformation,
) -> Result<AlignedOutput<T>> {
    config.compute(data, period)
}
