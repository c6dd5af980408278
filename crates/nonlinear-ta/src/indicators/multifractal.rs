//! Multifractal spectrum by the Chhabra-Jensen direct method.
//!
//! # Algorithm
//!
//! The analysis segment is the most recent `n` samples of the window, where
//! `n` is the largest power of two not above the window length. It is
//! normalized by the configured [`Preprocessor`] (z-score then logistic by
//! default), which makes every sample strictly positive.
//!
//! For each scale `s`, the segment is cut into `2^s` blocks of `n / 2^s`
//! samples and each block gets the mass `P = block_sum / total`. For each
//! integer moment order `q`:
//!
//! ```text
//! μ     = P^q / Σ P^q
//! Mα    = Σ μ log10 P
//! Mf    = Σ μ log10 μ
//! Md    = log10 Σ P^q              (q <= 0 or q > 1)
//! Md    = Σ P log10 P / Σ P^q      (0 < q <= 1)
//! ```
//!
//! `α(q)`, `f(q)` and the slope behind `D(q)` come from regressing `Mα`, `Mf`
//! and `Md` on `-log10(2^s)`. `D(q)` is that slope for `0 < q <= 1` and the
//! slope divided by `q - 1` otherwise.
//!
//! The kernel output is the [`SpectrumSummary`]: width `max α - min α` and
//! height `|f(α_max) - f(α_min)|`, taken over the orders whose `α` and `f`
//! are both finite.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::indicators::multifractal::Multifractal;
//! use nonlinear_ta::traits::IndicatorKernel;
//!
//! // A flat window has a single-point spectrum
//! let summary = Multifractal::new().evaluate(&[3.0_f64; 32]).unwrap();
//! assert!(summary.width.abs() < 1e-9);
//! ```

use crate::error::{Error, Result, WindowError, WindowResult};
use crate::kernels::regression::linear_fit;
use crate::output::AlignedOutput;
use crate::preprocess::Preprocessor;
use crate::traits::{validate_window_len, IndicatorKernel, SeriesElement};
use crate::utils::floor_power_of_two;

/// Returns the warm-up length of a multifractal series.
#[inline]
#[must_use]
pub const fn multifractal_lookback(window_len: usize) -> usize {
    window_len.saturating_sub(1)
}

/// Full Chhabra-Jensen spectrum of one segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultifractalSpectrum<T> {
    /// Moment orders.
    pub q: Vec<i32>,
    /// Singularity strength `α(q)`.
    pub alpha: Vec<T>,
    /// Singularity spectrum `f(α(q))`.
    pub f_alpha: Vec<T>,
    /// Generalized dimensions `D(q)`.
    pub dq: Vec<T>,
    /// R² of the `α` regressions.
    pub alpha_r_squared: Vec<T>,
    /// R² of the `f` regressions.
    pub f_alpha_r_squared: Vec<T>,
    /// R² of the `D` regressions.
    pub dq_r_squared: Vec<T>,
    /// Regression abscissae, `-log10(2^s)` per scale.
    pub log_scales: Vec<T>,
}

/// Spectrum width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectrumSummary<T> {
    /// `max α - min α`.
    pub width: T,
    /// `|f(α_max) - f(α_min)|`.
    pub height: T,
}

impl<T: SeriesElement> MultifractalSpectrum<T> {
    /// Width and height over the orders with finite `α` and `f`.
    ///
    /// Ties resolve to the lowest moment order.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::DegenerateSpectrum` if fewer than 2 orders remain.
    pub fn summary(&self) -> WindowResult<SpectrumSummary<T>> {
        let valid: Vec<(T, T)> = self
            .alpha
            .iter()
            .zip(&self.f_alpha)
            .filter(|(a, f)| a.is_finite() && f.is_finite())
            .map(|(&a, &f)| (a, f))
            .collect();
        if valid.len() < 2 {
            return Err(WindowError::DegenerateSpectrum { valid: valid.len() });
        }

        let (mut max_i, mut min_i) = (0, 0);
        for (i, &(a, _)) in valid.iter().enumerate() {
            if a > valid[max_i].0 {
                max_i = i;
            }
            if a < valid[min_i].0 {
                min_i = i;
            }
        }
        Ok(SpectrumSummary {
            width: valid[max_i].0 - valid[min_i].0,
            height: (valid[max_i].1 - valid[min_i].1).abs(),
        })
    }
}

/// Computes the Chhabra-Jensen spectrum of a positive segment.
///
/// `segment.len()` must be divisible by `2^s` for every scale.
///
/// # Errors
///
/// - `WindowError::InsufficientData` for fewer than 2 scales, a scale of 0,
///   or a scale finer than the segment allows
/// - `WindowError::InvalidInput` if the segment's total mass is not positive
pub fn chhabra_jensen<T: SeriesElement>(
    segment: &[T],
    q_values: &[i32],
    scales: &[u32],
) -> WindowResult<MultifractalSpectrum<T>> {
    let n = segment.len();
    if scales.len() < 2 {
        return Err(WindowError::InsufficientData {
            reason: "at least 2 scales are required",
        });
    }
    let mut block_counts = Vec::with_capacity(scales.len());
    for &s in scales {
        let blocks = 1_usize.checked_shl(s).filter(|&b| s > 0 && b <= n && n % b == 0);
        block_counts.push(blocks.ok_or(WindowError::InsufficientData {
            reason: "scale does not divide the analysis segment",
        })?);
    }

    let total = segment.iter().fold(T::zero(), |acc, &x| acc + x);
    if !(total > T::zero()) {
        return Err(WindowError::InvalidInput {
            reason: "multifractal mass must be positive",
        });
    }

    // Block masses per scale, computed once and shared by every q
    let masses: Vec<Vec<T>> = block_counts
        .iter()
        .map(|&blocks| {
            segment
                .chunks(n / blocks)
                .map(|c| c.iter().fold(T::zero(), |acc, &x| acc + x) / total)
                .collect()
        })
        .collect();
    let log_scales = block_counts
        .iter()
        .map(|&blocks| T::count(blocks).map(|b| -b.log10()))
        .collect::<WindowResult<Vec<T>>>()?;

    let mut spectrum = MultifractalSpectrum {
        q: q_values.to_vec(),
        alpha: Vec::with_capacity(q_values.len()),
        f_alpha: Vec::with_capacity(q_values.len()),
        dq: Vec::with_capacity(q_values.len()),
        alpha_r_squared: Vec::with_capacity(q_values.len()),
        f_alpha_r_squared: Vec::with_capacity(q_values.len()),
        dq_r_squared: Vec::with_capacity(q_values.len()),
        log_scales,
    };

    let mut m_alpha = Vec::with_capacity(scales.len());
    let mut m_f = Vec::with_capacity(scales.len());
    let mut m_d = Vec::with_capacity(scales.len());
    for &q in q_values {
        m_alpha.clear();
        m_f.clear();
        m_d.clear();
        let unit_interval = q == 1;

        for p in &masses {
            let norm = p.iter().fold(T::zero(), |acc, &v| acc + v.powi(q));
            let mut ma = T::zero();
            let mut mf = T::zero();
            let mut entropy = T::zero();
            for &pi in p {
                let mu = pi.powi(q) / norm;
                ma = ma + mu * pi.log10();
                mf = mf + mu * mu.log10();
                entropy = entropy + pi * pi.log10();
            }
            m_alpha.push(ma);
            m_f.push(mf);
            m_d.push(if unit_interval { entropy / norm } else { norm.log10() });
        }

        let (alpha, alpha_r2) = slope_or_nan(&spectrum.log_scales, &m_alpha);
        let (f, f_r2) = slope_or_nan(&spectrum.log_scales, &m_f);
        let (d, d_r2) = slope_or_nan(&spectrum.log_scales, &m_d);
        let dq = if unit_interval {
            d
        } else {
            d / (T::constant(f64::from(q))? - T::one())
        };

        spectrum.alpha.push(alpha);
        spectrum.f_alpha.push(f);
        spectrum.dq.push(dq);
        spectrum.alpha_r_squared.push(alpha_r2);
        spectrum.f_alpha_r_squared.push(f_r2);
        spectrum.dq_r_squared.push(d_r2);
    }

    Ok(spectrum)
}

fn slope_or_nan<T: SeriesElement>(x: &[T], y: &[T]) -> (T, T) {
    linear_fit(x, y).map_or((T::nan(), T::nan()), |fit| (fit.slope, fit.r_squared))
}

/// Multifractal spectrum configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Multifractal {
    q_min: i32,
    q_max: i32,
    min_scale: u32,
    max_scale: Option<u32>,
    preprocessor: Preprocessor,
}

impl Default for Multifractal {
    /// `q` from -40 to 40, scales from 1 to `log2(n)`, z-score + logistic.
    fn default() -> Self {
        Self {
            q_min: -40,
            q_max: 40,
            min_scale: 1,
            max_scale: None,
            preprocessor: Preprocessor::ZScoreLogistic,
        }
    }
}

impl Multifractal {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusive range of integer moment orders.
    ///
    /// Default: -40 ..= 40
    #[must_use]
    pub const fn q_range(mut self, q_min: i32, q_max: i32) -> Self {
        self.q_min = q_min;
        self.q_max = q_max;
        self
    }

    /// Sets the inclusive range of dyadic scales.
    ///
    /// Default: 1 ..= log2(n)
    #[must_use]
    pub const fn scale_range(mut self, min_scale: u32, max_scale: u32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = Some(max_scale);
        self
    }

    /// Sets the window normalization.
    ///
    /// Default: [`Preprocessor::ZScoreLogistic`]
    #[must_use]
    pub const fn preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Returns the moment-order range.
    #[must_use]
    pub const fn get_q_range(&self) -> (i32, i32) {
        (self.q_min, self.q_max)
    }

    /// Returns the configured scale range; `None` for the upper bound means
    /// `log2(n)`.
    #[must_use]
    pub const fn get_scale_range(&self) -> (u32, Option<u32>) {
        (self.min_scale, self.max_scale)
    }

    /// Returns the normalization.
    #[must_use]
    pub const fn get_preprocessor(&self) -> Preprocessor {
        self.preprocessor
    }

    /// Moment orders.
    #[must_use]
    pub fn q_values(&self) -> Vec<i32> {
        (self.q_min..=self.q_max).collect()
    }

    /// Scales used for a segment of `n` samples.
    #[must_use]
    pub fn scales(&self, n: usize) -> Vec<u32> {
        let top = self.max_scale.unwrap_or_else(|| n.max(1).ilog2());
        (self.min_scale..=top).collect()
    }

    /// Full spectrum of the most recent power-of-two samples of `window`.
    ///
    /// # Errors
    ///
    /// - `WindowError::InvalidInput` if the analysed samples include NaN or
    ///   an infinity
    /// - otherwise see [`chhabra_jensen`]
    pub fn spectrum<T: SeriesElement>(&self, window: &[T]) -> WindowResult<MultifractalSpectrum<T>> {
        let n = floor_power_of_two(window.len());
        let tail = &window[window.len() - n..];
        if tail.iter().any(|v| !v.is_finite()) {
            return Err(WindowError::InvalidInput {
                reason: "multifractal window holds a non-finite value",
            });
        }
        let segment = self.preprocessor.apply(tail);
        chhabra_jensen(&segment, &self.q_values(), &self.scales(n))
    }

    /// Computes the aligned summary series.
    ///
    /// # Errors
    ///
    /// Returns a configuration error; per-window failures are recorded in the
    /// output.
    pub fn compute<T: SeriesElement>(
        &self,
        data: &[T],
        window_len: usize,
    ) -> Result<AlignedOutput<SpectrumSummary<T>>> {
        crate::builder::IndicatorSeriesBuilder::new(*self, window_len).build(data)
    }

    fn required_len(&self) -> Option<usize> {
        let top = match self.max_scale {
            Some(top) => top,
            None => self.min_scale.checked_add(1)?,
        };
        1_usize.checked_shl(top)
    }
}

impl<T: SeriesElement> IndicatorKernel<T> for Multifractal {
    type Output = SpectrumSummary<T>;

    fn name(&self) -> &'static str {
        "multifractal"
    }

    fn min_window_len(&self) -> usize {
        self.required_len().unwrap_or(usize::MAX)
    }

    fn validate(&self, window_len: usize) -> Result<()> {
        if self.q_min > self.q_max {
            return Err(Error::invalid_parameter(
                "multifractal",
                "q_range",
                format!("empty range {}..={}", self.q_min, self.q_max),
            ));
        }
        if self.min_scale == 0 {
            return Err(Error::invalid_parameter(
                "multifractal",
                "scale_range",
                "the smallest scale must be at least 1",
            ));
        }
        if let Some(max) = self.max_scale {
            if max <= self.min_scale {
                return Err(Error::invalid_parameter(
                    "multifractal",
                    "scale_range",
                    "at least 2 scales are required",
                ));
            }
        }
        let Some(required) = self.required_len() else {
            return Err(Error::invalid_parameter(
                "multifractal",
                "scale_range",
                "scale too large",
            ));
        };
        validate_window_len("multifractal", window_len, required)
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<SpectrumSummary<T>> {
        self.spectrum(window)?.summary()
    }
}

/// Multifractal spectrum summaries over every window of `data`, with default
/// parameters.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidParameter` if `window_len < 4` or `window_len > data.len()`
pub fn multifractal<T: SeriesElement>(
    data: &[T],
    window_len: usize,
) -> Result<AlignedOutput<SpectrumSummary<T>>> {
    Multifractal::new().compute(data, window_len)
}

/// Spectrum width `alpha_max - alpha_min` over every window of `data`.
///
/// # Errors
///
/// See [`multifractal`].
pub fn multifractal_width<T: SeriesElement>(data: &[T], window_len: usize) -> Result<AlignedOutput<T>> {
    Ok(multifractal(data, window_len)?.map(|s| s.width))
}

/// Spectrum height `|f(alpha_max) - f(alpha_min)|` over every window of `data`.
///
/// # Errors
///
/// See [`multifractal`].
pub fn multifractal_height<T: SeriesElement>(data: &[T], window_len: usize) -> Result<AlignedOutput<T>> {
    Ok(multifractal(data, window_len)?.map(|s| s.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{approx_eq, LOOSE_EPSILON};

    const W16: [f64; 16] = [
        1.0, 2.0, 3.0, 4.0, 2.0, 1.0, 5.0, 3.0, 2.0, 4.0, 6.0, 1.0, 3.0, 2.0, 4.0, 5.0,
    ];

    fn small() -> Multifractal {
        Multifractal::new().q_range(-5, 5).scale_range(1, 3)
    }

    #[test]
    fn test_reference_summary() {
        let summary = small().evaluate(&W16).unwrap();
        assert!(approx_eq(summary.width, 0.488_534_775_717_640_7, 1e-9));
        assert!(approx_eq(summary.height, 0.292_818_159_317_103, 1e-9));
    }

    #[test]
    fn test_reference_spectrum_points() {
        let spectrum = small().spectrum(&W16).unwrap();
        assert_eq!(spectrum.q, (-5..=5).collect::<Vec<_>>());
        assert_eq!(spectrum.log_scales.len(), 3);

        // q = -5
        assert!(approx_eq(spectrum.alpha[0], 1.342_124_168_466_146_2, 1e-9));
        assert!(approx_eq(spectrum.f_alpha[0], 0.394_794_964_115_811_4, 1e-9));
        assert!(approx_eq(spectrum.dq[0], 1.184_235_967_741_090_7, 1e-9));
        // q = 0
        assert!(approx_eq(spectrum.alpha[5], 1.035_997_333_860_663_4, 1e-9));
        assert!(approx_eq(spectrum.f_alpha[5], 1.0, 1e-9));
        assert!(approx_eq(spectrum.dq[5], 1.0, 1e-9));
        // q = 1: information dimension, α = f = D
        assert!(approx_eq(spectrum.alpha[6], 0.967_333_552_617_094_6, 1e-9));
        assert!(approx_eq(spectrum.f_alpha[6], 0.967_333_552_617_094_6, 1e-9));
        assert!(approx_eq(spectrum.dq[6], 0.967_333_552_617_094_6, 1e-9));
        // q = 5
        assert!(approx_eq(spectrum.alpha[10], 0.853_589_392_748_505_5, 1e-9));
        assert!(approx_eq(spectrum.f_alpha[10], 0.687_613_123_432_914_4, 1e-9));
        assert!(approx_eq(spectrum.dq[10], 0.895_083_460_077_403_2, 1e-9));
    }

    #[test]
    fn test_uses_most_recent_power_of_two() {
        let mut window = vec![9.0_f64; 4];
        window.extend_from_slice(&W16);
        let summary = Multifractal::new().evaluate(&window).unwrap();
        assert!(approx_eq(summary.width, 0.644_397_507_750_818_9, 1e-9));
        assert!(approx_eq(summary.height, 0.256_675_438_439_025_96, 1e-9));
    }

    #[test]
    fn test_flat_window_constant_alpha() {
        let spectrum = Multifractal::new().spectrum(&[7.5_f64; 64]).unwrap();
        assert!(spectrum
            .alpha
            .iter()
            .all(|&a| approx_eq(a, 1.0, LOOSE_EPSILON)));
        let summary = spectrum.summary().unwrap();
        assert!(summary.width.abs() < LOOSE_EPSILON);
    }

    #[test]
    fn test_degenerate_spectrum() {
        let spectrum = MultifractalSpectrum {
            q: vec![1, 2],
            alpha: vec![1.0_f64, f64::NAN],
            f_alpha: vec![1.0, 1.0],
            dq: vec![1.0, 1.0],
            alpha_r_squared: vec![1.0, 1.0],
            f_alpha_r_squared: vec![1.0, 1.0],
            dq_r_squared: vec![1.0, 1.0],
            log_scales: vec![0.0, -1.0],
        };
        assert_eq!(
            spectrum.summary(),
            Err(WindowError::DegenerateSpectrum { valid: 1 })
        );
    }

    #[test]
    fn test_single_order_is_degenerate() {
        let result = Multifractal::new().q_range(2, 2).evaluate(&W16);
        assert!(matches!(
            result,
            Err(WindowError::DegenerateSpectrum { valid: 1 })
        ));
    }

    #[test]
    fn test_raw_zero_mass_is_invalid() {
        let k = small().preprocessor(Preprocessor::Identity);
        assert!(matches!(
            k.evaluate(&[0.0_f64; 16]),
            Err(WindowError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_nan_in_segment_is_invalid() {
        let mut window: Vec<f64> = (0..32).map(|i| (f64::from(i) * 0.3).sin()).collect();
        window[10] = f64::NAN;
        assert!(matches!(
            Multifractal::new().evaluate(&window),
            Err(WindowError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_nan_before_segment_is_ignored() {
        let mut window = vec![f64::NAN; 4];
        window.extend_from_slice(&W16);
        assert_eq!(
            small().evaluate(&window).unwrap(),
            small().evaluate(&W16).unwrap()
        );
    }

    #[test]
    fn test_chhabra_jensen_rejects_bad_scales() {
        let seg = [0.5_f64; 8];
        assert!(chhabra_jensen(&seg, &[1, 2], &[1]).is_err());
        assert!(chhabra_jensen(&seg, &[1, 2], &[0, 1]).is_err());
        assert!(chhabra_jensen(&seg, &[1, 2], &[1, 4]).is_err());
    }

    #[test]
    fn test_validation() {
        let k = Multifractal::new();
        assert!(IndicatorKernel::<f64>::validate(&k, 4).is_ok());
        assert!(IndicatorKernel::<f64>::validate(&k, 3).is_err());
        assert!(IndicatorKernel::<f64>::validate(&small(), 7).is_err());
        assert!(IndicatorKernel::<f64>::validate(&small(), 8).is_ok());
        assert!(IndicatorKernel::<f64>::validate(&k.q_range(3, 1), 16).is_err());
        assert!(IndicatorKernel::<f64>::validate(&k.scale_range(2, 2), 16).is_err());
        assert!(IndicatorKernel::<f64>::validate(&k.scale_range(0, 2), 16).is_err());
    }

    #[test]
    fn test_series() {
        let data: Vec<f64> = (0..80).map(|i| f64::from((i * 13) % 17) + 1.0).collect();
        let out = multifractal(&data, 32).unwrap();
        assert_eq!(out.warm_up_count(), multifractal_lookback(32));
        assert_eq!(out.defined_count(), 49);
        assert!(out.values().all(|(_, s)| s.width >= 0.0 && s.height >= 0.0));

        let width = multifractal_width(&data, 32).unwrap();
        let height = multifractal_height(&data, 32).unwrap();
        assert_eq!(width.value(40), out.value(40).map(|s| &s.width));
        assert_eq!(height.value(40), out.value(40).map(|s| &s.height));
    }
}
