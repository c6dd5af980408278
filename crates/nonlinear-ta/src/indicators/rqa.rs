//! Recurrence quantification analysis (RQA).
//!
//! Each window is delay-embedded (dimension `m`, delay `tau`), and two
//! embedded points `i`, `j` recur when their Euclidean distance is at most
//! `radius`. Cells with `|i - j| < theiler_window` are excluded, which with the
//! default of 1 removes the main diagonal.
//!
//! From the resulting [`RecurrencePlot`]:
//!
//! - **Recurrence rate** (RR): recurrent cells over `n_v²`
//! - **Determinism** (DET): share of recurrent cells on diagonal lines of at
//!   least `min_diagonal` cells
//! - **Laminarity** (LAM): share of recurrent cells on vertical lines of at
//!   least `min_vertical` cells
//!
//! DET and LAM are undefined for a plot without recurrent cells.
//!
//! [`RecurrenceQuantification`] builds the plot once and returns all three;
//! [`RecurrenceRate`], [`Determinism`] and [`Laminarity`] are single-metric
//! kernels over the same parameters.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::indicators::rqa::{RecurrenceParams, RecurrencePlot};
//!
//! let window: Vec<f64> = (0..30).map(|t| (0.5 * f64::from(t)).sin()).collect();
//! let plot = RecurrencePlot::build(&window, &RecurrenceParams::new()).unwrap();
//!
//! assert_eq!(plot.size(), 28);
//! assert_eq!(plot.recurrent_points(), 156);
//! let rr: f64 = plot.recurrence_rate().unwrap();
//! assert!((rr - 156.0 / 784.0).abs() < 1e-12);
//! ```

use crate::error::{Error, Result, WindowError, WindowResult};
use crate::kernels::embedding::{embedded_len, DelayEmbedding};
use crate::output::AlignedOutput;
use crate::traits::{validate_positive, validate_window_len, IndicatorKernel, SeriesElement};

/// Returns the warm-up length of an RQA series.
#[inline]
#[must_use]
pub const fn rqa_lookback(window_len: usize) -> usize {
    window_len.saturating_sub(1)
}

/// Embedding and recurrence parameters shared by the RQA kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RecurrenceParams {
    embedding_dimension: usize,
    time_delay: usize,
    radius: f64,
    theiler_window: usize,
    min_diagonal: usize,
    min_vertical: usize,
}

impl Default for RecurrenceParams {
    /// `m = 2`, `tau = 2`, radius 0.65, Theiler window 1, minimum lines 2.
    fn default() -> Self {
        Self {
            embedding_dimension: 2,
            time_delay: 2,
            radius: 0.65,
            theiler_window: 1,
            min_diagonal: 2,
            min_vertical: 2,
        }
    }
}

impl RecurrenceParams {
    /// Creates the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the embedding dimension `m`.
    ///
    /// Default: 2
    #[must_use]
    pub const fn embedding_dimension(mut self, m: usize) -> Self {
        self.embedding_dimension = m;
        self
    }

    /// Sets the embedding delay `tau`.
    ///
    /// Default: 2
    #[must_use]
    pub const fn time_delay(mut self, tau: usize) -> Self {
        self.time_delay = tau;
        self
    }

    /// Sets the neighborhood radius.
    ///
    /// Default: 0.65
    #[must_use]
    pub const fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the Theiler window; 0 keeps the main diagonal.
    ///
    /// Default: 1
    #[must_use]
    pub const fn theiler_window(mut self, w: usize) -> Self {
        self.theiler_window = w;
        self
    }

    /// Sets the minimum diagonal line length for determinism.
    ///
    /// Default: 2
    #[must_use]
    pub const fn min_diagonal(mut self, l: usize) -> Self {
        self.min_diagonal = l;
        self
    }

    /// Sets the minimum vertical line length for laminarity.
    ///
    /// Default: 2
    #[must_use]
    pub const fn min_vertical(mut self, v: usize) -> Self {
        self.min_vertical = v;
        self
    }

    /// Returns `m`.
    #[must_use]
    pub const fn get_embedding_dimension(&self) -> usize {
        self.embedding_dimension
    }

    /// Returns `tau`.
    #[must_use]
    pub const fn get_time_delay(&self) -> usize {
        self.time_delay
    }

    /// Returns the radius.
    #[must_use]
    pub const fn get_radius(&self) -> f64 {
        self.radius
    }

    /// Returns the Theiler window.
    #[must_use]
    pub const fn get_theiler_window(&self) -> usize {
        self.theiler_window
    }

    /// Returns the minimum diagonal line length.
    #[must_use]
    pub const fn get_min_diagonal(&self) -> usize {
        self.min_diagonal
    }

    /// Returns the minimum vertical line length.
    #[must_use]
    pub const fn get_min_vertical(&self) -> usize {
        self.min_vertical
    }

    /// Shortest window holding at least one embedded point: `(m-1)*tau + 1`.
    #[must_use]
    pub fn min_window_len(&self) -> usize {
        self.embedding_dimension
            .saturating_sub(1)
            .saturating_mul(self.time_delay)
            .saturating_add(1)
    }

    /// Validates the parameters against a window length.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a zero dimension, delay or
    /// minimum line length, a radius that is not positive and finite, or a
    /// window with no embedded point.
    pub fn validate(&self, indicator: &'static str, window_len: usize) -> Result<()> {
        for (name, value) in [
            ("embedding_dimension", self.embedding_dimension),
            ("time_delay", self.time_delay),
            ("min_diagonal", self.min_diagonal),
            ("min_vertical", self.min_vertical),
        ] {
            if value == 0 {
                return Err(Error::invalid_parameter(indicator, name, "must be at least 1"));
            }
        }
        validate_positive(indicator, "radius", self.radius)?;
        validate_window_len(indicator, window_len, self.min_window_len())
    }
}

/// Thresholded recurrence matrix of one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrencePlot {
    size: usize,
    cells: Vec<bool>,
    recurrent_points: usize,
}

impl RecurrencePlot {
    /// Embeds `window` and thresholds all pairwise distances.
    ///
    /// # Errors
    ///
    /// - `WindowError::InsufficientData` if the window has no embedded point
    /// - `WindowError::NonFinite` if the radius is not representable in `T`
    pub fn build<T: SeriesElement>(window: &[T], params: &RecurrenceParams) -> WindowResult<Self> {
        let embedding = DelayEmbedding::new(window, params.embedding_dimension, params.time_delay)?;
        let radius = T::constant(params.radius)?;
        let size = embedding.len();
        let mut cells = vec![false; size * size];
        let mut recurrent_points = 0;

        for i in 0..size {
            // Distance is symmetric; fill both halves from the upper triangle
            for j in i..size {
                if j - i < params.theiler_window {
                    continue;
                }
                if embedding.distance(i, j) <= radius {
                    cells[i * size + j] = true;
                    cells[j * size + i] = true;
                    recurrent_points += if i == j { 1 } else { 2 };
                }
            }
        }

        Ok(Self {
            size,
            cells,
            recurrent_points,
        })
    }

    /// Number of embedded points `n_v`; the plot is `n_v × n_v`.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether points `i` and `j` recur.
    #[inline]
    #[must_use]
    pub fn is_recurrent(&self, i: usize, j: usize) -> bool {
        i < self.size && j < self.size && self.cells[i * self.size + j]
    }

    /// Number of recurrent cells.
    #[inline]
    #[must_use]
    pub const fn recurrent_points(&self) -> usize {
        self.recurrent_points
    }

    /// Cells on diagonal lines of at least `min_len`.
    #[must_use]
    pub fn diagonal_line_points(&self, min_len: usize) -> usize {
        let n = self.size;
        let mut total = 0;
        for i0 in 0..n {
            // Diagonal starting at (i0, 0), and for i0 > 0 its mirror at (0, i0)
            total += line_points((0..n - i0).map(|k| self.cells[(i0 + k) * n + k]), min_len);
            if i0 > 0 {
                total += line_points((0..n - i0).map(|k| self.cells[k * n + i0 + k]), min_len);
            }
        }
        total
    }

    /// Cells on vertical lines of at least `min_len`.
    #[must_use]
    pub fn vertical_line_points(&self, min_len: usize) -> usize {
        let n = self.size;
        (0..n)
            .map(|j| line_points((0..n).map(|i| self.cells[i * n + j]), min_len))
            .sum()
    }

    /// Recurrence rate.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::NonFinite` if the counts are not representable.
    pub fn recurrence_rate<T: SeriesElement>(&self) -> WindowResult<T> {
        let cells = T::count(self.size)? * T::count(self.size)?;
        Ok(T::count(self.recurrent_points)? / cells)
    }

    /// Determinism.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::InsufficientData` if there are no recurrent cells.
    pub fn determinism<T: SeriesElement>(&self, min_diagonal: usize) -> WindowResult<T> {
        self.share(self.diagonal_line_points(min_diagonal))
    }

    /// Laminarity.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::InsufficientData` if there are no recurrent cells.
    pub fn laminarity<T: SeriesElement>(&self, min_vertical: usize) -> WindowResult<T> {
        self.share(self.vertical_line_points(min_vertical))
    }

    fn share<T: SeriesElement>(&self, points: usize) -> WindowResult<T> {
        if self.recurrent_points == 0 {
            return Err(WindowError::InsufficientData {
                reason: "no recurrent points",
            });
        }
        Ok(T::count(points)? / T::count(self.recurrent_points)?)
    }
}

/// Sum of the lengths of runs of `true` that are at least `min_len` long.
fn line_points(cells: impl Iterator<Item = bool>, min_len: usize) -> usize {
    let mut total = 0;
    let mut run = 0;
    for recurrent in cells {
        if recurrent {
            run += 1;
        } else {
            if run >= min_len {
                total += run;
            }
            run = 0;
        }
    }
    if run >= min_len {
        total += run;
    }
    total
}

/// All three RQA metrics of one window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RqaMetrics<T> {
    /// Recurrence rate.
    pub recurrence_rate: T,
    /// Determinism; `None` without recurrent cells.
    pub determinism: Option<T>,
    /// Laminarity; `None` without recurrent cells.
    pub laminarity: Option<T>,
    /// Number of recurrent cells.
    pub recurrent_points: usize,
    /// Number of embedded points.
    pub embedded_points: usize,
}

/// Computes every RQA metric of one window from a single recurrence plot.
///
/// # Errors
///
/// See [`RecurrencePlot::build`].
pub fn rqa_metrics<T: SeriesElement>(window: &[T], params: &RecurrenceParams) -> WindowResult<RqaMetrics<T>> {
    let plot = RecurrencePlot::build(window, params)?;
    Ok(RqaMetrics {
        recurrence_rate: plot.recurrence_rate()?,
        determinism: plot.determinism(params.min_diagonal).ok(),
        laminarity: plot.laminarity(params.min_vertical).ok(),
        recurrent_points: plot.recurrent_points(),
        embedded_points: plot.size(),
    })
}

macro_rules! rqa_kernel {
    ($(#[$doc:meta])* $kernel:ident, $name:literal, |$plot:ident, $params:ident| $eval:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $kernel(pub RecurrenceParams);

        impl $kernel {
            /// Creates the kernel with default parameters.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Creates the kernel with the given parameters.
            #[must_use]
            pub const fn with_params(params: RecurrenceParams) -> Self {
                Self(params)
            }

            /// Returns the parameters.
            #[must_use]
            pub const fn params(&self) -> &RecurrenceParams {
                &self.0
            }
        }

        impl<T: SeriesElement> IndicatorKernel<T> for $kernel {
            type Output = T;

            fn name(&self) -> &'static str {
                $name
            }

            fn min_window_len(&self) -> usize {
                self.0.min_window_len()
            }

            fn validate(&self, window_len: usize) -> Result<()> {
                self.0.validate($name, window_len)
            }

            fn evaluate(&self, window: &[T]) -> WindowResult<T> {
                let $params = &self.0;
                let $plot = RecurrencePlot::build(window, $params)?;
                $eval
            }
        }
    };
}

rqa_kernel!(
    /// Recurrence rate kernel.
    RecurrenceRate,
    "recurrence_rate",
    |plot, _params| plot.recurrence_rate()
);

rqa_kernel!(
    /// Determinism kernel.
    Determinism,
    "determinism",
    |plot, params| plot.determinism(params.min_diagonal)
);

rqa_kernel!(
    /// Laminarity kernel.
    Laminarity,
    "laminarity",
    |plot, params| plot.laminarity(params.min_vertical)
);

/// Kernel returning all RQA metrics from one plot per window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RecurrenceQuantification(pub RecurrenceParams);

impl RecurrenceQuantification {
    /// Creates the kernel with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the kernel with the given parameters.
    #[must_use]
    pub const fn with_params(params: RecurrenceParams) -> Self {
        Self(params)
    }

    /// Returns the parameters.
    #[must_use]
    pub const fn params(&self) -> &RecurrenceParams {
        &self.0
    }
}

impl<T: SeriesElement> IndicatorKernel<T> for RecurrenceQuantification {
    type Output = RqaMetrics<T>;

    fn name(&self) -> &'static str {
        "rqa"
    }

    fn min_window_len(&self) -> usize {
        self.0.min_window_len()
    }

    fn validate(&self, window_len: usize) -> Result<()> {
        self.0.validate("rqa", window_len)
    }

    fn evaluate(&self, window: &[T]) -> WindowResult<RqaMetrics<T>> {
        rqa_metrics(window, &self.0)
    }
}

/// All RQA metrics over every window of `data`, with default parameters.
///
/// # Errors
///
/// - `Error::EmptyInput` if `data` is empty
/// - `Error::InvalidParameter` if `window_len < 3` or `window_len > data.len()`
pub fn recurrence_quantification<T: SeriesElement>(
    data: &[T],
    window_len: usize,
) -> Result<AlignedOutput<RqaMetrics<T>>> {
    crate::builder::IndicatorSeriesBuilder::new(RecurrenceQuantification::new(), window_len).build(data)
}

/// Recurrence rate over every window of `data`, with default parameters.
///
/// # Errors
///
/// See [`recurrence_quantification`].
pub fn recurrence_rate<T: SeriesElement>(data: &[T], window_len: usize) -> Result<AlignedOutput<T>> {
    crate::builder::IndicatorSeriesBuilder::new(RecurrenceRate::new(), window_len).build(data)
}

/// Determinism over every window of `data`, with default parameters.
///
/// # Errors
///
/// See [`recurrence_quantification`].
pub fn determinism<T: SeriesElement>(data: &[T], window_len: usize) -> Result<AlignedOutput<T>> {
    crate::builder::IndicatorSeriesBuilder::new(Determinism::new(), window_len).build(data)
}

/// Laminarity over every window of `data`, with default parameters.
///
/// # Errors
///
/// See [`recurrence_quantification`].
pub fn laminarity<T: SeriesElement>(data: &[T], window_len: usize) -> Result<AlignedOutput<T>> {
    crate::builder::IndicatorSeriesBuilder::new(Laminarity::new(), window_len).build(data)
}

/// Number of embedded points for a window length, if any.
#[must_use]
pub fn embedded_points(window_len: usize, params: &RecurrenceParams) -> Option<usize> {
    embedded_len(window_len, params.embedding_dimension, params.time_delay)
}
