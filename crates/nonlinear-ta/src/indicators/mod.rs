//! Sliding-window nonlinear indicators.
//!
//! Every indicator is an [`IndicatorKernel`](crate::traits::IndicatorKernel)
//! evaluated independently on each window of `L` consecutive samples. The
//! series functions below run a kernel through
//! [`IndicatorSeriesBuilder`](crate::builder::IndicatorSeriesBuilder) with
//! default parameters; use the config types for anything else.
//!
//! # Indicator Families
//!
//! ## Chaos
//!
//! - [`lyapunov`] - Largest Lyapunov exponent from nearest-pair divergence
//!
//! ## Complexity and Information
//!
//! - [`lempel_ziv`] - LZ76 complexity of the mean-binarized window
//! - [`shannon_entropy`] - Shannon entropy of the normalized window
//! - [`approximate_entropy`] - Approximate entropy (ApEn)
//! - [`mutual_information`] - Delayed mutual information, or the delay of
//!   its first local minimum
//!
//! ## Multifractal
//!
//! - [`multifractal`] - Chhabra-Jensen spectrum width and height
//!
//! ## Recurrence
//!
//! - [`recurrence_quantification`] - RR, DET and LAM from one plot
//! - [`recurrence_rate`], [`determinism`], [`laminarity`]
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::indicators::{lempel_ziv, shannon_entropy};
//!
//! let data: Vec<f64> = (1..=40).map(|i| f64::from(i % 7) + 1.0).collect();
//!
//! let lz = lempel_ziv(&data, 16).unwrap();
//! let h = shannon_entropy(&data, 16).unwrap();
//!
//! assert_eq!(lz.warm_up_count(), 15);
//! assert_eq!(h.defined_count(), 25);
//! ```
//!
//! # Alignment
//!
//! Output index `i` holds the value of the window ending at sample `i`. The
//! first `L - 1` positions are warm-up. Windows that cannot produce a value
//! are marked undefined with a reason instead of failing the series.

pub mod entropy;
pub mod lempel_ziv;
pub mod lyapunov;
pub mod multifractal;
pub mod mutual_info;
pub mod rqa;

// Re-export indicator functions for convenient access.
pub use entropy::{approximate_entropy, shannon_entropy};
pub use lempel_ziv::lempel_ziv;
pub use lyapunov::lyapunov;
pub use multifractal::{multifractal, multifractal_height, multifractal_width};
pub use mutual_info::mutual_information;
pub use rqa::{determinism, laminarity, recurrence_quantification, recurrence_rate};

// Configuration and kernel types.
pub use entropy::{ApproximateEntropy, ShannonEntropy};
pub use lempel_ziv::LempelZiv;
pub use lyapunov::{DiameterSearch, Lyapunov};
pub use multifractal::Multifractal;
pub use mutual_info::{MutualInfoMode, MutualInformation};
pub use rqa::{
    Determinism, Laminarity, RecurrenceParams, RecurrenceQuantification, RecurrenceRate,
};

// Per-window outputs.
pub use lyapunov::LyapunovEstimate;
pub use multifractal::{MultifractalSpectrum, SpectrumSummary};
pub use rqa::{RecurrencePlot, RqaMetrics};

// Lookback functions.
pub use entropy::entropy_lookback;
pub use lempel_ziv::lempel_ziv_lookback;
pub use lyapunov::lyapunov_lookback;
pub use multifractal::multifractal_lookback;
pub use mutual_info::mutual_information_lookback;
pub use rqa::rqa_lookback;
