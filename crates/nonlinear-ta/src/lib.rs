//! nonlinear-ta: sliding-window nonlinear time-series indicators
//!
//! This crate computes chaos, complexity, information-theoretic, multifractal
//! and recurrence measures over every window of a numeric series, with the
//! output aligned to the input.
//!
//! # Features
//!
//! - **Aligned output**: one slot per input sample; warm-up, undefined and
//!   cancelled positions stay distinguishable
//! - **Local failures**: a window that cannot produce a value is recorded
//!   with its reason, the rest of the series is still computed
//! - **Generics**: works with both `f32` and `f64`
//! - **Parallel**: windows are independent and dispatched with rayon
//!   (`parallel` feature, on by default)
//!
//! # Quick Start
//!
//! ```
//! use nonlinear_ta::prelude::*;
//!
//! let data: Vec<f64> = (0..64).map(|t| f64::from(t % 9) + 1.0).collect();
//! let out = shannon_entropy(&data, 16).unwrap();
//!
//! // First 15 positions are warm-up
//! assert_eq!(out.lookback(), 15);
//! assert!(out.value(14).is_none());
//! assert!(out.value(15).is_some());
//! ```
//!
//! # Available Indicators
//!
//! - [`indicators::lyapunov()`]: largest Lyapunov exponent
//! - [`indicators::lempel_ziv()`]: Lempel-Ziv complexity
//! - [`indicators::shannon_entropy()`]: Shannon entropy
//! - [`indicators::approximate_entropy()`]: approximate entropy
//! - [`indicators::mutual_information()`]: delayed mutual information
//! - [`indicators::multifractal()`]: multifractal spectrum width and height
//! - [`indicators::recurrence_quantification()`]: recurrence rate,
//!   determinism and laminarity
//!
//! # Error Handling
//!
//! Configuration problems abort the whole computation:
//!
//! ```
//! use nonlinear_ta::indicators::lempel_ziv;
//!
//! // Window longer than the series
//! assert!(lempel_ziv(&[1.0_f64, 2.0], 10).is_err());
//!
//! // Empty data
//! let empty: Vec<f64> = vec![];
//! assert!(lempel_ziv(&empty, 5).is_err());
//! ```
//!
//! Per-window problems are recorded as [`WindowError`]s inside the output.

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]

pub mod batch;
pub mod builder;
pub mod error;
pub mod indicators;
pub mod kernels;
pub mod output;
pub mod prelude;
pub mod preprocess;
pub mod traits;
pub mod utils;
pub mod window;

// Re-export commonly used types at crate root
pub use builder::{CancellationToken, IndicatorSeriesBuilder, ProgressEvent, ProgressObserver};
pub use error::{Error, Result, WindowError, WindowResult};
pub use output::{AlignedOutput, Slot};
pub use traits::{IndicatorKernel, SeriesElement};
pub use utils::{approx_eq, approx_eq_relative, EPSILON, LOOSE_EPSILON};
pub use window::{Window, WindowSource};
