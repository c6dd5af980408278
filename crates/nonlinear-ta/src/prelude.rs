//! Commonly used types and traits for convenient importing.
//!
//! # Usage
//!
//! ```
//! use nonlinear_ta::prelude::*;
//!
//! let data: Vec<f64> = (0..60).map(|t| (0.5 * f64::from(t)).sin()).collect();
//!
//! let lz = lempel_ziv(&data, 20).unwrap();
//! let rqa = recurrence_quantification(&data, 30).unwrap();
//! let apen = ApproximateEntropy::new().pattern_len(2).tolerance(0.2).compute(&data, 20).unwrap();
//! ```
//!
//! # Contents
//!
//! - Errors: [`Error`], [`WindowError`] and their result aliases
//! - Traits: [`SeriesElement`], [`IndicatorKernel`], [`ProgressObserver`]
//! - Series plumbing: [`WindowSource`], [`IndicatorSeriesBuilder`],
//!   [`AlignedOutput`], [`Slot`]
//! - Every indicator function, config type and `*_lookback()` function

// Error types
pub use crate::error::{Error, Result, WindowError, WindowResult};

// Traits
pub use crate::builder::ProgressObserver;
pub use crate::traits::{IndicatorKernel, SeriesElement};

// Series plumbing
pub use crate::batch::BatchProcessor;
pub use crate::builder::{
    CancellationToken, ChannelObserver, IndicatorSeriesBuilder, NoopObserver, ProgressEvent,
    TracingObserver,
};
pub use crate::output::{AlignedOutput, Slot};
pub use crate::preprocess::Preprocessor;
pub use crate::window::{Window, WindowSource};

// Indicator functions
pub use crate::indicators::{
    approximate_entropy, determinism, laminarity, lempel_ziv, lyapunov, multifractal,
    multifractal_height, multifractal_width, mutual_information, recurrence_quantification,
    recurrence_rate, shannon_entropy,
};

// Configuration and kernel types
pub use crate::indicators::{
    ApproximateEntropy, Determinism, DiameterSearch, Laminarity, LempelZiv, Lyapunov,
    Multifractal, MutualInfoMode, MutualInformation, RecurrenceParams, RecurrenceQuantification,
    RecurrenceRate, ShannonEntropy,
};
pub use crate::kernels::Binning;

// Per-window outputs
pub use crate::indicators::{LyapunovEstimate, MultifractalSpectrum, RqaMetrics, SpectrumSummary};

// Lookback functions
pub use crate::indicators::{
    entropy_lookback, lempel_ziv_lookback, lyapunov_lookback, multifractal_lookback,
    mutual_information_lookback, rqa_lookback,
};
