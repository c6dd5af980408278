//! Numeric building blocks shared by several indicators.
//!
//! # Kernels
//!
//! - [`regression`]: least-squares line fit with R²
//! - [`embedding`]: time-delay embedding of a window
//! - [`histogram`]: binning and plug-in entropy / mutual information

pub mod embedding;
pub mod histogram;
pub mod regression;

pub use embedding::{embedded_len, DelayEmbedding};
pub use histogram::{
    discretize, mutual_information_pair, symbol_entropy, symbol_mutual_information, Binning,
    DEFAULT_BINS,
};
pub use regression::{linear_fit, LinearFit};
