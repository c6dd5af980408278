//! Dispatch of window evaluations, sequential or on a Rayon pool.
//!
//! Every window is an independent unit of work. The output is preallocated
//! and index-addressed, so each task writes only its own slot and no locking
//! is needed. With the `parallel` feature the windows are scheduled by Rayon
//! in no particular order; without it they run in increasing end-index order.
//!
//! # Feature Flag
//!
//! Parallel dispatch requires the `parallel` feature (enabled by default):
//!
//! ```toml
//! [dependencies]
//! nonlinear-ta = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::batch::BatchProcessor;
//! use nonlinear_ta::indicators::entropy::shannon_entropy;
//!
//! let series = vec![
//!     vec![1.0_f64, 2.0, 3.0, 4.0, 5.0],
//!     vec![5.0, 4.0, 3.0, 2.0, 1.0],
//! ];
//!
//! let outputs = BatchProcessor::new()
//!     .process(&series, |s| shannon_entropy(s, 3))
//!     .unwrap();
//! assert_eq!(outputs.len(), 2);
//! ```

use crate::error::Result;
use crate::output::Slot;
use crate::traits::SeriesElement;
use crate::window::{Window, WindowSource};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scheduler for window evaluations and multi-series batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProcessor {
    /// Minimum number of work items before Rayon is used.
    /// Smaller batches are processed sequentially.
    min_parallel_threshold: usize,
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProcessor {
    /// Creates a processor that goes parallel from 64 work items.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_parallel_threshold: 64,
        }
    }

    /// Creates a processor that never uses the thread pool.
    #[must_use]
    pub const fn sequential() -> Self {
        Self {
            min_parallel_threshold: usize::MAX,
        }
    }

    /// Sets the minimum number of work items required to use parallel processing.
    #[must_use]
    pub const fn min_parallel_threshold(mut self, threshold: usize) -> Self {
        self.min_parallel_threshold = threshold;
        self
    }

    /// Returns the configured parallel threshold.
    #[must_use]
    pub const fn get_min_parallel_threshold(&self) -> usize {
        self.min_parallel_threshold
    }

    /// Evaluates every window of `source`, writing window `i` into `slots[i]`.
    ///
    /// `slots` must hold at least `source.len()` entries; extra entries are
    /// left untouched.
    #[cfg(feature = "parallel")]
    pub fn evaluate_windows<T, R, F>(&self, source: &WindowSource<'_, T>, slots: &mut [Slot<R>], eval: F)
    where
        T: SeriesElement,
        R: Send,
        F: Fn(Window<'_, T>) -> Slot<R> + Send + Sync,
    {
        let count = source.len().min(slots.len());
        let slots = &mut slots[..count];
        if count < self.min_parallel_threshold {
            for (slot, window) in slots.iter_mut().zip(source.iter()) {
                *slot = eval(window);
            }
        } else {
            slots.par_iter_mut().enumerate().for_each(|(i, slot)| {
                if let Some(window) = source.window(i) {
                    *slot = eval(window);
                }
            });
        }
    }

    /// Sequential version when the parallel feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn evaluate_windows<T, R, F>(&self, source: &WindowSource<'_, T>, slots: &mut [Slot<R>], eval: F)
    where
        T: SeriesElement,
        R: Send,
        F: Fn(Window<'_, T>) -> Slot<R> + Send + Sync,
    {
        for (slot, window) in slots.iter_mut().zip(source.iter()) {
            *slot = eval(window);
        }
    }

    /// Computes an indicator on many independent series.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error reported by `indicator_fn`.
    #[cfg(feature = "parallel")]
    pub fn process<T, F, R>(&self, series: &[Vec<T>], indicator_fn: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R> + Send + Sync,
        R: Send,
    {
        if series.len() < self.min_parallel_threshold {
            series.iter().map(|s| indicator_fn(s)).collect()
        } else {
            series
                .par_iter()
                .map(|s| indicator_fn(s))
                .collect::<Result<Vec<R>>>()
        }
    }

    /// Sequential version when the parallel feature is disabled.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error reported by `indicator_fn`.
    #[cfg(not(feature = "parallel"))]
    pub fn process<T, F, R>(&self, series: &[Vec<T>], indicator_fn: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R> + Send + Sync,
        R: Send,
    {
        series.iter().map(|s| indicator_fn(s)).collect()
    }

    /// Like [`process`](Self::process), for borrowed slices.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error reported by `indicator_fn`.
    #[cfg(feature = "parallel")]
    pub fn process_refs<T, F, R>(&self, series: &[&[T]], indicator_fn: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R> + Send + Sync,
        R: Send,
    {
        if series.len() < self.min_parallel_threshold {
            series.iter().map(|s| indicator_fn(s)).collect()
        } else {
            series
                .par_iter()
                .map(|s| indicator_fn(s))
                .collect::<Result<Vec<R>>>()
        }
    }

    /// Sequential version when the parallel feature is disabled.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error reported by `indicator_fn`.
    #[cfg(not(feature = "parallel"))]
    pub fn process_refs<T, F, R>(&self, series: &[&[T]], indicator_fn: F) -> Result<Vec<R>>
    where
        T: SeriesElement,
        F: Fn(&[T]) -> Result<R> + Send + Sync,
        R: Send,
    {
        series.iter().map(|s| indicator_fn(s)).collect()
    }
}

/// Shorthand for [`BatchProcessor::process`] with default settings.
///
/// # Errors
///
/// Returns the first configuration error reported by `indicator_fn`.
pub fn process_batch<T, F, R>(series: &[Vec<T>], indicator_fn: F) -> Result<Vec<R>>
where
    T: SeriesElement,
    F: Fn(&[T]) -> Result<R> + Send + Sync,
    R: Send,
{
    BatchProcessor::new().process(series, indicator_fn)
}
