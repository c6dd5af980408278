//! Sliding windows over a series.
//!
//! A [`WindowSource`] describes every window of length `L` over a series of
//! length `N`: one window per end index `t = L-1 ..= N-1`, each holding the
//! last `L` samples ending at `t`. Iteration is lazy and borrows the series;
//! each call to [`WindowSource::iter`] starts a fresh cursor.
//!
//! # Example
//!
//! ```
//! use nonlinear_ta::window::WindowSource;
//!
//! let data = [1.0_f64, 2.0, 3.0, 4.0];
//! let source = WindowSource::new(&data, 3).unwrap();
//!
//! let ends: Vec<usize> = source.iter().map(|w| w.end).collect();
//! assert_eq!(ends, vec![2, 3]);
//! assert_eq!(source.window(1).unwrap().values, &[2.0, 3.0, 4.0]);
//! ```

use std::iter::FusedIterator;

use crate::error::{Error, Result};

/// One window of a series: the samples `[start, end]`, both inclusive.
#[derive(Debug, PartialEq)]
pub struct Window<'a, T> {
    /// Index of the first sample in the window.
    pub start: usize,
    /// Index of the last sample; the output slot the result aligns to.
    pub end: usize,
    /// The window's samples, borrowed from the series.
    pub values: &'a [T],
}

impl<T> Clone for Window<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Window<'_, T> {}

/// All windows of a fixed length over a borrowed series.
#[derive(Debug)]
pub struct WindowSource<'a, T> {
    data: &'a [T],
    window_len: usize,
}

impl<T> Clone for WindowSource<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WindowSource<'_, T> {}

impl<'a, T> WindowSource<'a, T> {
    /// Creates a window source.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyInput` if `data` is empty
    /// - `Error::InvalidParameter` if `window_len` is zero or exceeds `data.len()`
    pub fn new(data: &'a [T], window_len: usize) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if window_len == 0 {
            return Err(Error::invalid_parameter(
                "window",
                "window_len",
                "window length must be at least 1",
            ));
        }
        if window_len > data.len() {
            return Err(Error::invalid_parameter(
                "window",
                "window_len",
                format!(
                    "window length {window_len} exceeds series length {}",
                    data.len()
                ),
            ));
        }
        Ok(Self { data, window_len })
    }

    /// Window length `L`.
    #[inline]
    #[must_use]
    pub const fn window_len(&self) -> usize {
        self.window_len
    }

    /// Length of the underlying series `N`.
    #[inline]
    #[must_use]
    pub const fn series_len(&self) -> usize {
        self.data.len()
    }

    /// Number of leading positions without a window (`L - 1`).
    #[inline]
    #[must_use]
    pub const fn lookback(&self) -> usize {
        self.window_len - 1
    }

    /// Number of windows (`N - L + 1`).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len() - self.window_len + 1
    }

    /// Always false: a valid source has at least one window.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the `index`-th window (in increasing end-index order).
    #[must_use]
    pub fn window(&self, index: usize) -> Option<Window<'a, T>> {
        if index >= self.len() {
            return None;
        }
        let start = index;
        let end = index + self.window_len - 1;
        Some(Window {
            start,
            end,
            values: &self.data[start..=end],
        })
    }

    /// Returns a fresh cursor over all windows.
    #[must_use]
    pub fn iter(&self) -> Windows<'a, T> {
        Windows {
            source: *self,
            next: 0,
        }
    }
}

impl<'a, T> IntoIterator for &WindowSource<'a, T> {
    type Item = Window<'a, T>;
    type IntoIter = Windows<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Cursor over the windows of a [`WindowSource`].
#[derive(Debug)]
pub struct Windows<'a, T> {
    source: WindowSource<'a, T>,
    next: usize,
}

impl<'a, T> Iterator for Windows<'a, T> {
    type Item = Window<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.source.window(self.next)?;
        self.next += 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Windows<'_, T> {}

impl<T> FusedIterator for Windows<'_, T> {}
