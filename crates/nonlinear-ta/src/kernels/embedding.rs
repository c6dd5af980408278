//! Time-delay embedding of a scalar window.
//!
//! A window `x` of length `L` with dimension `m` and delay `tau` becomes the
//! trajectory of `L - (m-1)*tau` points
//! `v_i = (x[i], x[i+tau], ..., x[i+(m-1)*tau])`.
//! Points are read straight from the borrowed window; nothing is copied.

use crate::error::{WindowError, WindowResult};
use crate::traits::SeriesElement;

/// Number of embedded points, or `None` when the window is too short.
#[inline]
#[must_use]
pub fn embedded_len(window_len: usize, dimension: usize, delay: usize) -> Option<usize> {
    let span = dimension.checked_sub(1)?.checked_mul(delay)?;
    window_len.checked_sub(span).filter(|&n| n > 0)
}

/// A delay-embedded view of a window.
#[derive(Debug, Clone, Copy)]
pub struct DelayEmbedding<'a, T> {
    data: &'a [T],
    dimension: usize,
    delay: usize,
    len: usize,
}

impl<'a, T: SeriesElement> DelayEmbedding<'a, T> {
    /// Embeds `data`.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::InsufficientData` if no point fits in the window
    /// or `dimension` is zero.
    pub fn new(data: &'a [T], dimension: usize, delay: usize) -> WindowResult<Self> {
        let len = embedded_len(data.len(), dimension, delay).ok_or(
            WindowError::InsufficientData {
                reason: "window too short for the embedding",
            },
        )?;
        Ok(Self {
            data,
            dimension,
            delay,
            len,
        })
    }

    /// Number of embedded points.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false for a constructed embedding.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Embedding dimension.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinates of point `i`.
    pub fn point(&self, i: usize) -> impl Iterator<Item = T> + '_ {
        (0..self.dimension).map(move |k| self.data[i + k * self.delay])
    }

    /// Euclidean distance between points `i` and `j`.
    #[must_use]
    pub fn distance(&self, i: usize, j: usize) -> T {
        self.point(i)
            .zip(self.point(j))
            .fold(T::zero(), |acc, (a, b)| acc + (a - b) * (a - b))
            .sqrt()
    }
}
