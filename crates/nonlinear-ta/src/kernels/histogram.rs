//! Discretization and plug-in information measures.
//!
//! Mutual information is estimated by binning each series into integer
//! symbols and plugging the empirical joint and marginal frequencies into
//! `I(X;Y) = Σ p(x,y) log2(p(x,y) / (p(x) p(y)))`. Frequencies live in
//! ordered maps so the summation order, and therefore the result, is the
//! same on every run.

use std::collections::BTreeMap;

use crate::error::{Error, Result, WindowError, WindowResult};
use crate::traits::SeriesElement;

/// Default number of equal-width bins.
pub const DEFAULT_BINS: usize = 8;

/// Rule mapping real values to integer symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Binning {
    /// `bins` equal-width bins spanning the series' own min and max.
    /// A constant series falls into a single bin.
    EqualWidth(usize),
    /// The floor of each value is its symbol.
    Integer,
}

impl Default for Binning {
    fn default() -> Self {
        Self::EqualWidth(DEFAULT_BINS)
    }
}

impl Binning {
    /// Checks the bin count.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for `EqualWidth(0)`.
    pub fn validate(self, indicator: &'static str) -> Result<()> {
        match self {
            Self::EqualWidth(0) => Err(Error::invalid_parameter(
                indicator,
                "bins",
                "at least one bin is required",
            )),
            _ => Ok(()),
        }
    }
}

/// Maps each value to a symbol.
///
/// # Errors
///
/// Returns `WindowError::InvalidInput` if any value is NaN or infinite.
pub fn discretize<T: SeriesElement>(data: &[T], binning: Binning) -> WindowResult<Vec<i64>> {
    if data.iter().any(|v| !v.is_finite()) {
        return Err(WindowError::InvalidInput {
            reason: "non-finite value cannot be binned",
        });
    }
    match binning {
        Binning::Integer => data
            .iter()
            .map(|v| {
                v.floor().to_i64().ok_or(WindowError::InvalidInput {
                    reason: "value outside the integer symbol range",
                })
            })
            .collect(),
        Binning::EqualWidth(bins) => {
            let lo = data.iter().fold(T::infinity(), |m, &x| m.min(x));
            let hi = data.iter().fold(T::neg_infinity(), |m, &x| m.max(x));
            if !(hi > lo) {
                return Ok(vec![0; data.len()]);
            }
            let width = hi - lo;
            let scale = T::count(bins)?;
            let last = i64::try_from(bins.saturating_sub(1)).unwrap_or(i64::MAX);
            Ok(data
                .iter()
                .map(|&x| {
                    ((x - lo) / width * scale)
                        .floor()
                        .to_i64()
                        .map_or(last, |b| b.clamp(0, last))
                })
                .collect())
        }
    }
}

fn frequencies<K: Ord + Copy>(symbols: impl Iterator<Item = K>) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for s in symbols {
        *counts.entry(s).or_insert(0) += 1;
    }
    counts
}

/// Shannon entropy of a symbol sequence, in bits.
///
/// # Errors
///
/// Returns `WindowError::InsufficientData` for an empty sequence.
pub fn symbol_entropy<T: SeriesElement>(symbols: &[i64]) -> WindowResult<T> {
    if symbols.is_empty() {
        return Err(WindowError::InsufficientData {
            reason: "no symbols",
        });
    }
    let n = T::count(symbols.len())?;
    let mut h = T::zero();
    for &c in frequencies(symbols.iter().copied()).values() {
        let p = T::count(c)? / n;
        h = h - p * p.log2();
    }
    Ok(h)
}

/// Plug-in mutual information of two aligned symbol sequences, in bits.
///
/// Tiny negative results from rounding are clamped to zero.
///
/// # Errors
///
/// Returns `WindowError::InsufficientData` if the sequences are empty or
/// differ in length.
pub fn symbol_mutual_information<T: SeriesElement>(a: &[i64], b: &[i64]) -> WindowResult<T> {
    if a.is_empty() || a.len() != b.len() {
        return Err(WindowError::InsufficientData {
            reason: "mutual information needs two non-empty aligned sequences",
        });
    }
    let n = T::count(a.len())?;
    let pa = frequencies(a.iter().copied());
    let pb = frequencies(b.iter().copied());
    let joint = frequencies(a.iter().copied().zip(b.iter().copied()));

    let mut info = T::zero();
    for (&(x, y), &c) in &joint {
        let pxy = T::count(c)? / n;
        let px = T::count(pa.get(&x).copied().unwrap_or(0))? / n;
        let py = T::count(pb.get(&y).copied().unwrap_or(0))? / n;
        info = info + pxy * (pxy / (px * py)).log2();
    }
    Ok(info.max(T::zero()))
}

/// Mutual information between two aligned real series, each binned on its own.
///
/// # Errors
///
/// See [`discretize`] and [`symbol_mutual_information`].
pub fn mutual_information_pair<T: SeriesElement>(
    a: &[T],
    b: &[T],
    binning: Binning,
) -> WindowResult<T> {
    let sa = discretize(a, binning)?;
    let sb = discretize(b, binning)?;
    symbol_mutual_information(&sa, &sb)
}
