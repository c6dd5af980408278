//! Index-aligned indicator output.
//!
//! An [`AlignedOutput`] has exactly one [`Slot`] per input position. The
//! states never collapse into one placeholder:
//!
//! | Slot | Meaning |
//! |------|---------|
//! | `WarmUp` | position precedes the first full window (`t < L-1`) |
//! | `Cancelled` | window was never evaluated because the run was cancelled |
//! | `Undefined(e)` | window was evaluated but has no defined value |
//! | `Value(v)` | window was evaluated successfully |
//!
//! Callers that want a plain numeric column can use
//! [`AlignedOutput::to_series`], where NaN is the single "no value" marker.

use crate::error::{WindowError, WindowResult};
use crate::traits::SeriesElement;

/// State of one output position.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<R> {
    /// Not yet computed: the position lies in the warm-up prefix.
    WarmUp,
    /// The window was skipped after cancellation.
    Cancelled,
    /// Computed but undefined: the kernel reported a numerical failure.
    Undefined(WindowError),
    /// Computed value.
    Value(R),
}

impl<R> Slot<R> {
    /// Returns the value if this slot holds one.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Option<&R> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the failure if this slot is undefined.
    #[inline]
    #[must_use]
    pub const fn failure(&self) -> Option<&WindowError> {
        match self {
            Self::Undefined(e) => Some(e),
            _ => None,
        }
    }

    /// True for warm-up slots.
    #[inline]
    #[must_use]
    pub const fn is_warm_up(&self) -> bool {
        matches!(self, Self::WarmUp)
    }

    /// True once a kernel ran for this position, whether it succeeded or not.
    #[inline]
    #[must_use]
    pub const fn is_evaluated(&self) -> bool {
        matches!(self, Self::Value(_) | Self::Undefined(_))
    }

    /// Maps the contained value.
    pub fn map<U, F: FnOnce(R) -> U>(self, f: F) -> Slot<U> {
        match self {
            Self::WarmUp => Slot::WarmUp,
            Self::Cancelled => Slot::Cancelled,
            Self::Undefined(e) => Slot::Undefined(e),
            Self::Value(v) => Slot::Value(f(v)),
        }
    }
}

impl<R> From<WindowResult<R>> for Slot<R> {
    fn from(result: WindowResult<R>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(e) => Self::Undefined(e),
        }
    }
}

/// Indicator results aligned to the input series.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedOutput<R> {
    indicator: &'static str,
    lookback: usize,
    slots: Vec<Slot<R>>,
}

impl<R> AlignedOutput<R> {
    /// Wraps already-aligned slots.
    ///
    /// `lookback` is the number of leading warm-up slots.
    #[must_use]
    pub fn from_slots(indicator: &'static str, lookback: usize, slots: Vec<Slot<R>>) -> Self {
        Self {
            indicator,
            lookback,
            slots,
        }
    }

    /// Name of the indicator that produced this output.
    #[inline]
    #[must_use]
    pub const fn indicator(&self) -> &'static str {
        self.indicator
    }

    /// Number of leading warm-up positions.
    #[inline]
    #[must_use]
    pub const fn lookback(&self) -> usize {
        self.lookback
    }

    /// Number of positions (equals the input series length).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if there are no positions.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots, in series order.
    #[inline]
    #[must_use]
    pub fn slots(&self) -> &[Slot<R>] {
        &self.slots
    }

    /// Consumes the output and returns its slots.
    #[must_use]
    pub fn into_slots(self) -> Vec<Slot<R>> {
        self.slots
    }

    /// Slot at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slot<R>> {
        self.slots.get(index)
    }

    /// Value at `index`, if that position holds one.
    #[inline]
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&R> {
        self.slots.get(index).and_then(Slot::value)
    }

    /// Iterator over the slots.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot<R>> {
        self.slots.iter()
    }

    /// Iterator over `(index, value)` for every defined position.
    pub fn values(&self) -> impl Iterator<Item = (usize, &R)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.value().map(|v| (i, v)))
    }

    /// Number of warm-up slots.
    #[must_use]
    pub fn warm_up_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_warm_up()).count()
    }

    /// Number of slots holding a value.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.slots.iter().filter(|s| s.value().is_some()).count()
    }

    /// Number of evaluated slots without a defined value.
    #[must_use]
    pub fn undefined_count(&self) -> usize {
        self.slots.iter().filter(|s| s.failure().is_some()).count()
    }

    /// Number of slots skipped by cancellation.
    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Cancelled))
            .count()
    }

    /// Maps every value, keeping the slot states.
    #[must_use]
    pub fn map<U, F: FnMut(R) -> U>(self, mut f: F) -> AlignedOutput<U> {
        AlignedOutput {
            indicator: self.indicator,
            lookback: self.lookback,
            slots: self.slots.into_iter().map(|s| s.map(&mut f)).collect(),
        }
    }

    /// Projects each value to a number, writing NaN for every other state.
    ///
    /// NaN is the single "no value" marker here: warm-up, cancellation and
    /// numerical failure all become NaN. Use [`slots`](Self::slots) to tell
    /// them apart.
    #[must_use]
    pub fn to_series<T: SeriesElement, F: Fn(&R) -> T>(&self, f: F) -> Vec<T> {
        self.slots
            .iter()
            .map(|slot| slot.value().map_or_else(T::nan, &f))
            .collect()
    }
}

impl<T: SeriesElement> AlignedOutput<T> {
    /// Plain NaN-marked series for scalar outputs.
    #[must_use]
    pub fn to_nan_series(&self) -> Vec<T> {
        self.to_series(|&v| v)
    }
}

impl<'a, R> IntoIterator for &'a AlignedOutput<R> {
    type Item = &'a Slot<R>;
    type IntoIter = std::slice::Iter<'a, Slot<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AlignedOutput<f64> {
        AlignedOutput::from_slots(
            "test",
            2,
            vec![
                Slot::WarmUp,
                Slot::WarmUp,
                Slot::Value(1.5),
                Slot::Undefined(WindowError::InsufficientData { reason: "test" }),
                Slot::Value(2.5),
                Slot::Cancelled,
            ],
        )
    }

    #[test]
    fn test_counts() {
        let out = sample();
        assert_eq!(out.len(), 6);
        assert_eq!(out.lookback(), 2);
        assert_eq!(out.warm_up_count(), 2);
        assert_eq!(out.defined_count(), 2);
        assert_eq!(out.undefined_count(), 1);
        assert_eq!(out.cancelled_count(), 1);
    }

    #[test]
    fn test_states_are_distinct() {
        let out = sample();
        assert!(out.get(0).unwrap().is_warm_up());
        assert!(!out.get(0).unwrap().is_evaluated());
        assert!(out.get(3).unwrap().is_evaluated());
        assert!(out.get(3).unwrap().failure().is_some());
        assert_ne!(out.get(0), out.get(3));
        assert_ne!(out.get(3), out.get(5));
    }

    #[test]
    fn test_value_access() {
        let out = sample();
        assert_eq!(out.value(2), Some(&1.5));
        assert_eq!(out.value(3), None);
        assert_eq!(out.value(99), None);

        let values: Vec<_> = out.values().collect();
        assert_eq!(values, vec![(2, &1.5), (4, &2.5)]);
    }

    #[test]
    fn test_to_nan_series() {
        let series = sample().to_nan_series();
        assert_eq!(series.len(), 6);
        assert!(series[0].is_nan());
        assert!((series[2] - 1.5).abs() < 1e-12);
        assert!(series[3].is_nan());
        assert!(series[5].is_nan());
    }

    #[test]
    fn test_map_keeps_states() {
        let mapped = sample().map(|v| v * 2.0);
        assert_eq!(mapped.value(4), Some(&5.0));
        assert!(mapped.get(1).unwrap().is_warm_up());
        assert!(mapped.get(3).unwrap().failure().is_some());
        assert_eq!(mapped.indicator(), "test");
    }

    #[test]
    fn test_slot_from_result() {
        let ok: Slot<f64> = Ok(1.0).into();
        assert_eq!(ok, Slot::Value(1.0));
        let err: Slot<f64> = Err(WindowError::NonFinite { quantity: "x" }).into();
        assert!(matches!(err, Slot::Undefined(WindowError::NonFinite { .. })));
    }
}
