//! Shared test utilities for nonlinear-ta tests.

use nonlinear_ta::{AlignedOutput, Slot};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Approximate equality; two NaN values compare equal.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < eps
}

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for comparisons involving accumulated floating-point operations.
#[allow(dead_code)]
pub const LOOSE_EPSILON: f64 = 1e-6;

/// `x_t = (t mod 7) + 0.3 (t mod 3)`, a deterministic non-trivial series.
#[allow(dead_code)]
pub fn sawtooth(len: usize) -> Vec<f64> {
    (0..len)
        .map(|t| (t % 7) as f64 + 0.3 * (t % 3) as f64)
        .collect()
}

/// `sin(omega * t)` for `t` in `0..len`.
#[allow(dead_code)]
pub fn sine(len: usize, omega: f64) -> Vec<f64> {
    (0..len).map(|t| (omega * t as f64).sin()).collect()
}

/// Seeded multiplicative random walk starting at 100 with returns in ±2%.
/// Strictly positive, so every indicator accepts it.
#[allow(dead_code)]
pub fn random_walk(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut price = 100.0;
    (0..len)
        .map(|_| {
            price *= 1.0 + rng.gen_range(-0.02..0.02);
            price
        })
        .collect()
}

/// Checks that exactly the first `lookback` slots are warm-up.
#[allow(dead_code)]
pub fn verify_warm_up_prefix<R>(out: &AlignedOutput<R>, lookback: usize) -> bool {
    out.iter()
        .enumerate()
        .all(|(i, slot)| matches!(slot, Slot::WarmUp) == (i < lookback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_nan() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
        assert!(approx_eq(1.0, 1.0 + 1e-12, EPSILON));
    }

    #[test]
    fn test_sawtooth() {
        let expected = [0.0, 1.3, 2.6, 3.0];
        assert!(sawtooth(4).iter().zip(expected).all(|(&a, b)| approx_eq(a, b, EPSILON)));
    }

    #[test]
    fn test_random_walk_is_positive_and_deterministic() {
        let a = random_walk(200, 7);
        assert!(a.iter().all(|&x| x > 0.0));
        assert_eq!(a, random_walk(200, 7));
        assert_ne!(a, random_walk(200, 8));
    }
}
