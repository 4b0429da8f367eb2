//! Testing utilities, do not depend on any of these in production!

use fastrand::Rng;

use crate::util::float::{f64_make_finite, f64_make_nonzero};

/// Seeded stream of finite `f64` values in `[min, max)`.
pub struct RandStreamF64 {
    state: Rng,
    min: f64,
    max: f64,
}

impl RandStreamF64 {
    #[must_use]
    pub fn new(seed: u64, min: f64, max: f64) -> Self {
        assert!(min <= max, "minimum should be smaller or equal to maximum");
        Self {
            state: Rng::with_seed(seed),
            min,
            max,
        }
    }
}

impl Iterator for RandStreamF64 {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.state.f64().mul_add(self.max - self.min, self.min);
        Some(f64_make_finite(x))
    }
}

/// Seeded stream of random coefficient vectors with a guaranteed non-zero
/// leading coefficient.
pub struct RandCoeffStream {
    values: RandStreamF64,
    len: usize,
}

impl RandCoeffStream {
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[must_use]
    pub fn new(seed: u64, len: usize, min: f64, max: f64) -> Self {
        assert!(len > 0, "coefficient vectors cannot be empty");
        Self {
            values: RandStreamF64::new(seed, min, max),
            len,
        }
    }
}

impl Iterator for RandCoeffStream {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut coeffs: Vec<f64> = self.values.by_ref().take(self.len).collect();
        coeffs[0] = f64_make_nonzero(coeffs[0]);
        Some(coeffs)
    }
}

/// Naive power-sum evaluation, an independent oracle for Horner tests.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn eval_naive(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .enumerate()
        .map(|(power, c)| c * x.powi(power as i32))
        .sum()
}

#[cfg(test)]
mod test {
    use super::{eval_naive, RandCoeffStream, RandStreamF64};

    #[test]
    fn streams_are_reproducible() {
        let a: Vec<f64> = RandStreamF64::new(42, -1.0, 1.0).take(8).collect();
        let b: Vec<f64> = RandStreamF64::new(42, -1.0, 1.0).take(8).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|x| (-1.0..1.0).contains(x)));
    }

    #[test]
    fn leading_coefficient_is_never_zero() {
        for coeffs in RandCoeffStream::new(7, 4, -1.0, 1.0).take(32) {
            assert_ne!(coeffs[0], 0.0);
            assert_eq!(coeffs.len(), 4);
        }
    }

    #[test]
    fn naive_oracle_on_a_known_polynomial() {
        // 3x^3 + 2x^2 - 5x + 1 at 2 is 23
        assert!((eval_naive(&[3.0, 2.0, -5.0, 1.0], 2.0) - 23.0).abs() < 1e-12);
    }
}
