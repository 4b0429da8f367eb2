//! Polynomial utilities: Horner evaluation, synthetic division, deflation.
//!
//! All functions are stateless and operate on plain coefficient slices given
//! highest degree first, so `[3.0, 2.0, -5.0, 1.0]` is `3x^3 + 2x^2 - 5x + 1`.

use num::complex::Complex64;

use crate::error::{Error, Result};

/// Default tolerance for deciding that a value is an exact enough root.
pub const DEFAULT_DEFLATION_TOLERANCE: f64 = 1e-10;

/// Evaluate the polynomial at `x` by nested multiplication.
///
/// Needs only `n` multiplications and `n` additions for degree `n`. An empty
/// coefficient slice evaluates to zero.
#[must_use]
pub fn horner(coeffs: &[f64], x: f64) -> f64 {
    let Some((first, rest)) = coeffs.split_first() else {
        return 0.0;
    };
    rest.iter().fold(*first, |acc, c| acc.mul_add(x, *c))
}

/// Complex counterpart of [`horner`], for evaluating a real-coefficient
/// polynomial off the real axis (e.g. as the Muller equation).
#[must_use]
pub fn horner_complex(coeffs: &[f64], z: Complex64) -> Complex64 {
    let Some((first, rest)) = coeffs.split_first() else {
        return Complex64::new(0.0, 0.0);
    };
    rest.iter().fold(Complex64::new(*first, 0.0), |acc, c| {
        acc * z + Complex64::new(*c, 0.0)
    })
}

/// Evaluate the polynomial and its derivative at `x` in a single pass.
///
/// The two-accumulator Horner variant: the derivative accumulator is updated
/// with the value accumulator before the value accumulator absorbs the next
/// coefficient.
#[must_use]
pub fn horner_with_derivative(coeffs: &[f64], x: f64) -> (f64, f64) {
    let Some((first, rest)) = coeffs.split_first() else {
        return (0.0, 0.0);
    };
    let mut p = *first;
    let mut dp: f64 = 0.0;
    for c in rest {
        dp = dp.mul_add(x, p);
        p = p.mul_add(x, *c);
    }
    (p, dp)
}

/// Quotient and remainder of division by `(x - root)`.
///
/// A single-coefficient input returns an empty quotient and that coefficient
/// as the remainder.
#[must_use]
pub fn synthetic_division(coeffs: &[f64], root: f64) -> (Vec<f64>, f64) {
    if coeffs.is_empty() {
        return (Vec::new(), 0.0);
    }
    if coeffs.len() == 1 {
        return (Vec::new(), coeffs[0]);
    }

    let mut quotient = Vec::with_capacity(coeffs.len() - 1);
    let mut carry = coeffs[0];
    for &c in &coeffs[1..] {
        quotient.push(carry);
        carry = carry.mul_add(root, c);
    }
    (quotient, carry)
}

/// Remove a known root from the polynomial, reducing its degree by one.
///
/// # Errors
///
/// - [`Error::NotARoot`] if `|p(root)| > tolerance`
/// - [`Error::RemainderTooLarge`] if the synthetic-division remainder
///   exceeds `tolerance`
pub fn deflate(coeffs: &[f64], root: f64, tolerance: f64) -> Result<Vec<f64>> {
    let value = horner(coeffs, root);
    if value.abs() > tolerance {
        return Err(Error::NotARoot { root, value });
    }

    let (quotient, remainder) = synthetic_division(coeffs, root);
    if remainder.abs() > tolerance {
        return Err(Error::RemainderTooLarge { remainder });
    }
    Ok(quotient)
}

/// Coefficients of the derivative polynomial, `[n*a_n, ..., 1*a_1]`.
///
/// Constant and empty polynomials differentiate to `[0.0]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn derivative_coefficients(coeffs: &[f64]) -> Vec<f64> {
    if coeffs.len() <= 1 {
        return vec![0.0];
    }
    let degree = coeffs.len() - 1;
    coeffs[..degree]
        .iter()
        .enumerate()
        .map(|(i, c)| (degree - i) as f64 * c)
        .collect()
}

/// Package a coefficient slice as an evaluator closure.
#[must_use]
pub fn polynomial_fn(coeffs: Vec<f64>) -> impl Fn(f64) -> f64 {
    move |x| horner(&coeffs, x)
}

/// Find several roots by repeatedly locating one root and deflating.
///
/// `root_finder` receives the current (shrinking) polynomial as a callable
/// and returns one root of it. The loop stops early when the finder or the
/// deflation fails, or once the quotient reaches degree zero; it is capped
/// at `max_roots` (defaulting to the original degree).
pub fn roots_by_deflation<R>(
    coeffs: &[f64],
    mut root_finder: R,
    max_roots: Option<usize>,
    tolerance: f64,
) -> Vec<f64>
where
    R: FnMut(&dyn Fn(f64) -> f64) -> Result<f64>,
{
    let max_roots = max_roots.unwrap_or_else(|| coeffs.len().saturating_sub(1));
    let mut roots = Vec::new();
    let mut current = coeffs.to_vec();

    for _ in 0..max_roots {
        if current.len() <= 1 {
            break;
        }

        let snapshot = current.clone();
        let root = match root_finder(&move |x| horner(&snapshot, x)) {
            Ok(root) => root,
            Err(err) => {
                log::debug!("root finder failed after {} roots: {err}", roots.len());
                break;
            }
        };
        roots.push(root);

        match deflate(&current, root, tolerance) {
            Ok(quotient) => current = quotient,
            Err(err) => {
                log::debug!("deflation stopped after {} roots: {err}", roots.len());
                break;
            }
        }
    }

    roots
}

#[cfg(test)]
mod test {
    use num::complex::Complex64;

    use super::{
        deflate, derivative_coefficients, horner, horner_complex, horner_with_derivative,
        polynomial_fn, roots_by_deflation, synthetic_division, DEFAULT_DEFLATION_TOLERANCE,
    };
    use crate::{Error, NewtonRaphson, Solver};

    #[test]
    fn horner_matches_direct_evaluation() {
        // 3x^3 + 2x^2 - 5x + 1 at x = 2
        let value = horner(&[3.0, 2.0, -5.0, 1.0], 2.0);
        assert!((value - 23.0).abs() < 1e-12);
    }

    #[test]
    fn horner_of_empty_is_zero() {
        assert!((horner(&[], 3.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn horner_of_constant_is_the_constant() {
        assert!((horner(&[7.5], 123.0) - 7.5).abs() < 1e-15);
    }

    #[test]
    fn complex_horner_agrees_on_the_real_axis() {
        let coeffs = [1.0, -6.0, 11.0, -6.0];
        let real = horner(&coeffs, 1.7);
        let complex = horner_complex(&coeffs, Complex64::new(1.7, 0.0));
        assert!((complex.re - real).abs() < 1e-12);
        assert!(complex.im.abs() < 1e-15);
    }

    #[test]
    fn joint_evaluation_matches_derivative_coefficients() {
        let coeffs = [3.0, 2.0, -5.0, 1.0];
        let deriv = derivative_coefficients(&coeffs);
        assert_eq!(deriv, vec![9.0, 4.0, -5.0]);
        for x in [-2.0, -0.5, 0.0, 1.0, 2.5] {
            let (p, dp) = horner_with_derivative(&coeffs, x);
            assert!((p - horner(&coeffs, x)).abs() < 1e-12);
            assert!((dp - horner(&deriv, x)).abs() < 1e-12);
        }
    }

    #[test]
    fn derivative_of_constant_is_zero() {
        assert_eq!(derivative_coefficients(&[4.0]), vec![0.0]);
        let (p, dp) = horner_with_derivative(&[4.0], 2.0);
        assert!((p - 4.0).abs() < 1e-15);
        assert!((dp - 0.0).abs() < 1e-15);
    }

    #[test]
    fn division_by_known_root() {
        // (x - 1)(x - 2)(x - 3) = x^3 - 6x^2 + 11x - 6
        let (quotient, remainder) = synthetic_division(&[1.0, -6.0, 11.0, -6.0], 1.0);
        assert_eq!(quotient, vec![1.0, -5.0, 6.0]);
        assert!((remainder - 0.0).abs() < 1e-15);
    }

    #[test]
    fn division_of_constant_leaves_it_as_remainder() {
        let (quotient, remainder) = synthetic_division(&[5.0], 2.0);
        assert!(quotient.is_empty());
        assert!((remainder - 5.0).abs() < 1e-15);
    }

    #[test]
    fn deflation_keeps_the_other_roots() {
        let coeffs = [1.0, -6.0, 11.0, -6.0];
        let quotient = deflate(&coeffs, 1.0, DEFAULT_DEFLATION_TOLERANCE).unwrap();
        assert!((horner(&quotient, 2.0) - 0.0).abs() < 1e-12);
        assert!((horner(&quotient, 3.0) - 0.0).abs() < 1e-12);
        // p(x) = (x - 1) * q(x) at points that are not roots
        for x in [-1.0, 0.5, 4.0] {
            assert!((horner(&coeffs, x) - (x - 1.0) * horner(&quotient, x)).abs() < 1e-10);
        }
    }

    #[test]
    fn deflation_rejects_a_non_root() {
        let result = deflate(&[1.0, -6.0, 11.0, -6.0], 1.5, DEFAULT_DEFLATION_TOLERANCE);
        assert!(matches!(result, Err(Error::NotARoot { .. })));
    }

    #[test]
    fn polynomial_fn_closes_over_the_coefficients() {
        let p = polynomial_fn(vec![1.0, -2.0, 1.0]);
        assert!((p(0.0) - 1.0).abs() < 1e-15);
        assert!((p(1.0) - 0.0).abs() < 1e-15);
        assert!((p(2.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn deflation_walks_all_three_roots() {
        // Newton from x = 0.4 lands on the smallest root first; deflation
        // then exposes the others one by one
        let roots = roots_by_deflation(
            &[1.0, -6.0, 11.0, -6.0],
            |p| {
                let mut solver = NewtonRaphson::new(p, 0.4)
                    .with_tolerance(1e-12)?
                    .with_max_iterations(200)?;
                let result = solver.solve();
                if result.convergence_achieved {
                    Ok(result.root)
                } else {
                    Err(anyhow::anyhow!("newton did not converge").into())
                }
            },
            None,
            1e-6,
        );
        assert_eq!(roots.len(), 3);
        let mut sorted = roots;
        sorted.sort_by(f64::total_cmp);
        assert!((sorted[0] - 1.0).abs() < 1e-6);
        assert!((sorted[1] - 2.0).abs() < 1e-6);
        assert!((sorted[2] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn failing_finder_stops_the_walk() {
        let roots = roots_by_deflation(
            &[1.0, -6.0, 11.0, -6.0],
            |_| Err(anyhow::anyhow!("no root today").into()),
            None,
            DEFAULT_DEFLATION_TOLERANCE,
        );
        assert!(roots.is_empty());
    }
}
