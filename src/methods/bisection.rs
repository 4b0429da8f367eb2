//! Bisection: repeated halving of a sign-change bracket.

use crate::{
    error::{Error, Result},
    solver::{
        validate_max_iterations, validate_tolerance, Solver, SolverResult, Tracker,
        DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, RELATIVE_ERROR_OFFSET,
    },
};

/// Bracketing solver with guaranteed linear convergence.
///
/// Each iteration halves the interval and keeps the half containing the sign
/// change, so the error after `n` iterations is exactly `w0 / 2^n`.
pub struct Bisection<F> {
    f: F,
    a: f64,
    b: f64,
    tolerance: f64,
    max_iterations: usize,
    initial_width: f64,
}

impl<F: Fn(f64) -> f64> Bisection<F> {
    /// Create a solver over the bracket `[a, b]`. The endpoints are swapped
    /// internally if given in descending order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBracket`] if `f(a)` and `f(b)` have the same sign.
    pub fn new(f: F, a: f64, b: f64) -> Result<Self> {
        let fa = f(a);
        let fb = f(b);
        if fa * fb > 0.0 {
            return Err(Error::InvalidBracket { a, b, fa, fb });
        }
        let (a, b) = if a > b { (b, a) } else { (a, b) };
        Ok(Self {
            f,
            a,
            b,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_width: b - a,
        })
    }

    /// # Errors
    ///
    /// [`Error::InvalidTolerance`] unless `tolerance` is finite and positive.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        self.tolerance = validate_tolerance(tolerance)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// [`Error::InvalidMaxIterations`] if `max_iterations` is zero.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self> {
        self.max_iterations = validate_max_iterations(max_iterations)?;
        Ok(self)
    }

    /// Iterations needed to shrink the initial bracket below
    /// `desired_tolerance`: `ceil(log2(w0 / tol))`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn estimate_iterations_needed(&self, desired_tolerance: f64) -> usize {
        (self.initial_width / desired_tolerance).log2().ceil() as usize
    }

    /// Interval contraction factor per iteration.
    #[must_use]
    pub const fn theoretical_convergence_rate(&self) -> f64 {
        0.5
    }
}

impl<F: Fn(f64) -> f64> Solver for Bisection<F> {
    fn method_name(&self) -> &'static str {
        "Bisection Method"
    }

    fn solve(&mut self) -> SolverResult {
        log::trace!(
            "starting {{method: \"bisection\", a: {}, b: {}, tolerance: {}, max_iterations: {}}}",
            self.a,
            self.b,
            self.tolerance,
            self.max_iterations
        );
        let mut tracker = Tracker::start();

        let (mut a, mut b) = (self.a, self.b);
        let mut fa = tracker.eval(&self.f, a);
        let fb = tracker.eval(&self.f, b);
        debug_assert!(fa * fb <= 0.0);

        tracker.record(0, a, fa, Some(b - a), None);

        for iteration in 1..=self.max_iterations {
            let c = (a + b) / 2.0;
            let fc = tracker.eval(&self.f, c);

            // half the current interval width
            let error = (b - a) / 2.0;
            let relative_error = error / (c.abs() + RELATIVE_ERROR_OFFSET);
            tracker.record(iteration, c, fc, Some(error), Some(relative_error));

            if fc.abs() < self.tolerance || error < self.tolerance {
                return tracker.finish(self.method_name(), c, iteration, true, error);
            }

            if fa * fc < 0.0 {
                b = c;
            } else {
                a = c;
                fa = fc;
            }
        }

        let c = (a + b) / 2.0;
        tracker.finish(
            self.method_name(),
            c,
            self.max_iterations,
            false,
            (b - a) / 2.0,
        )
    }
}

/// Walk outward from `x0` in fixed steps, first in the positive then in the
/// negative direction, until a sign change against `f(x0)` is found.
///
/// # Errors
///
/// [`Error::NoBracketFound`] if both directions exhaust `max_steps`.
pub fn find_bracketing_interval(
    f: impl Fn(f64) -> f64,
    x0: f64,
    step_size: f64,
    max_steps: usize,
) -> Result<(f64, f64)> {
    let fa = f(x0);

    let mut x = x0;
    for _ in 0..max_steps {
        x += step_size;
        if fa * f(x) < 0.0 {
            return Ok(if x0 < x { (x0, x) } else { (x, x0) });
        }
    }

    let mut x = x0;
    for _ in 0..max_steps {
        x -= step_size;
        if fa * f(x) < 0.0 {
            return Ok(if x < x0 { (x, x0) } else { (x0, x) });
        }
    }

    Err(Error::NoBracketFound { x0, max_steps })
}

#[cfg(test)]
mod test {
    use super::{find_bracketing_interval, Bisection};
    use crate::{Error, Solver};

    fn cubic(x: f64) -> f64 {
        x * x * x - x - 1.0
    }

    #[test]
    fn converges_on_cubic() {
        let mut solver = Bisection::new(cubic, 1.0, 2.0).unwrap();
        let result = solver.solve();
        assert!(result.convergence_achieved);
        assert!((result.root - 1.324_717_957_244_7).abs() < 1e-5);
        assert_eq!(result.method_name, "Bisection Method");
    }

    #[test]
    fn rejects_same_sign_bracket() {
        let result = Bisection::new(cubic, 2.0, 3.0);
        assert!(matches!(result, Err(Error::InvalidBracket { .. })));
    }

    #[test]
    fn swapped_endpoints_are_reordered() {
        let mut solver = Bisection::new(cubic, 2.0, 1.0).unwrap();
        let result = solver.solve();
        assert!(result.convergence_achieved);
        assert!((result.root - 1.324_717_957_244_7).abs() < 1e-5);
    }

    #[test]
    fn interval_halves_every_iteration() {
        let mut solver = Bisection::new(cubic, 1.0, 2.0).unwrap();
        let result = solver.solve();
        // errors are exact half-widths, so each is half the previous
        for pair in result.history.windows(2).skip(1) {
            let prev = pair[0].error.unwrap();
            let next = pair[1].error.unwrap();
            assert!((next - prev / 2.0).abs() < 1e-15);
        }
    }

    #[test]
    fn iteration_estimate_matches_halving() {
        let solver = Bisection::new(cubic, 1.0, 2.0).unwrap();
        // 2^-20 < 1e-6 <= 2^-19
        assert_eq!(solver.estimate_iterations_needed(1e-6), 20);
    }

    #[test]
    fn exhaustion_reports_non_convergence() {
        let mut solver = Bisection::new(cubic, 1.0, 2.0)
            .unwrap()
            .with_max_iterations(3)
            .unwrap();
        let result = solver.solve();
        assert!(!result.convergence_achieved);
        assert_eq!(result.iterations, 3);
        // best estimate still inside the original bracket
        assert!(result.root > 1.0 && result.root < 2.0);
    }

    #[test]
    fn outward_walk_finds_a_bracket() {
        let (a, b) = find_bracketing_interval(|x| x * x - 4.0, 0.0, 1.0, 100).unwrap();
        assert!(a < 2.0 && 2.0 < b);
    }

    #[test]
    fn outward_walk_gives_up() {
        let result = find_bracketing_interval(|x| x * x + 1.0, 0.0, 1.0, 10);
        assert!(matches!(result, Err(Error::NoBracketFound { .. })));
    }
}
