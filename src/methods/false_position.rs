//! False position (regula falsi): linear interpolation over a bracket.

use crate::{
    error::{Error, Result},
    solver::{
        validate_max_iterations, validate_tolerance, Solver, SolverResult, Tracker,
        DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, RELATIVE_ERROR_OFFSET,
    },
};

/// Bracketing solver that replaces the bisection midpoint with the x-axis
/// crossing of the secant through the endpoints.
///
/// Keeps the bracketing property of [`Bisection`](crate::Bisection), but one
/// endpoint can stall on convex functions (classic one-sided convergence);
/// no special handling is applied beyond the iteration cap.
pub struct FalsePosition<F> {
    f: F,
    a: f64,
    b: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl<F: Fn(f64) -> f64> FalsePosition<F> {
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

    /// Approximate super-linear rate observed in practice.
    #[must_use]
    pub const fn theoretical_convergence_rate(&self) -> f64 {
        1.3
    }
}

impl<F: Fn(f64) -> f64> Solver for FalsePosition<F> {
    fn method_name(&self) -> &'static str {
        "False Position Method (Regula Falsi)"
    }

    fn solve(&mut self) -> SolverResult {
        log::trace!(
            "starting {{method: \"false position\", a: {}, b: {}, tolerance: {}, max_iterations: {}}}",
            self.a,
            self.b,
            self.tolerance,
            self.max_iterations
        );
        let mut tracker = Tracker::start();

        let (mut a, mut b) = (self.a, self.b);
        let mut fa = tracker.eval(&self.f, a);
        let mut fb = tracker.eval(&self.f, b);
        debug_assert!(fa * fb <= 0.0);

        tracker.record(0, a, fa, Some(b - a), None);

        for iteration in 1..=self.max_iterations {
            let x_new = a - (fa * (b - a)) / (fb - fa);
            let f_new = tracker.eval(&self.f, x_new);

            // distance to the nearest endpoint
            let error = (x_new - a).abs().min((x_new - b).abs());
            let relative_error = error / (x_new.abs() + RELATIVE_ERROR_OFFSET);
            tracker.record(iteration, x_new, f_new, Some(error), Some(relative_error));

            if f_new.abs() < self.tolerance || error < self.tolerance {
                return tracker.finish(self.method_name(), x_new, iteration, true, error);
            }

            if fa * f_new < 0.0 {
                b = x_new;
                fb = f_new;
            } else {
                a = x_new;
                fa = f_new;
            }
        }

        let x_new = a - (fa * (b - a)) / (fb - fa);
        let final_error = (x_new - a).abs().min((x_new - b).abs());
        tracker.finish(
            self.method_name(),
            x_new,
            self.max_iterations,
            false,
            final_error,
        )
    }
}
