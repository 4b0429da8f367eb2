//! Fixed-point iteration (successive approximation) on `x = g(x)`.

use crate::{
    error::Result,
    solver::{
        calculate_errors, validate_max_iterations, validate_tolerance, FiniteDifference, Solver,
        SolverResult, Tracker, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, DIVERGENCE_LIMIT,
    },
};

/// Expected speed of the iteration near a fixed point, from the magnitude of
/// `g'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceSpeed {
    /// `|g'| < 0.5`
    Fast,
    /// `0.5 <= |g'| < 1`
    Slow,
    /// `|g'| >= 1`: the iteration is expected to move away from the point.
    Divergent,
}

/// Local analysis of the contraction condition `|g'(x)| < 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointDiagnostics {
    pub point: f64,
    pub g_value: f64,
    /// Central-difference estimate of `g'` at `point`.
    pub g_derivative: f64,
    pub contractive: bool,
    pub expected_speed: ConvergenceSpeed,
}

/// Fixed-point solver: `x_{n+1} = g(x_n)`.
///
/// The caller supplies `g` such that a solution of `x = g(x)` corresponds to
/// a root of the original equation; the transformation itself is the
/// caller's responsibility. The residual reported in the history is
/// `x - g(x)`.
///
/// Convergence is guaranteed only when `|g'(x)| < 1` near the fixed point.
/// [`FixedPoint::analyze_convergence`] estimates the condition but nothing
/// enforces it.
pub struct FixedPoint<G> {
    g: G,
    initial_guess: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl<G: Fn(f64) -> f64> FixedPoint<G> {
    pub fn new(g: G, initial_guess: f64) -> Self {
        Self {
            g,
            initial_guess,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// # Errors
    ///
    /// [`crate::Error::InvalidTolerance`] unless `tolerance` is finite and
    /// positive.
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self> {
        self.tolerance = validate_tolerance(tolerance)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// [`crate::Error::InvalidMaxIterations`] if `max_iterations` is zero.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self> {
        self.max_iterations = validate_max_iterations(max_iterations)?;
        Ok(self)
    }

    /// Linear order when the contraction condition holds.
    #[must_use]
    pub const fn theoretical_convergence_rate(&self) -> f64 {
        1.0
    }

    /// Estimate `g'` around `point` by central difference and classify the
    /// expected behavior of the iteration there.
    #[must_use]
    pub fn analyze_convergence(&self, point: f64, step: f64) -> FixedPointDiagnostics {
        let g_derivative = FiniteDifference::Central.estimate(&self.g, point, step);
        let expected_speed = if g_derivative.abs() < 0.5 {
            ConvergenceSpeed::Fast
        } else if g_derivative.abs() < 1.0 {
            ConvergenceSpeed::Slow
        } else {
            ConvergenceSpeed::Divergent
        };
        FixedPointDiagnostics {
            point,
            g_value: (self.g)(point),
            g_derivative,
            contractive: g_derivative.abs() < 1.0,
            expected_speed,
        }
    }

    fn residual(&self, x: f64) -> f64 {
        x - (self.g)(x)
    }
}

impl<G: Fn(f64) -> f64> Solver for FixedPoint<G> {
    fn method_name(&self) -> &'static str {
        "Fixed-Point Method (Successive Approximation)"
    }

    fn solve(&mut self) -> SolverResult {
        log::trace!(
            "starting {{method: \"fixed-point\", x0: {}, tolerance: {}, max_iterations: {}}}",
            self.initial_guess,
            self.tolerance,
            self.max_iterations
        );
        let mut tracker = Tracker::start();

        let mut x = self.initial_guess;
        tracker.record(0, x, self.residual(x), None, None);

        let mut iterations = 0;
        let mut final_error = self.residual(x).abs();

        for iteration in 1..=self.max_iterations {
            let x_new = tracker.eval(&self.g, x);
            let residual = self.residual(x_new);

            let (error, relative_error) = calculate_errors(x_new, x);
            tracker.record(iteration, x_new, residual, Some(error), Some(relative_error));
            iterations = iteration;
            final_error = error;

            if error < self.tolerance || residual.abs() < self.tolerance {
                return tracker.finish(self.method_name(), x_new, iteration, true, error);
            }

            if x_new.abs() > DIVERGENCE_LIMIT || !x_new.is_finite() {
                log::debug!("iterate {x_new} exceeds the divergence guard, stopping");
                return tracker.finish(self.method_name(), x_new, iteration, false, error);
            }

            x = x_new;
        }

        tracker.finish(self.method_name(), x, iterations, false, final_error)
    }
}
