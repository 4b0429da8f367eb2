//! Secant method: Newton with a two-point slope estimate.

use crate::{
    error::Result,
    solver::{
        calculate_errors, check_convergence, validate_max_iterations, validate_tolerance, Solver,
        SolverResult, Tracker, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, DEGENERACY_FLOOR,
    },
};

/// Quality assessment of the two initial guesses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialGuessesReport {
    pub x0: f64,
    pub x1: f64,
    pub f0: f64,
    pub f1: f64,
    pub initial_slope: f64,
    pub guess_spacing: f64,
    pub recommended: bool,
    pub caution: Option<&'static str>,
}

/// Secant solver: `x_{n+1} = x_n - f(x_n) / s_n` with the slope taken
/// through the two most recent iterates.
///
/// Derivative-free, super-linear order (the golden ratio). The two seeds
/// enter the history at indices 0 and 1; the loop proper starts at index 2.
pub struct Secant<F> {
    f: F,
    x0: f64,
    x1: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl<F: Fn(f64) -> f64> Secant<F> {
    pub fn new(f: F, x0: f64, x1: f64) -> Self {
        Self {
            f,
            x0,
            x1,
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

    /// Asymptotic order: the golden ratio.
    #[must_use]
    pub fn theoretical_convergence_rate(&self) -> f64 {
        (1.0 + 5.0_f64.sqrt()) / 2.0
    }

    /// Assess the initial guesses without running the iteration.
    #[must_use]
    pub fn analyze_initial_guesses(&self) -> InitialGuessesReport {
        let f0 = (self.f)(self.x0);
        let f1 = (self.f)(self.x1);
        let guess_spacing = (self.x1 - self.x0).abs();
        let initial_slope = (f1 - f0) / (self.x1 - self.x0);

        let caution = if initial_slope.abs() < 1e-10 {
            Some("initial slope is very small")
        } else if guess_spacing < 1e-10 {
            Some("initial guesses are very close together")
        } else if f0.abs() > 1e6 || f1.abs() > 1e6 {
            Some("function values are very large at the initial guesses")
        } else {
            None
        };

        InitialGuessesReport {
            x0: self.x0,
            x1: self.x1,
            f0,
            f1,
            initial_slope,
            guess_spacing,
            recommended: caution.is_none(),
            caution,
        }
    }
}

impl<F: Fn(f64) -> f64> Solver for Secant<F> {
    fn method_name(&self) -> &'static str {
        "Secant Method"
    }

    fn solve(&mut self) -> SolverResult {
        log::trace!(
            "starting {{method: \"secant\", x0: {}, x1: {}, tolerance: {}, max_iterations: {}}}",
            self.x0,
            self.x1,
            self.tolerance,
            self.max_iterations
        );
        let mut tracker = Tracker::start();

        let mut x_prev = self.x0;
        let mut x_curr = self.x1;
        let mut f_prev = tracker.eval(&self.f, x_prev);
        let mut f_curr = tracker.eval(&self.f, x_curr);

        tracker.record(0, x_prev, f_prev, None, None);
        tracker.record(1, x_curr, f_curr, None, None);

        let mut iterations = 1;
        let mut final_error = f_curr.abs();

        for iteration in 2..=self.max_iterations {
            // refuse to divide by a vanishing secant slope
            if (f_curr - f_prev).abs() < DEGENERACY_FLOOR {
                log::debug!("secant function values too close at iteration {iteration}, stopping");
                break;
            }

            let slope = (f_curr - f_prev) / (x_curr - x_prev);
            let x_new = x_curr - f_curr / slope;
            let f_new = tracker.eval(&self.f, x_new);

            let (error, relative_error) = calculate_errors(x_new, x_curr);
            tracker.record(iteration, x_new, f_new, Some(error), Some(relative_error));
            iterations = iteration;
            final_error = error;

            if check_convergence(self.tolerance, x_new, x_curr, f_new) {
                return tracker.finish(self.method_name(), x_new, iteration, true, error);
            }

            x_prev = x_curr;
            x_curr = x_new;
            f_prev = f_curr;
            f_curr = f_new;
        }

        tracker.finish(self.method_name(), x_curr, iterations, false, final_error)
    }
}
