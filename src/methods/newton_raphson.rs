//! Newton-Raphson iteration with analytical or finite-difference derivative.

use crate::{
    error::Result,
    solver::{
        calculate_errors, check_convergence, validate_max_iterations, validate_tolerance,
        Derivative, FiniteDifference, Solver, SolverResult, Tracker, DEFAULT_MAX_ITERATIONS,
        DEFAULT_TOLERANCE, DEGENERACY_FLOOR, DIVERGENCE_LIMIT,
    },
};

/// Quality assessment of the initial guess, computed before iterating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialGuessReport {
    pub initial_guess: f64,
    pub f_value: f64,
    pub derivative_value: f64,
    /// First step `-f(x0)/f'(x0)`; infinite when the derivative vanishes.
    pub newton_step: f64,
    pub recommended: bool,
    pub caution: Option<&'static str>,
}

/// Newton-Raphson solver: `x_{n+1} = x_n - f(x_n)/f'(x_n)`.
///
/// Quadratic convergence when the guess is close enough to a simple root;
/// there is no global convergence guarantee. A vanishing derivative or a
/// diverging iterate is reported through the convergence flag, never raised.
pub struct NewtonRaphson<F> {
    f: F,
    derivative: Derivative,
    initial_guess: f64,
    tolerance: f64,
    max_iterations: usize,
}

impl<F: Fn(f64) -> f64> NewtonRaphson<F> {
    /// Create a solver that estimates the derivative by central differences.
    pub fn new(f: F, initial_guess: f64) -> Self {
        Self {
            f,
            derivative: Derivative::Numerical(FiniteDifference::Central),
            initial_guess,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Use an analytical derivative instead of the numerical fallback.
    #[must_use]
    pub fn with_derivative(mut self, derivative: impl Fn(f64) -> f64 + 'static) -> Self {
        self.derivative = Derivative::Analytic(Box::new(derivative));
        self
    }

    /// Change the finite-difference scheme of the numerical fallback.
    #[must_use]
    pub fn with_difference_scheme(mut self, scheme: FiniteDifference) -> Self {
        self.derivative = Derivative::Numerical(scheme);
        self
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

    /// Asymptotic order for simple roots.
    #[must_use]
    pub const fn theoretical_convergence_rate(&self) -> f64 {
        2.0
    }

    /// Assess the initial guess without running the iteration.
    #[must_use]
    pub fn analyze_initial_guess(&self) -> InitialGuessReport {
        let x = self.initial_guess;
        let f_value = (self.f)(x);
        let derivative_value = self.derivative.evaluate(&self.f, x);
        let newton_step = if derivative_value.abs() > DEGENERACY_FLOOR {
            -f_value / derivative_value
        } else {
            f64::INFINITY
        };

        let caution = if derivative_value.abs() < 1e-6 {
            Some("derivative is very small near the initial guess")
        } else if f_value.abs() > 1e6 {
            Some("function value is very large at the initial guess")
        } else if newton_step.abs() > 1e6 {
            Some("the first Newton step is very large")
        } else {
            None
        };

        InitialGuessReport {
            initial_guess: x,
            f_value,
            derivative_value,
            newton_step,
            recommended: caution.is_none(),
            caution,
        }
    }
}

impl<F: Fn(f64) -> f64> Solver for NewtonRaphson<F> {
    fn method_name(&self) -> &'static str {
        if self.derivative.is_analytic() {
            "Newton-Raphson Method (analytical derivative)"
        } else {
            "Newton-Raphson Method (numerical derivative)"
        }
    }

    fn solve(&mut self) -> SolverResult {
        log::trace!(
            "starting {{method: \"newton-raphson\", x0: {}, tolerance: {}, max_iterations: {}, analytic: {}}}",
            self.initial_guess,
            self.tolerance,
            self.max_iterations,
            self.derivative.is_analytic()
        );
        let mut tracker = Tracker::start();

        let mut x = self.initial_guess;
        let mut f_x = tracker.eval(&self.f, x);
        tracker.record(0, x, f_x, None, None);

        for iteration in 1..=self.max_iterations {
            tracker.count_derivative();
            let d = self.derivative.evaluate(&self.f, x);

            // stationary point: the update is undefined, report the prior
            // iterate as the best estimate
            if d.abs() < DEGENERACY_FLOOR {
                log::debug!("derivative vanished at x = {x}, stopping");
                return tracker.finish(self.method_name(), x, iteration - 1, false, f_x.abs());
            }

            let x_new = x - f_x / d;
            let f_new = tracker.eval(&self.f, x_new);

            let (error, relative_error) = calculate_errors(x_new, x);
            tracker.record(iteration, x_new, f_new, Some(error), Some(relative_error));

            if check_convergence(self.tolerance, x_new, x, f_new) {
                return tracker.finish(self.method_name(), x_new, iteration, true, error);
            }

            if x_new.abs() > DIVERGENCE_LIMIT || !x_new.is_finite() {
                log::debug!("iterate {x_new} exceeds the divergence guard, stopping");
                return tracker.finish(self.method_name(), x_new, iteration, false, error);
            }

            x = x_new;
            f_x = f_new;
        }

        tracker.finish(
            self.method_name(),
            x,
            self.max_iterations,
            false,
            f_x.abs(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::NewtonRaphson;
    use crate::Solver;

    #[test]
    fn converges_quadratically_with_analytic_derivative() {
        let mut solver =
            NewtonRaphson::new(|x: f64| x * x - 4.0, 1.5).with_derivative(|x| 2.0 * x);
        let result = solver.solve();
        assert!(result.convergence_achieved);
        assert!((result.root - 2.0).abs() < 1e-5);
        assert!(result.iterations < 10);
        assert_eq!(
            result.method_name,
            "Newton-Raphson Method (analytical derivative)"
        );
    }

    #[test]
    fn numerical_fallback_matches_the_analytic_path() {
        let mut solver = NewtonRaphson::new(|x: f64| x * x - 4.0, 1.5);
        let result = solver.solve();
        assert!(result.convergence_achieved);
        assert!((result.root - 2.0).abs() < 1e-5);
        assert_eq!(
            result.method_name,
            "Newton-Raphson Method (numerical derivative)"
        );
    }

    #[test]
    fn stationary_point_reports_prior_iterate() {
        // f'(0) = 0 exactly
        let mut solver =
            NewtonRaphson::new(|x: f64| x * x - 4.0, 0.0).with_derivative(|x| 2.0 * x);
        let result = solver.solve();
        assert!(!result.convergence_achieved);
        assert_eq!(result.iterations, 0);
        assert!((result.root - 0.0).abs() < 1e-15);
    }

    #[test]
    fn divergence_is_reported_not_raised() {
        // Newton on atan diverges for guesses past ~1.39
        let mut solver = NewtonRaphson::new(f64::atan, 2.0).with_derivative(|x| 1.0 / (1.0 + x * x));
        let result = solver.solve();
        assert!(!result.convergence_achieved);
    }

    #[test]
    fn guess_report_flags_small_derivative() {
        let solver = NewtonRaphson::new(|x: f64| x * x - 4.0, 1e-9).with_derivative(|x| 2.0 * x);
        let report = solver.analyze_initial_guess();
        assert!(!report.recommended);
        assert!(report.caution.is_some());
    }

    #[test]
    fn guess_report_accepts_a_good_guess() {
        let solver = NewtonRaphson::new(|x: f64| x * x - 4.0, 1.5).with_derivative(|x| 2.0 * x);
        let report = solver.analyze_initial_guess();
        assert!(report.recommended);
        assert!((report.newton_step - (4.0 - 1.5 * 1.5) / 3.0).abs() < 1e-12);
    }
}
