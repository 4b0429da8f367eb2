//! Muller's method: quadratic interpolation through three points, over the
//! complex plane.

use num::complex::Complex64;

use crate::{
    error::Result,
    solver::{
        validate_max_iterations, validate_tolerance, Solver, SolverResult, Tracker,
        DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, DEGENERACY_FLOOR, DIVERGENCE_LIMIT,
        RELATIVE_ERROR_OFFSET,
    },
};

/// Reported roots with an imaginary part below this magnitude collapse to
/// their real part.
const IMAGINARY_FLOOR: f64 = 1e-10;

/// Quality assessment of the three seed points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedsReport {
    pub seeds: [Complex64; 3],
    pub f_values: [Complex64; 3],
    pub min_spacing: f64,
    /// Real, equally spaced seeds can reduce the effectiveness of the
    /// quadratic fit.
    pub equally_spaced: bool,
    pub recommended: bool,
    pub caution: Option<&'static str>,
}

/// Muller solver: fits a parabola through the three most recent points and
/// steps to its nearer root.
///
/// The iteration runs over complex numbers even for real seeds, so complex
/// conjugate root pairs are reachable. The history records the real part of
/// each iterate and the residual magnitude `|f|`; the result collapses to a
/// real root when the imaginary part is negligible, and carries the full
/// complex estimate otherwise.
pub struct Muller<F> {
    f: F,
    seeds: [Complex64; 3],
    tolerance: f64,
    max_iterations: usize,
}

impl<F: Fn(Complex64) -> Complex64> Muller<F> {
    /// Create a solver from three real seed points.
    pub fn new(f: F, x0: f64, x1: f64, x2: f64) -> Self {
        Self::with_complex_seeds(
            f,
            Complex64::new(x0, 0.0),
            Complex64::new(x1, 0.0),
            Complex64::new(x2, 0.0),
        )
    }

    /// Create a solver from three complex seed points.
    pub fn with_complex_seeds(f: F, x0: Complex64, x1: Complex64, x2: Complex64) -> Self {
        Self {
            f,
            seeds: [x0, x1, x2],
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

    /// Asymptotic order of the three-point interpolation.
    #[must_use]
    pub const fn theoretical_convergence_rate(&self) -> f64 {
        1.84
    }

    /// Assess the seed points without running the iteration.
    #[must_use]
    pub fn analyze_initial_guesses(&self) -> SeedsReport {
        let [x0, x1, x2] = self.seeds;
        let f_values = [(self.f)(x0), (self.f)(x1), (self.f)(x2)];

        let min_spacing = (x1 - x0)
            .norm()
            .min((x2 - x1).norm())
            .min((x2 - x0).norm());
        let all_real = self.seeds.iter().all(|z| z.im == 0.0);
        let equally_spaced = all_real
            && ((x1 - x0).re - (x2 - x1).re).abs() < 1e-10
            && (x1 - x0).re.abs() > 1e-10;

        let max_residual = f_values.iter().map(|fz| fz.norm()).fold(0.0, f64::max);
        let caution = if min_spacing < 1e-10 {
            Some("initial points are very close together")
        } else if max_residual > 1e6 {
            Some("function values are very large at the initial points")
        } else {
            None
        };

        SeedsReport {
            seeds: self.seeds,
            f_values,
            min_spacing,
            equally_spaced,
            recommended: caution.is_none(),
            caution,
        }
    }
}

impl<F: Fn(Complex64) -> Complex64> Solver for Muller<F> {
    fn method_name(&self) -> &'static str {
        "Muller's Method"
    }

    fn solve(&mut self) -> SolverResult {
        log::trace!(
            "starting {{method: \"muller\", seeds: {:?}, tolerance: {}, max_iterations: {}}}",
            self.seeds,
            self.tolerance,
            self.max_iterations
        );
        let mut tracker = Tracker::start();

        let mut xs = self.seeds;
        let mut fs = [
            tracker.eval_complex(&self.f, xs[0]),
            tracker.eval_complex(&self.f, xs[1]),
            tracker.eval_complex(&self.f, xs[2]),
        ];
        for (i, (z, fz)) in xs.iter().zip(&fs).enumerate() {
            tracker.record(i, z.re, fz.norm(), None, None);
        }

        let mut iterations = 2;
        let mut final_error = fs[2].norm();

        for iteration in 3..=self.max_iterations {
            let h0 = xs[1] - xs[0];
            let h1 = xs[2] - xs[1];

            // coincident points leave the parabola undefined
            if h0.norm() < DEGENERACY_FLOOR || h1.norm() < DEGENERACY_FLOOR {
                log::debug!("muller points coincide at iteration {iteration}, stopping");
                break;
            }

            let delta0 = (fs[1] - fs[0]) / h0;
            let delta1 = (fs[2] - fs[1]) / h1;

            let a = (delta1 - delta0) / (h1 + h0);
            let b = a * h1 + delta1;
            let c = fs[2];

            // pick the denominator of larger magnitude to minimize
            // cancellation
            let disc_sqrt = (b * b - a * c * 4.0).sqrt();
            let plus = b + disc_sqrt;
            let minus = b - disc_sqrt;
            let denominator = if plus.norm() > minus.norm() { plus } else { minus };

            if denominator.norm() < DEGENERACY_FLOOR {
                log::debug!("near-zero denominator in muller update, stopping");
                break;
            }

            let dx = c * -2.0 / denominator;
            let x_new = xs[2] + dx;
            let f_new = tracker.eval_complex(&self.f, x_new);

            let error = dx.norm();
            let relative_error = error / (x_new.norm() + RELATIVE_ERROR_OFFSET);
            tracker.record(iteration, x_new.re, f_new.norm(), Some(error), Some(relative_error));
            iterations = iteration;
            final_error = error;

            if error < self.tolerance || f_new.norm() < self.tolerance {
                return tracker.finish_complex(
                    self.method_name(),
                    x_new,
                    IMAGINARY_FLOOR,
                    iteration,
                    true,
                    error,
                );
            }

            if x_new.norm() > DIVERGENCE_LIMIT || !x_new.norm().is_finite() {
                log::debug!("iterate {x_new} exceeds the divergence guard, stopping");
                return tracker.finish_complex(
                    self.method_name(),
                    x_new,
                    IMAGINARY_FLOOR,
                    iteration,
                    false,
                    error,
                );
            }

            xs = [xs[1], xs[2], x_new];
            fs = [fs[1], fs[2], f_new];
        }

        tracker.finish_complex(
            self.method_name(),
            xs[2],
            IMAGINARY_FLOOR,
            iterations,
            false,
            final_error,
        )
    }
}
