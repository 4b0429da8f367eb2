//! The common solver contract shared by all six methods.
//!
//! Concrete solvers own their configuration and implement [`Solver`]; the
//! run-time bookkeeping (evaluation counters, iteration history, wall-clock
//! timing) lives in a [`Tracker`] created afresh at the top of every
//! [`solve`](Solver::solve) call, so successive calls on the same instance
//! cannot leak state into each other.

use std::time::Instant;

use num::complex::Complex64;

use crate::error::{Error, Result};

mod derivative;
pub use derivative::{Derivative, FiniteDifference, DEFAULT_DERIVATIVE_STEP};
mod result;
pub use result::{ConvergenceAnalysis, IterationResult, SolverResult};

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Offset that keeps relative errors finite when the approximation is zero.
pub(crate) const RELATIVE_ERROR_OFFSET: f64 = 1e-15;

/// Magnitude below which denominators and derivatives are treated as zero.
pub(crate) const DEGENERACY_FLOOR: f64 = 1e-15;

/// Magnitude past which an iterate is treated as diverging.
pub(crate) const DIVERGENCE_LIMIT: f64 = 1e10;

/// A root-finding method with fixed configuration.
///
/// An instance may be solved any number of times; every call produces a
/// fresh [`SolverResult`] and identical configuration yields identical
/// results.
pub trait Solver {
    /// Run the iteration until convergence, degeneracy or the iteration cap.
    ///
    /// Exhausting the iteration cap is *not* an error: the result carries
    /// `convergence_achieved = false` and the best current estimate.
    fn solve(&mut self) -> SolverResult;

    /// Human-readable name of the method, including the active variant.
    fn method_name(&self) -> &'static str;
}

/// True iff `|f_value| < τ` or the step is small relative to `x_new`.
pub(crate) fn check_convergence(tolerance: f64, x_new: f64, x_old: f64, f_value: f64) -> bool {
    if f_value.abs() < tolerance {
        return true;
    }
    (x_new - x_old).abs() < tolerance * (1.0 + x_new.abs())
}

/// Absolute and relative error of a step.
pub(crate) fn calculate_errors(x_new: f64, x_old: f64) -> (f64, f64) {
    let absolute = (x_new - x_old).abs();
    (absolute, absolute / (x_new.abs() + RELATIVE_ERROR_OFFSET))
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<f64> {
    if tolerance > 0.0 && tolerance.is_finite() {
        Ok(tolerance)
    } else {
        Err(Error::InvalidTolerance(tolerance))
    }
}

pub(crate) fn validate_max_iterations(max_iterations: usize) -> Result<usize> {
    if max_iterations == 0 {
        Err(Error::InvalidMaxIterations)
    } else {
        Ok(max_iterations)
    }
}

/// Per-call bookkeeping: counters, history and timing.
pub(crate) struct Tracker {
    started: Instant,
    last_step: Instant,
    history: Vec<IterationResult>,
    function_evaluations: u64,
    derivative_evaluations: u64,
}

impl Tracker {
    pub(crate) fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_step: now,
            history: Vec::new(),
            function_evaluations: 0,
            derivative_evaluations: 0,
        }
    }

    /// Evaluate the function and count the evaluation.
    pub(crate) fn eval(&mut self, f: impl Fn(f64) -> f64, x: f64) -> f64 {
        self.function_evaluations += 1;
        f(x)
    }

    /// Complex counterpart of [`Tracker::eval`], used by Muller.
    pub(crate) fn eval_complex(
        &mut self,
        f: impl Fn(Complex64) -> Complex64,
        z: Complex64,
    ) -> Complex64 {
        self.function_evaluations += 1;
        f(z)
    }

    pub(crate) fn count_derivative(&mut self) {
        self.derivative_evaluations += 1;
    }

    /// Append one history entry; the per-step elapsed time is measured from
    /// the previous entry.
    pub(crate) fn record(
        &mut self,
        iteration: usize,
        x: f64,
        f_value: f64,
        error: Option<f64>,
        relative_error: Option<f64>,
    ) {
        let elapsed = self.last_step.elapsed();
        self.last_step = Instant::now();
        self.history.push(IterationResult {
            iteration,
            x,
            f_value,
            error,
            relative_error,
            elapsed,
        });
    }

    pub(crate) fn finish(
        self,
        method_name: &str,
        root: f64,
        iterations: usize,
        convergence_achieved: bool,
        final_error: f64,
    ) -> SolverResult {
        SolverResult {
            root,
            complex_root: None,
            iterations,
            convergence_achieved,
            final_error,
            execution_time: self.started.elapsed(),
            history: self.history,
            method_name: method_name.to_owned(),
            function_evaluations: self.function_evaluations,
            derivative_evaluations: self.derivative_evaluations,
        }
    }

    /// Like [`Tracker::finish`], but collapses a complex estimate to its
    /// real part when the imaginary part is negligible.
    pub(crate) fn finish_complex(
        self,
        method_name: &str,
        root: Complex64,
        imaginary_floor: f64,
        iterations: usize,
        convergence_achieved: bool,
        final_error: f64,
    ) -> SolverResult {
        let complex_root = if root.im.abs() < imaginary_floor {
            None
        } else {
            Some(root)
        };
        SolverResult {
            root: root.re,
            complex_root,
            iterations,
            convergence_achieved,
            final_error,
            execution_time: self.started.elapsed(),
            history: self.history,
            method_name: method_name.to_owned(),
            function_evaluations: self.function_evaluations,
            derivative_evaluations: self.derivative_evaluations,
        }
    }
}
