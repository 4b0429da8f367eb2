//! Immutable records produced by a [`solve`](crate::Solver::solve) call.

use std::time::Duration;

use itertools::Itertools;
use num::complex::Complex64;

/// One snapshot per loop step.
///
/// Index 0 is the initial state before any update; the error fields are
/// populated from the first updated iteration onward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationResult {
    /// Iteration index, starting at 0.
    pub iteration: usize,
    /// Current approximation. Muller records the real part here.
    pub x: f64,
    /// Function value at `x`. Muller records the residual magnitude `|f|`.
    pub f_value: f64,
    /// Absolute distance from the previous approximation.
    pub error: Option<f64>,
    /// `error / (|x| + 1e-15)`.
    pub relative_error: Option<f64>,
    /// Wall-clock time spent on this step.
    pub elapsed: Duration,
}

/// Terminal outcome of a [`solve`](crate::Solver::solve) call.
///
/// Created once per invocation and owned by the caller; this is the sole
/// mechanism by which the solvers communicate with rendering or reporting
/// code.
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Final root estimate (real part, for Muller).
    pub root: f64,
    /// Full complex estimate, present only when Muller converged to a root
    /// with a non-negligible imaginary part.
    pub complex_root: Option<Complex64>,
    /// Total number of iterations performed.
    pub iterations: usize,
    pub convergence_achieved: bool,
    /// Final error estimate, method-specific (step size or residual).
    pub final_error: f64,
    /// Total wall-clock time of the call.
    pub execution_time: Duration,
    /// Complete ordered per-iteration history.
    pub history: Vec<IterationResult>,
    pub method_name: String,
    pub function_evaluations: u64,
    pub derivative_evaluations: u64,
}

/// Empirical convergence behavior extracted from an iteration history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceAnalysis {
    /// Mean of `ln|e_i| / ln|e_{i-1}|` over consecutive non-zero errors.
    pub convergence_rate: f64,
    pub total_iterations: usize,
    pub function_evaluations: u64,
    pub derivative_evaluations: u64,
    /// Last recorded absolute error, if any.
    pub final_error: Option<f64>,
}

impl SolverResult {
    /// Estimate the empirical convergence order from the history.
    ///
    /// Requires at least 3 history entries with at least 2 recorded errors;
    /// returns `None` when there is not enough data.
    #[must_use]
    pub fn convergence_analysis(&self) -> Option<ConvergenceAnalysis> {
        if self.history.len() < 3 {
            return None;
        }

        let errors: Vec<f64> = self
            .history
            .iter()
            .skip(1)
            .filter_map(|entry| entry.error)
            .collect();
        if errors.len() < 2 {
            return None;
        }

        let rates: Vec<f64> = errors
            .iter()
            .tuple_windows()
            .filter(|(prev, next)| **prev != 0.0 && **next != 0.0)
            .map(|(prev, next)| next.abs().ln() / prev.abs().ln())
            .collect();
        let convergence_rate = if rates.is_empty() {
            0.0
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        };

        Some(ConvergenceAnalysis {
            convergence_rate,
            total_iterations: self.history.len(),
            function_evaluations: self.function_evaluations,
            derivative_evaluations: self.derivative_evaluations,
            final_error: errors.last().copied(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(iteration: usize, x: f64, error: Option<f64>) -> IterationResult {
        IterationResult {
            iteration,
            x,
            f_value: 0.0,
            error,
            relative_error: error,
            elapsed: Duration::ZERO,
        }
    }

    fn result_with_history(history: Vec<IterationResult>) -> SolverResult {
        SolverResult {
            root: 0.0,
            complex_root: None,
            iterations: history.len().saturating_sub(1),
            convergence_achieved: true,
            final_error: 0.0,
            execution_time: Duration::ZERO,
            history,
            method_name: "Test".to_owned(),
            function_evaluations: 0,
            derivative_evaluations: 0,
        }
    }

    #[test]
    fn analysis_needs_three_entries() {
        let result = result_with_history(vec![entry(0, 1.0, None), entry(1, 0.5, Some(0.5))]);
        assert!(result.convergence_analysis().is_none());
    }

    #[test]
    fn analysis_needs_two_errors() {
        let result = result_with_history(vec![
            entry(0, 1.0, None),
            entry(1, 0.5, Some(0.5)),
            entry(2, 0.4, None),
        ]);
        assert!(result.convergence_analysis().is_none());
    }

    #[test]
    fn quadratic_history_reads_as_order_two() {
        // e_{i+1} = e_i^2 gives ln-ratio exactly 2 at every step
        let result = result_with_history(vec![
            entry(0, 1.0, None),
            entry(1, 0.0, Some(1e-1)),
            entry(2, 0.0, Some(1e-2)),
            entry(3, 0.0, Some(1e-4)),
            entry(4, 0.0, Some(1e-8)),
        ]);
        let analysis = result.convergence_analysis().unwrap();
        assert!((analysis.convergence_rate - 2.0).abs() < 1e-12);
        assert_eq!(analysis.final_error, Some(1e-8));
    }

    #[test]
    fn zero_errors_are_skipped() {
        let result = result_with_history(vec![
            entry(0, 1.0, None),
            entry(1, 0.0, Some(1e-2)),
            entry(2, 0.0, Some(0.0)),
            entry(3, 0.0, Some(1e-4)),
        ]);
        // no consecutive non-zero pair survives
        let analysis = result.convergence_analysis().unwrap();
        assert!((analysis.convergence_rate - 0.0).abs() < 1e-15);
    }
}
