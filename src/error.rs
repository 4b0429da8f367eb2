use thiserror::Error as ThisError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The top-level error type for this crate.
///
/// Only construction-time invariant violations and deflation failures are
/// reported through this type. Numerical pathologies encountered *during* a
/// [`solve`](crate::Solver::solve) call (vanishing derivatives, coincident
/// points, divergence) are absorbed into the result's convergence flag so
/// that callers inspect the iteration history instead of catching errors.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// Bracketing methods require endpoints with opposite function signs.
    #[error(
        "function values at the bracket endpoints must have opposite signs: \
         f({a}) = {fa}, f({b}) = {fb}"
    )]
    InvalidBracket { a: f64, b: f64, fa: f64, fb: f64 },

    #[error("tolerance must be strictly positive, got {0}")]
    InvalidTolerance(f64),

    #[error("maximum iteration count must be strictly positive")]
    InvalidMaxIterations,

    /// Deflation was attempted with a value that is not a root.
    #[error("{root} is not a root of the polynomial: p({root}) = {value}")]
    NotARoot { root: f64, value: f64 },

    /// Synthetic division by an inexact root left a non-negligible remainder.
    #[error("synthetic division left a non-negligible remainder: {remainder}")]
    RemainderTooLarge { remainder: f64 },

    /// The outward walk of [`find_bracketing_interval`] exhausted its step
    /// budget without seeing a sign change.
    ///
    /// [`find_bracketing_interval`]: crate::find_bracketing_interval
    #[error("no bracketing interval found within {max_steps} steps of {x0}")]
    NoBracketFound { x0: f64, max_steps: usize },

    /// Unexpected error from a caller-supplied root finder or refiner.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
