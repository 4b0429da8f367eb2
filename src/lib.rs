#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
//! Iterative root-finding algorithms for scalar non-linear equations.
//!
//! The crate is organized around a small solver contract: every method is a
//! struct that owns its configuration (tolerance, iteration cap, initial
//! data), implements [`Solver`], and reports a [`SolverResult`] carrying the
//! final estimate together with the full per-iteration history.
//!
//! Six methods are provided, each with its own convergence order and failure
//! modes:
//!
//! - [`Bisection`] and [`FalsePosition`]: bracketing methods, guaranteed to
//!   converge on a continuous sign change
//! - [`NewtonRaphson`]: quadratic convergence, uses an analytical derivative
//!   or a finite-difference fallback
//! - [`Secant`]: derivative-free, super-linear (golden ratio)
//! - [`FixedPoint`]: successive approximation on `x = g(x)`
//! - [`Muller`]: quadratic interpolation over complex numbers, finds complex
//!   roots even from real seeds
//!
//! The [`polynomial`] module adds Horner evaluation, synthetic division and
//! deflation over plain coefficient slices, and [`IncrementalSearch`] scans
//! an interval for candidate brackets.
//!
//! # Examples
//!
//! ```
//! use rootsolve::{Bisection, Solver};
//!
//! let mut solver = Bisection::new(|x: f64| x * x - 2.0, 0.0, 2.0)?;
//! let result = solver.solve();
//!
//! assert!(result.convergence_achieved);
//! assert!((result.root - 2.0_f64.sqrt()).abs() < 1e-5);
//! # Ok::<(), rootsolve::Error>(())
//! ```

mod error;
pub use error::{Error, Result};

mod solver;
pub use solver::{
    ConvergenceAnalysis, Derivative, FiniteDifference, IterationResult, Solver, SolverResult,
    DEFAULT_DERIVATIVE_STEP, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};

mod methods;
pub use methods::{
    find_bracketing_interval, Bisection, ConvergenceSpeed, FalsePosition, FixedPoint,
    FixedPointDiagnostics, InitialGuessReport, InitialGuessesReport, Muller, NewtonRaphson,
    Secant, SeedsReport,
};

pub mod polynomial;

mod search;
pub use search::{
    recommend_increment, IncrementSample, IncrementalSearch, SensitivityReport,
    DEFAULT_SUBDIVISIONS,
};

mod util;
// re-exported for use by integration tests
#[doc(hidden)]
pub use util::__testing;
