//! Finite-difference derivative estimation.

/// Step size used when no explicit step is given.
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-8;

/// Stateless finite-difference estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FiniteDifference {
    Forward,
    #[default]
    Central,
    Backward,
}

impl FiniteDifference {
    /// Estimate `f'(x)` with the given step size.
    pub fn estimate(self, f: impl Fn(f64) -> f64, x: f64, step: f64) -> f64 {
        match self {
            Self::Forward => (f(x + step) - f(x)) / step,
            Self::Central => (f(x + step) - f(x - step)) / (2.0 * step),
            Self::Backward => (f(x) - f(x - step)) / step,
        }
    }
}

/// How a solver obtains the derivative of its equation, resolved once at
/// construction time.
pub enum Derivative {
    /// Caller-supplied analytical derivative.
    Analytic(Box<dyn Fn(f64) -> f64>),
    /// Finite-difference estimate computed from the equation itself.
    Numerical(FiniteDifference),
}

impl Derivative {
    /// Evaluate the derivative at `x`, falling back to a finite difference
    /// over `f` with step [`DEFAULT_DERIVATIVE_STEP`] for the numerical
    /// variant.
    pub fn evaluate(&self, f: impl Fn(f64) -> f64, x: f64) -> f64 {
        match self {
            Self::Analytic(df) => df(x),
            Self::Numerical(scheme) => scheme.estimate(f, x, DEFAULT_DERIVATIVE_STEP),
        }
    }

    #[must_use]
    pub const fn is_analytic(&self) -> bool {
        matches!(self, Self::Analytic(_))
    }
}
