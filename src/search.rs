//! Incremental search: fixed-step scan of an interval for sign changes.

use itertools::Itertools;

use crate::error::Result;

/// Subdivision count used when neither an increment nor a count is given.
pub const DEFAULT_SUBDIVISIONS: usize = 1000;

/// Function values below this magnitude count as an exact root hit.
const EXACT_HIT_FLOOR: f64 = 1e-15;

/// One scan outcome of [`IncrementalSearch::analyze_increment_sensitivity`].
#[derive(Debug, Clone, PartialEq)]
pub struct IncrementSample {
    pub factor: f64,
    pub increment: f64,
    pub subdivisions: usize,
    pub sign_changes: Vec<(f64, f64)>,
}

/// Aggregate of an increment-sensitivity sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityReport {
    pub samples: Vec<IncrementSample>,
    pub min_found: usize,
    pub max_found: usize,
    /// The step multiple that surfaced the most sign changes.
    pub recommended_factor: f64,
}

/// Scans `[a, b]` in fixed steps, recording every sub-interval over which
/// the function changes sign.
///
/// The step size is the central trade-off: a large step can miss closely
/// spaced roots, a small one costs evaluations. Each sign-change bracket is
/// a natural input for one of the bracketing solvers.
pub struct IncrementalSearch<F> {
    f: F,
    a: f64,
    b: f64,
    increment: f64,
}

impl<F: Fn(f64) -> f64> IncrementalSearch<F> {
    /// Scan with the default [`DEFAULT_SUBDIVISIONS`] resolution.
    pub fn new(f: F, interval: (f64, f64)) -> Self {
        log::debug!(
            "no increment or subdivision count given, defaulting to {DEFAULT_SUBDIVISIONS} \
             subdivisions; smaller steps find more roots but cost more evaluations"
        );
        Self::with_subdivisions(f, interval, DEFAULT_SUBDIVISIONS)
    }

    /// Scan with an explicit step size.
    pub fn with_increment(f: F, interval: (f64, f64), increment: f64) -> Self {
        let (a, b) = normalize(interval);
        let increment = increment.abs();
        if increment < 1e-12 {
            log::debug!("very small increment {increment} may lead to numerical issues");
        }
        Self { f, a, b, increment }
    }

    /// Scan with a step derived from a subdivision count.
    #[allow(clippy::cast_precision_loss)]
    pub fn with_subdivisions(f: F, interval: (f64, f64), subdivisions: usize) -> Self {
        let (a, b) = normalize(interval);
        let increment = (b - a) / subdivisions as f64;
        Self { f, a, b, increment }
    }

    /// Walk the interval, returning each sub-interval `(x, x + step)` where
    /// `f(x) * f(x + step) < 0`. An exact hit `|f(x2)| < 1e-15` is recorded
    /// as the degenerate pair `(x2, x2)`.
    #[must_use]
    pub fn find_sign_changes(&self) -> Vec<(f64, f64)> {
        self.scan(self.increment)
    }

    fn scan(&self, increment: f64) -> Vec<(f64, f64)> {
        let mut brackets = Vec::new();

        let mut x_current = self.a;
        let mut f_current = (self.f)(x_current);

        while x_current < self.b {
            let x_next = (x_current + increment).min(self.b);
            let f_next = (self.f)(x_next);

            if f_current * f_next < 0.0 {
                brackets.push((x_current, x_next));
            } else if f_next.abs() < EXACT_HIT_FLOOR {
                brackets.push((x_next, x_next));
            }

            x_current = x_next;
            f_current = f_next;
        }

        brackets
    }

    /// One root candidate per sign change: the bracket midpoint (exact hits
    /// pass through unchanged).
    #[must_use]
    pub fn find_potential_roots(&self) -> Vec<f64> {
        self.find_sign_changes()
            .into_iter()
            .map(|(x1, x2)| (x1 + x2) / 2.0)
            .collect()
    }

    /// Like [`IncrementalSearch::find_potential_roots`], but refines each
    /// bracket with the supplied root finder, falling back to the midpoint
    /// when refinement fails.
    pub fn find_potential_roots_refined<R>(&self, mut refiner: R) -> Vec<f64>
    where
        R: FnMut(f64, f64) -> Result<f64>,
    {
        self.find_sign_changes()
            .into_iter()
            .map(|(x1, x2)| {
                if x1 == x2 {
                    return x1;
                }
                refiner(x1, x2).unwrap_or_else(|err| {
                    log::debug!("refinement failed on [{x1}, {x2}], using midpoint: {err}");
                    (x1 + x2) / 2.0
                })
            })
            .collect()
    }

    /// Re-run the scan at several multiples of the configured step and
    /// report how the step choice affects the number of sign changes found.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn analyze_increment_sensitivity(&self, factors: &[f64]) -> SensitivityReport {
        let samples: Vec<IncrementSample> = factors
            .iter()
            .map(|&factor| {
                let increment = self.increment * factor;
                IncrementSample {
                    factor,
                    increment,
                    subdivisions: ((self.b - self.a) / increment) as usize,
                    sign_changes: self.scan(increment),
                }
            })
            .collect();

        let counts = samples.iter().map(|sample| sample.sign_changes.len());
        let min_found = counts.clone().min().unwrap_or(0);
        let max_found = counts.max().unwrap_or(0);
        let recommended_factor = samples
            .iter()
            .max_by_key(|sample| sample.sign_changes.len())
            .map_or(1.0, |sample| sample.factor);

        SensitivityReport {
            samples,
            min_found,
            max_found,
            recommended_factor,
        }
    }
}

/// Recommend a step size for `f` over `interval` from the sign-change
/// density of a coarse sample.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn recommend_increment(f: impl Fn(f64) -> f64, interval: (f64, f64), sample_points: usize) -> f64 {
    let (a, b) = normalize(interval);
    let step = (b - a) / (sample_points.saturating_sub(1).max(1)) as f64;
    let values: Vec<f64> = (0..sample_points).map(|i| f(a + i as f64 * step)).collect();

    let sign_changes = values
        .iter()
        .tuple_windows()
        .filter(|(prev, next)| **prev * **next < 0.0)
        .count();

    let base = (b - a) / 1000.0;
    let recommended = if sign_changes > 0 {
        let density = sign_changes as f64 / sample_points as f64;
        base * (1.0 / 10.0f64.mul_add(density, 1.0))
    } else {
        base * 2.0
    };

    // never below a 10000-subdivision step
    recommended.max((b - a) / 10_000.0)
}

fn normalize(interval: (f64, f64)) -> (f64, f64) {
    let (a, b) = interval;
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
