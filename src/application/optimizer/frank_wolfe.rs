//! Frank-Wolfe maximization of the growth objective.
//!
//! The feasible region is a polytope (box bounds plus linear exposure caps),
//! so each iteration only needs a linear oracle:
//!
//! ```text
//! s = argmax_{s in P} <∇g(f), s>
//! ```
//!
//! which the [`Solver`] port answers as `min <-∇g(f), s>`. The iterate moves
//! toward `s` with an exact line search; since `g` is concave the slope along
//! the segment is decreasing and bisection on it finds the best step. The
//! Frank-Wolfe gap `<∇g(f), s - f>` bounds the suboptimality and serves as
//! the stopping criterion.

use super::growth::{dot, GrowthObjective};
use crate::error::SolverError;
use crate::port::outbound::solver::{LpProblem, Solver};

const LINE_SEARCH_STEPS: usize = 60;

/// Configuration for the Frank-Wolfe loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FrankWolfeConfig {
    /// Maximum number of oracle calls.
    pub max_iterations: usize,
    /// Stop once the Frank-Wolfe gap falls below this.
    pub tolerance: f64,
}

impl Default for FrankWolfeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-7,
        }
    }
}

/// Output of a Frank-Wolfe run.
#[derive(Debug, Clone, PartialEq)]
pub struct FrankWolfeResult {
    pub fractions: Vec<f64>,
    /// Final Frank-Wolfe gap.
    pub gap: f64,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone)]
pub struct FrankWolfe {
    config: FrankWolfeConfig,
}

impl FrankWolfe {
    #[must_use]
    pub const fn new(config: FrankWolfeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &FrankWolfeConfig {
        &self.config
    }

    /// Maximize `objective` over the region described by `region`.
    ///
    /// Starts from `f = 0`, which is feasible for every region the optimizer
    /// builds. The objective coefficients of `region` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::NotOptimal`] if the oracle does not report an
    /// optimal vertex, [`SolverError::NonFinite`] if the gradient or vertex
    /// contains NaN or infinity, and any backend error unchanged.
    pub fn maximize(
        &self,
        objective: &GrowthObjective,
        region: &LpProblem,
        solver: &dyn Solver,
    ) -> Result<FrankWolfeResult, SolverError> {
        let n = objective.dim();
        let mut f = vec![0.0; n];
        if n == 0 {
            return Ok(FrankWolfeResult {
                fractions: f,
                gap: 0.0,
                iterations: 0,
                converged: true,
            });
        }

        let mut gap = f64::INFINITY;
        let mut iterations = 0;

        for _ in 0..self.config.max_iterations {
            iterations += 1;

            let grad = objective.gradient(&f);
            if !all_finite(&grad) {
                return Err(SolverError::NonFinite);
            }

            let oracle = region.with_objective(grad.iter().map(|g| -g).collect());
            let solution = solver.solve_lp(&oracle)?;
            if !solution.is_optimal() {
                return Err(SolverError::NotOptimal(solution.status));
            }
            let s = solution.values;
            if s.len() != n || !all_finite(&s) {
                return Err(SolverError::NonFinite);
            }

            let direction: Vec<f64> = s.iter().zip(&f).map(|(si, fi)| si - fi).collect();
            gap = dot(&grad, &direction);
            if gap < self.config.tolerance {
                break;
            }

            let gamma = line_search(objective, &f, &direction);
            for (fi, di) in f.iter_mut().zip(&direction) {
                *fi += gamma * di;
            }
        }

        if !all_finite(&f) {
            return Err(SolverError::NonFinite);
        }

        Ok(FrankWolfeResult {
            fractions: f,
            gap,
            iterations,
            converged: gap < self.config.tolerance,
        })
    }
}

/// Best step in [0, 1] along `d` by bisection on the directional derivative.
fn line_search(objective: &GrowthObjective, f: &[f64], d: &[f64]) -> f64 {
    let slope = |gamma| objective.directional_derivative(f, d, gamma);

    if slope(1.0) >= 0.0 {
        return 1.0;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..LINE_SEARCH_STEPS {
        let mid = 0.5 * (lo + hi);
        if slope(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
