//! Solver port for the linear minimization oracle.
//!
//! The growth optimizer never solves its concave program in one shot. Each
//! Frank-Wolfe iteration instead asks a linear programming backend for the
//! vertex of the feasible polytope that minimizes the current gradient.
//!
//! # Overview
//!
//! - [`Solver`]: Core LP solver interface
//! - [`LpProblem`]: Problem definition
//! - [`LpSolution`]: Solution representation

use crate::domain::{Constraint, VariableBounds};
use crate::error::SolverError;

/// Linear programming solver.
///
/// Implementations wrap specific solver backends (HiGHS, GLPK, etc.) and
/// provide a unified interface for the sizing oracle.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) so an optimizer can be
/// shared across sizing requests.
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Solve a linear programming problem.
    ///
    /// Minimizes the objective function `c * x` subject to the constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails internally. Infeasible or
    /// unbounded problems are reported through [`LpSolution::status`].
    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution, SolverError>;
}

/// Linear programming problem definition.
///
/// Represents a minimization problem of the form:
///
/// ```text
/// minimize    c^T * x
/// subject to  constraints
///             bounds on x
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Objective function coefficients.
    pub objective: Vec<f64>,

    /// Linear constraints on the variables.
    pub constraints: Vec<Constraint>,

    /// Lower and upper bounds for each variable.
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// Create a new LP problem with the specified number of variables.
    ///
    /// Initializes all objective coefficients to zero and all variables to
    /// non-negative.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            objective: vec![0.0; num_vars],
            constraints: Vec::new(),
            bounds: vec![VariableBounds::default(); num_vars],
        }
    }

    /// Return the number of decision variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Same feasible region with a different objective.
    #[must_use]
    pub fn with_objective(&self, objective: Vec<f64>) -> Self {
        Self {
            objective,
            constraints: self.constraints.clone(),
            bounds: self.bounds.clone(),
        }
    }

    /// Whether `x` satisfies every bound and constraint within `tolerance`.
    #[must_use]
    pub fn is_feasible(&self, x: &[f64], tolerance: f64) -> bool {
        x.len() == self.num_vars()
            && self.bounds.iter().zip(x).all(|(b, &v)| {
                b.lower.map_or(true, |lb| v >= lb - tolerance)
                    && b.upper.map_or(true, |ub| v <= ub + tolerance)
            })
            && self.constraints.iter().all(|c| c.is_satisfied(x, tolerance))
    }
}

/// Solution to a linear programming problem.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Optimal values for each decision variable.
    pub values: Vec<f64>,

    /// Optimal objective function value.
    pub objective: f64,

    /// Termination status of the solver.
    pub status: SolutionStatus,
}

impl LpSolution {
    /// Return `true` if the solver found an optimal solution.
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Termination status of an optimization solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Solver found a globally optimal solution.
    Optimal,

    /// No feasible solution exists.
    Infeasible,

    /// Objective function is unbounded.
    Unbounded,

    /// Solver encountered an internal error.
    Error,
}
