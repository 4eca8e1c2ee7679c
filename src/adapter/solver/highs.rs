//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear programming solver. This
//! implementation wraps it using the good_lp crate for ergonomic Rust usage
//! and answers the Frank-Wolfe oracle's vertex queries.

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel,
};
use tracing::trace;

use crate::domain::ConstraintSense;
use crate::error::SolverError;
use crate::port::outbound::solver::{LpProblem, LpSolution, SolutionStatus, Solver};

/// HiGHS-based LP solver.
#[derive(Debug, Default, Clone)]
pub struct HiGHSSolver;

impl HiGHSSolver {
    /// Create a new HiGHS solver instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Solver for HiGHSSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        let n = problem.num_vars();

        if n == 0 {
            return Ok(LpSolution {
                values: vec![],
                objective: 0.0,
                status: SolutionStatus::Optimal,
            });
        }

        let mut vars = variables!();
        let mut var_list = Vec::with_capacity(n);

        for bounds in &problem.bounds {
            let mut v = variable();
            if let Some(lb) = bounds.lower {
                v = v.min(lb);
            }
            if let Some(ub) = bounds.upper {
                v = v.max(ub);
            }
            var_list.push(vars.add(v));
        }

        let objective: Expression = var_list
            .iter()
            .zip(&problem.objective)
            .map(|(v, &c)| c * *v)
            .sum();

        let mut model = vars.minimise(&objective).using(highs);

        for constr in &problem.constraints {
            let lhs: Expression = var_list
                .iter()
                .zip(&constr.coefficients)
                .map(|(v, &c)| c * *v)
                .sum();
            let rhs = constr.rhs;

            model = match constr.sense {
                ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
                ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
                ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
            };
        }

        match model.solve() {
            Ok(solution) => {
                let values: Vec<f64> = var_list.iter().map(|v| solution.value(*v)).collect();
                let objective = values
                    .iter()
                    .zip(&problem.objective)
                    .map(|(x, c)| x * c)
                    .sum();
                trace!(vars = n, objective, "highs solved");

                Ok(LpSolution {
                    values,
                    objective,
                    status: SolutionStatus::Optimal,
                })
            }
            Err(ResolutionError::Infeasible) => Ok(unsolved(n, SolutionStatus::Infeasible)),
            Err(ResolutionError::Unbounded) => Ok(unsolved(n, SolutionStatus::Unbounded)),
            Err(other) => Err(SolverError::Backend(other.to_string())),
        }
    }
}

fn unsolved(n: usize, status: SolutionStatus) -> LpSolution {
    LpSolution {
        values: vec![0.0; n],
        objective: 0.0,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, VariableBounds};

    #[test]
    fn test_solver_name() {
        assert_eq!(HiGHSSolver::new().name(), "highs");
    }

    #[test]
    fn test_simple_lp() {
        // Minimize: x + y
        // Subject to: x + y >= 1
        //            x, y >= 0
        let problem = LpProblem {
            objective: vec![1.0, 1.0],
            constraints: vec![Constraint::geq(vec![1.0, 1.0], 1.0)],
            bounds: vec![VariableBounds::non_negative(); 2],
        };

        let solution = HiGHSSolver::new().solve_lp(&problem).unwrap();

        assert!(solution.is_optimal());
        let sum: f64 = solution.values.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "Sum should be ~1, got {sum}");
    }

    #[test]
    fn test_sizing_vertex() {
        // Maximize 3a + 2b + c under a 0.05 box, 0.08 budget and a shared
        // event cap of 0.06 on a and b.
        let mut problem = LpProblem::new(3).with_objective(vec![-3.0, -2.0, -1.0]);
        problem.bounds = vec![VariableBounds::bounded(0.0, 0.05); 3];
        problem.constraints = vec![
            Constraint::leq(vec![1.0, 1.0, 1.0], 0.08),
            Constraint::subset_leq(3, &[0, 1], 0.06),
        ];

        let solution = HiGHSSolver::new().solve_lp(&problem).unwrap();

        assert!(solution.is_optimal());
        assert!((solution.values[0] - 0.05).abs() < 1e-6);
        assert!((solution.values[1] - 0.01).abs() < 1e-6);
        assert!((solution.values[2] - 0.02).abs() < 1e-6);
        assert!(problem.is_feasible(&solution.values, 1e-6));
    }

    #[test]
    fn test_equality_constraint() {
        // Minimize: x
        // Subject to: x + y = 2
        let problem = LpProblem {
            objective: vec![1.0, 0.0],
            constraints: vec![Constraint::eq(vec![1.0, 1.0], 2.0)],
            bounds: vec![VariableBounds::non_negative(); 2],
        };

        let solution = HiGHSSolver::new().solve_lp(&problem).unwrap();

        assert!(solution.is_optimal());
        assert!(solution.values[0].abs() < 1e-6);
        assert!((solution.values[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_reports_status() {
        let problem = LpProblem {
            objective: vec![1.0],
            constraints: vec![Constraint::geq(vec![1.0], 2.0)],
            bounds: vec![VariableBounds::bounded(0.0, 1.0)],
        };

        let solution = HiGHSSolver::new().solve_lp(&problem).unwrap();

        assert!(!solution.is_optimal());
    }

    #[test]
    fn test_empty_problem() {
        let solution = HiGHSSolver::new().solve_lp(&LpProblem::new(0)).unwrap();
        assert!(solution.is_optimal());
        assert!(solution.values.is_empty());
    }
}
