//! In-process LP oracle for tests that should not depend on HiGHS.

use crate::domain::ConstraintSense;
use crate::error::SolverError;
use crate::port::outbound::solver::{LpProblem, LpSolution, SolutionStatus, Solver};

/// Greedy vertex finder for sizing-shaped problems.
///
/// Fills variables in order of most negative objective coefficient, each up to
/// its upper bound or the remaining slack of any `<=` constraint it appears
/// in. Exact for box bounds plus one unit-coefficient budget, which is what
/// most tests build; a feasible vertex otherwise. Lower bounds are taken as 0
/// and `>=`/`=` constraints are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        let n = problem.num_vars();
        let mut order: Vec<usize> = (0..n).filter(|&i| problem.objective[i] < 0.0).collect();
        order.sort_by(|&a, &b| problem.objective[a].total_cmp(&problem.objective[b]));

        let mut values = vec![0.0; n];
        for i in order {
            let mut room = problem.bounds[i].upper.unwrap_or(f64::INFINITY);
            for constraint in &problem.constraints {
                let coefficient = constraint.coefficients[i];
                if constraint.sense == ConstraintSense::LessEqual && coefficient > 0.0 {
                    let slack = constraint.rhs - constraint.lhs(&values);
                    room = room.min(slack / coefficient);
                }
            }
            if !room.is_finite() {
                return Ok(LpSolution {
                    values: vec![0.0; n],
                    objective: f64::NEG_INFINITY,
                    status: SolutionStatus::Unbounded,
                });
            }
            values[i] = room.max(0.0);
        }

        let objective = problem.objective.iter().zip(&values).map(|(c, x)| c * x).sum();
        Ok(LpSolution {
            values,
            objective,
            status: SolutionStatus::Optimal,
        })
    }
}

/// Oracle that always reports the configured status.
#[derive(Debug, Clone, Copy)]
pub struct StatusSolver(pub SolutionStatus);

impl Solver for StatusSolver {
    fn name(&self) -> &'static str {
        "status"
    }

    fn solve_lp(&self, problem: &LpProblem) -> Result<LpSolution, SolverError> {
        Ok(LpSolution {
            values: vec![0.0; problem.num_vars()],
            objective: 0.0,
            status: self.0,
        })
    }
}

/// Oracle whose backend always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenSolver;

impl Solver for BrokenSolver {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn solve_lp(&self, _problem: &LpProblem) -> Result<LpSolution, SolverError> {
        Err(SolverError::Backend("backend unavailable".into()))
    }
}
