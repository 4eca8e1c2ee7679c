//! Portfolio sizing over a dependency graph.
//!
//! [`PortfolioOptimizer::optimize`] selects the open bets whose edge clears
//! the configured minimum, then sizes them by maximizing risk-penalized log
//! growth under single-bet, total and per-event exposure caps. The convex
//! problem is solved by [`FrankWolfe`] against the [`Solver`] port; if no
//! backend is configured or the solve fails for any reason, sizing degrades
//! to independent [fractional Kelly](kelly::fractional_kelly).

pub mod frank_wolfe;
pub mod growth;
pub mod kelly;
pub mod parlay;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::application::graph::DependencyGraph;
use crate::domain::covariance::DEFAULT_RIDGE;
use crate::domain::limits::MIN_ALLOCATION;
use crate::domain::{
    Allocation, AllocationPlan, Bet, BetId, Constraint, CovarianceMatrix, DomainError, EventId,
    ParlayValuation, RiskLimits, SizingMethod, VariableBounds,
};
use crate::error::{GraphError, Result, SolverError};
use crate::port::outbound::solver::{LpProblem, Solver};

pub use frank_wolfe::{FrankWolfe, FrankWolfeConfig, FrankWolfeResult};
pub use growth::GrowthObjective;

/// Sizes bets and values parlays under a fixed set of [`RiskLimits`].
#[derive(Clone)]
pub struct PortfolioOptimizer {
    limits: RiskLimits,
    solver: Option<Arc<dyn Solver>>,
    frank_wolfe: FrankWolfe,
}

impl fmt::Debug for PortfolioOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortfolioOptimizer")
            .field("limits", &self.limits)
            .field("solver", &self.solver.as_ref().map(|s| s.name()))
            .field("frank_wolfe", self.frank_wolfe.config())
            .finish()
    }
}

impl PortfolioOptimizer {
    /// An optimizer with no solver backend; every sizing run uses the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLimit`] if any limit is out of range.
    pub fn try_new(limits: RiskLimits) -> std::result::Result<Self, DomainError> {
        limits.validate()?;
        Ok(Self {
            limits,
            solver: None,
            frank_wolfe: FrankWolfe::new(FrankWolfeConfig::default()),
        })
    }

    /// Use `solver` as the linear oracle for the convex path.
    #[must_use]
    pub fn with_solver(mut self, solver: Arc<dyn Solver>) -> Self {
        self.solver = Some(solver);
        self
    }

    #[must_use]
    pub fn with_frank_wolfe(mut self, config: FrankWolfeConfig) -> Self {
        self.frank_wolfe = FrankWolfe::new(config);
        self
    }

    #[must_use]
    pub const fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Name of the configured backend, if any.
    #[must_use]
    pub fn solver_name(&self) -> Option<&'static str> {
        self.solver.as_ref().map(|s| s.name())
    }

    /// Size the open value bets in `graph`, or only those in `bet_ids`.
    ///
    /// Settled and void bets never receive an allocation. The returned plan
    /// always satisfies the single-bet and total caps. The per-event cap holds
    /// on the convex path only; the fractional-Kelly fallback sizes each bet
    /// independently. Solver failures are absorbed by the fallback and
    /// reported in [`AllocationPlan::method`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownBet`] if `bet_ids` names a bet not in the
    /// graph.
    pub fn optimize(
        &self,
        graph: &DependencyGraph,
        bet_ids: Option<&[BetId]>,
    ) -> Result<AllocationPlan> {
        let candidates = self.candidates(graph, bet_ids)?;
        if candidates.is_empty() {
            info!(min_edge = self.limits.min_edge, "no bets passed the value filter");
            return Ok(AllocationPlan::empty());
        }

        let ids: Vec<BetId> = candidates.iter().map(|b| b.id().clone()).collect();
        let covariance = graph.covariance_matrix(&ids)?.psd_corrected(DEFAULT_RIDGE);

        let (mut fractions, method) = match self.solve_convex(&candidates, covariance) {
            Ok(result) => {
                debug!(
                    iterations = result.iterations,
                    gap = result.gap,
                    converged = result.converged,
                    "convex sizing finished"
                );
                let method = SizingMethod::Convex {
                    iterations: result.iterations,
                    converged: result.converged,
                };
                (result.fractions, method)
            }
            Err(error) => {
                warn!(error = %error, "convex sizing failed, falling back to fractional Kelly");
                let fractions = kelly::fractional_kelly(&candidates, &self.limits);
                let method = SizingMethod::FractionalKelly {
                    reason: error.to_string(),
                };
                (fractions, method)
            }
        };

        if !method.is_fallback() {
            self.enforce_limits(&candidates, &mut fractions);
        }

        let plan = self.build_plan(&candidates, &fractions, method);
        info!(
            candidates = plan.candidates.len(),
            allocated = plan.allocations.len(),
            total_fraction = plan.total_fraction(),
            fallback = plan.method.is_fallback(),
            "sizing complete"
        );
        Ok(plan)
    }

    /// Value the parlay formed by `leg_ids` against this optimizer's minimum edge.
    ///
    /// # Errors
    ///
    /// See [`parlay::value_parlay`].
    pub fn compute_parlay_value(
        &self,
        graph: &DependencyGraph,
        leg_ids: &[BetId],
    ) -> Result<ParlayValuation> {
        parlay::value_parlay(graph, leg_ids, self.limits.min_edge)
    }

    /// Open bets with enough edge, in id order (or caller order for a subset).
    fn candidates<'g>(
        &self,
        graph: &'g DependencyGraph,
        bet_ids: Option<&[BetId]>,
    ) -> std::result::Result<Vec<&'g Bet>, GraphError> {
        let pool: Vec<&Bet> = match bet_ids {
            Some(ids) => {
                let mut seen = BTreeSet::new();
                let mut pool = Vec::with_capacity(ids.len());
                for id in ids {
                    let bet = graph.bet(id).ok_or_else(|| GraphError::UnknownBet {
                        bet_id: id.clone(),
                    })?;
                    if seen.insert(id) {
                        pool.push(bet);
                    }
                }
                pool
            }
            None => graph.bets().collect(),
        };

        Ok(pool
            .into_iter()
            .filter(|bet| !bet.is_settled() && !bet.is_void())
            .filter(|bet| bet.is_value(self.limits.min_edge))
            .collect())
    }

    fn solve_convex(
        &self,
        bets: &[&Bet],
        covariance: CovarianceMatrix,
    ) -> std::result::Result<FrankWolfeResult, SolverError> {
        let solver = self.solver.as_deref().ok_or(SolverError::Unavailable)?;

        let objective = GrowthObjective::new(
            bets.iter().map(|b| b.effective_prob()).collect(),
            bets.iter().map(|b| b.net_odds()).collect(),
            covariance,
            self.limits.risk_aversion,
        );
        let region = self.feasible_region(bets);

        debug!(
            solver = solver.name(),
            bets = bets.len(),
            constraints = region.constraints.len(),
            "starting convex sizing"
        );
        self.frank_wolfe.maximize(&objective, &region, solver)
    }

    /// Box bounds, the total cap and one cap per multi-bet event.
    fn feasible_region(&self, bets: &[&Bet]) -> LpProblem {
        let n = bets.len();
        let mut region = LpProblem::new(n);
        region.bounds = vec![VariableBounds::bounded(0.0, self.limits.single_cap()); n];
        region
            .constraints
            .push(Constraint::leq(vec![1.0; n], self.limits.max_exposure));

        for indices in event_groups(bets).values().filter(|g| g.len() > 1) {
            region
                .constraints
                .push(Constraint::subset_leq(n, indices, self.limits.event_cap()));
        }
        region
    }

    /// Clamp and scale so that every cap holds exactly.
    fn enforce_limits(&self, bets: &[&Bet], fractions: &mut [f64]) {
        let cap = self.limits.single_cap();
        for f in fractions.iter_mut() {
            *f = f.clamp(0.0, cap);
        }

        let event_cap = self.limits.event_cap();
        for indices in event_groups(bets).values().filter(|g| g.len() > 1) {
            let sum: f64 = indices.iter().map(|&i| fractions[i]).sum();
            if sum > event_cap {
                let scale = event_cap / sum;
                for &i in indices {
                    fractions[i] *= scale;
                }
            }
        }

        let total: f64 = fractions.iter().sum();
        if total > self.limits.max_exposure {
            let scale = self.limits.max_exposure / total;
            for f in fractions.iter_mut() {
                *f *= scale;
            }
        }
    }

    fn build_plan(&self, bets: &[&Bet], fractions: &[f64], method: SizingMethod) -> AllocationPlan {
        let allocations = bets
            .iter()
            .zip(fractions)
            .filter(|(_, f)| **f > MIN_ALLOCATION)
            .map(|(bet, &fraction)| {
                let stake = (Decimal::from_f64_retain(fraction).unwrap_or_default()
                    * self.limits.bankroll)
                    .round_dp(2);
                (bet.id().clone(), Allocation { fraction, stake })
            })
            .collect();

        AllocationPlan {
            allocations,
            method,
            candidates: bets.iter().map(|b| b.id().clone()).collect(),
        }
    }
}

/// Candidate indices grouped by event.
fn event_groups(bets: &[&Bet]) -> BTreeMap<EventId, Vec<usize>> {
    let mut groups: BTreeMap<EventId, Vec<usize>> = BTreeMap::new();
    for (i, bet) in bets.iter().enumerate() {
        groups.entry(bet.event_id().clone()).or_default().push(i);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::solver::SolutionStatus;
    use crate::testkit::domain::{bet, bet_id, bet_ids, graph_of, trusted_bet};
    use crate::testkit::solver::{BrokenSolver, GreedySolver, StatusSolver};

    fn limits() -> RiskLimits {
        RiskLimits::default()
    }

    fn with_greedy(limits: RiskLimits) -> PortfolioOptimizer {
        PortfolioOptimizer::try_new(limits).unwrap().with_solver(Arc::new(GreedySolver))
    }

    #[test]
    fn no_value_bets_yields_empty_plan() {
        let graph = graph_of([bet("a", "g1", 1.9, 0.5), bet("b", "g2", 2.0, 0.51)]);
        let plan = with_greedy(limits()).optimize(&graph, None).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.method, SizingMethod::NoCandidates);
    }

    #[test]
    fn settled_and_void_bets_are_excluded() {
        let mut graph = graph_of([bet("a", "g1", 2.0, 0.6), bet("b", "g2", 2.0, 0.6)]);
        graph.propagate_outcome(&bet_id("a"), true).unwrap();

        let plan = with_greedy(limits()).optimize(&graph, None).unwrap();

        assert_eq!(plan.candidates, bet_ids(&["b"]));
        assert_eq!(plan.fraction(&bet_id("a")), 0.0);
    }

    #[test]
    fn single_bet_matches_kelly_under_loose_caps() {
        let graph = graph_of([bet("a", "g1", 2.0, 0.6)]);
        let limits = RiskLimits {
            max_single_bet: 0.25,
            max_exposure: 0.25,
            risk_aversion: 1e-9,
            ..limits()
        };

        let plan = with_greedy(limits).optimize(&graph, None).unwrap();

        assert!(matches!(plan.method, SizingMethod::Convex { converged: true, .. }));
        assert!((plan.fraction(&bet_id("a")) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn symmetric_bets_share_the_budget() {
        let graph = graph_of([
            bet("a", "g1", 2.0, 0.6),
            bet("b", "g2", 2.0, 0.6),
            bet("c", "g3", 2.0, 0.6),
        ]);
        let plan = with_greedy(limits()).optimize(&graph, None).unwrap();

        for id in ["a", "b", "c"] {
            assert!(plan.fraction(&bet_id(id)) <= 0.05 + 1e-12);
        }
        assert!(plan.total_fraction() <= 0.25 + 1e-12);
        assert!(plan.fraction(&bet_id("a")) > 0.0);
    }

    #[test]
    fn event_cap_binds() {
        let graph = graph_of([
            bet("a", "g1", 2.0, 0.7),
            bet("b", "g1", 2.0, 0.7),
            bet("c", "g1", 2.0, 0.7),
        ]);

        let plan = with_greedy(limits()).optimize(&graph, None).unwrap();

        assert!(plan.total_fraction() <= 0.06 + 1e-9);
    }

    #[test]
    fn missing_solver_falls_back_to_fractional_kelly() {
        let graph = graph_of([trusted_bet("a", "g1", 2.0, 0.6, 0.8)]);
        let limits = RiskLimits {
            max_single_bet: 0.25,
            ..limits()
        };

        let plan = PortfolioOptimizer::try_new(limits)
            .unwrap()
            .optimize(&graph, None)
            .unwrap();

        assert!(plan.method.is_fallback());
        assert!((plan.fraction(&bet_id("a")) - 0.2 * 0.5 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn solver_failures_fall_back() {
        let graph = graph_of([bet("a", "g1", 2.0, 0.6)]);

        let broken = PortfolioOptimizer::try_new(limits())
            .unwrap()
            .with_solver(Arc::new(BrokenSolver));
        let plan = broken.optimize(&graph, None).unwrap();
        assert!(plan.method.is_fallback());

        let infeasible = PortfolioOptimizer::try_new(limits())
            .unwrap()
            .with_solver(Arc::new(StatusSolver(SolutionStatus::Infeasible)));
        let plan = infeasible.optimize(&graph, None).unwrap();
        match plan.method {
            SizingMethod::FractionalKelly { reason } => assert!(reason.contains("Infeasible")),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn subset_restricts_candidates() {
        let graph = graph_of([bet("a", "g1", 2.0, 0.6), bet("b", "g2", 2.0, 0.6)]);
        let plan = with_greedy(limits())
            .optimize(&graph, Some(&bet_ids(&["b", "b"])))
            .unwrap();
        assert_eq!(plan.candidates, bet_ids(&["b"]));
    }

    #[test]
    fn subset_with_unknown_bet_is_an_error() {
        let graph = graph_of([bet("a", "g1", 2.0, 0.6)]);
        let err = with_greedy(limits())
            .optimize(&graph, Some(&bet_ids(&["nope"])))
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Graph(GraphError::UnknownBet { .. })));
    }

    #[test]
    fn stakes_follow_bankroll() {
        let graph = graph_of([bet("a", "g1", 2.0, 0.6)]);
        let plan = with_greedy(limits()).optimize(&graph, None).unwrap();
        let allocation = &plan.allocations[&bet_id("a")];
        assert_eq!(allocation.stake, Decimal::new(500, 0));
        assert_eq!(allocation.fraction, 0.05);
    }

    #[test]
    fn enforce_limits_scales_event_then_total() {
        let a = bet("a", "g1", 2.0, 0.6);
        let b = bet("b", "g1", 2.0, 0.6);
        let c = bet("c", "g2", 2.0, 0.6);
        let optimizer = PortfolioOptimizer::try_new(RiskLimits {
            max_exposure: 0.08,
            ..limits()
        })
        .unwrap();
        let mut fractions = vec![0.05, 0.05, 0.5];

        optimizer.enforce_limits(&[&a, &b, &c], &mut fractions);

        assert!((fractions[0] + fractions[1] - 0.06 * 0.08 / 0.11).abs() < 1e-12);
        assert!(fractions.iter().sum::<f64>() <= 0.08 + 1e-12);
    }

    #[test]
    fn fallback_honors_single_and_total_caps_but_not_event_cap() {
        let graph = graph_of([
            bet("a", "g1", 2.0, 0.7),
            bet("b", "g1", 2.0, 0.7),
            bet("c", "g1", 2.0, 0.7),
        ]);
        let limits = limits();

        let plan = PortfolioOptimizer::try_new(limits.clone())
            .unwrap()
            .optimize(&graph, None)
            .unwrap();

        assert!(plan.method.is_fallback());
        for id in ["a", "b", "c"] {
            assert!((plan.fraction(&bet_id(id)) - limits.single_cap()).abs() < 1e-12);
        }
        assert!(plan.total_fraction() <= limits.max_exposure + 1e-12);
        assert!(plan.total_fraction() > limits.event_cap());
    }

    #[test]
    fn rejects_out_of_range_limits() {
        let err = PortfolioOptimizer::try_new(RiskLimits {
            max_exposure: -0.5,
            ..limits()
        })
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidLimit {
                field: "max_exposure",
                reason: "must be in (0, 1]",
            }
        );
    }
}
