//! Sizing and valuation reports produced by the optimizer.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::BetId;

/// Capital assigned to a single bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    /// Fraction of bankroll in [0, max_single_bet].
    pub fraction: f64,
    /// `fraction * bankroll`, rounded to cents.
    pub stake: Decimal,
}

/// Which path produced an [`AllocationPlan`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SizingMethod {
    /// Nothing passed the value filter.
    NoCandidates,
    /// Risk-penalized growth maximization over the full constraint set.
    Convex {
        /// Frank-Wolfe iterations executed.
        iterations: usize,
        /// Whether the duality gap fell below tolerance.
        converged: bool,
    },
    /// Independent fractional Kelly; ignores covariance.
    FractionalKelly {
        /// Why the convex path was not used.
        reason: String,
    },
}

impl SizingMethod {
    /// Returns true for the degraded fallback path.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::FractionalKelly { .. })
    }
}

/// Result of one optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    /// Non-negligible allocations keyed by bet.
    pub allocations: BTreeMap<BetId, Allocation>,
    /// How the allocations were computed.
    pub method: SizingMethod,
    /// Bets that passed the value filter and entered sizing.
    pub candidates: Vec<BetId>,
}

impl AllocationPlan {
    /// An empty plan for when no bet passes the filter.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            allocations: BTreeMap::new(),
            method: SizingMethod::NoCandidates,
            candidates: Vec::new(),
        }
    }

    /// Fraction allocated to `bet_id`, zero when absent.
    #[must_use]
    pub fn fraction(&self, bet_id: &BetId) -> f64 {
        self.allocations.get(bet_id).map_or(0.0, |a| a.fraction)
    }

    /// Sum of all allocated fractions.
    #[must_use]
    pub fn total_fraction(&self) -> f64 {
        self.allocations.values().map(|a| a.fraction).sum()
    }

    /// Sum of all stakes.
    #[must_use]
    pub fn total_stake(&self) -> Decimal {
        self.allocations.values().map(|a| a.stake).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

/// Whether a valuation clears the minimum edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Bet,
    Pass,
}

/// Valuation of a parlay (or same-game parlay) leg set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParlayValuation {
    pub leg_ids: Vec<BetId>,
    /// Joint probability via the chain rule.
    pub true_probability: f64,
    /// Product of marginals, for comparison only.
    pub naive_probability: f64,
    /// `true_probability - naive_probability`.
    pub correlation_adjustment: f64,
    /// Product of leg decimal odds.
    pub parlay_odds: f64,
    pub market_implied_prob: f64,
    pub edge: f64,
    pub expected_value: f64,
    pub is_value: bool,
    pub recommendation: Recommendation,
}
