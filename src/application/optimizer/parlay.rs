//! Parlay valuation under conditional dependence.

use std::collections::BTreeSet;

use tracing::debug;

use crate::application::graph::DependencyGraph;
use crate::domain::{BetId, DomainError, ParlayValuation, Recommendation};
use crate::error::{GraphError, Result};

/// Value the parlay formed by `leg_ids`.
///
/// The true probability uses the chain rule over the graph; the naive
/// probability multiplies marginals as if the legs were independent.
/// Repeated legs count once.
///
/// # Errors
///
/// Returns [`DomainError::EmptyLegs`] for an empty leg list and
/// [`GraphError::UnknownBet`] for a leg not in the graph.
pub fn value_parlay(
    graph: &DependencyGraph,
    leg_ids: &[BetId],
    min_edge: f64,
) -> Result<ParlayValuation> {
    if leg_ids.is_empty() {
        return Err(DomainError::EmptyLegs.into());
    }

    let mut seen = BTreeSet::new();
    let mut legs = Vec::with_capacity(leg_ids.len());
    for id in leg_ids {
        let bet = graph.bet(id).ok_or_else(|| GraphError::UnknownBet {
            bet_id: id.clone(),
        })?;
        if seen.insert(id) {
            legs.push(bet);
        }
    }
    let unique: Vec<BetId> = legs.iter().map(|b| b.id().clone()).collect();

    let true_probability = graph.joint_probability(&unique)?;
    let naive_probability: f64 = legs.iter().map(|b| b.marginal_prob()).product();
    let parlay_odds: f64 = legs.iter().map(|b| b.decimal_odds()).product();
    let market_implied_prob = 1.0 / parlay_odds;
    let edge = true_probability - market_implied_prob;
    let expected_value = true_probability * (parlay_odds - 1.0) - (1.0 - true_probability);
    let is_value = edge > min_edge;

    debug!(
        legs = unique.len(),
        true_probability,
        naive_probability,
        parlay_odds,
        edge,
        "parlay valued"
    );

    Ok(ParlayValuation {
        leg_ids: unique,
        true_probability,
        naive_probability,
        correlation_adjustment: true_probability - naive_probability,
        parlay_odds,
        market_implied_prob,
        edge,
        expected_value,
        is_value,
        recommendation: if is_value {
            Recommendation::Bet
        } else {
            Recommendation::Pass
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::domain::{bet, bet_ids, conditional, graph_of};

    #[test]
    fn independent_legs() {
        let graph = graph_of([bet("a", "g1", 1.9, 0.55), bet("b", "g2", 1.8, 0.60)]);

        let v = value_parlay(&graph, &bet_ids(&["a", "b"]), 0.02).unwrap();

        assert!((v.true_probability - 0.33).abs() < 1e-12);
        assert_eq!(v.correlation_adjustment, 0.0);
        assert!((v.parlay_odds - 3.42).abs() < 1e-12);
        assert!((v.market_implied_prob - 1.0 / 3.42).abs() < 1e-12);
        assert!((v.edge - (0.33 - 1.0 / 3.42)).abs() < 1e-12);
        assert!(v.is_value);
        assert_eq!(v.recommendation, Recommendation::Bet);
    }

    #[test]
    fn positive_correlation_raises_joint() {
        let mut graph = graph_of([bet("f5", "g1", 1.9, 0.52), bet("fg", "g1", 1.8, 0.56)]);
        graph
            .add_relationship(conditional("f5", "fg", 0.78, 0.30, 0.85))
            .unwrap();

        let v = value_parlay(&graph, &bet_ids(&["fg", "f5"]), 0.02).unwrap();

        let expected = 0.52 * (0.85 * 0.78 + 0.15 * 0.56);
        assert!((v.true_probability - expected).abs() < 1e-12);
        assert!(v.correlation_adjustment > 0.0);
        assert_eq!(v.leg_ids, bet_ids(&["fg", "f5"]));
    }

    #[test]
    fn thin_edge_passes() {
        let graph = graph_of([bet("a", "g1", 2.0, 0.51)]);
        let v = value_parlay(&graph, &bet_ids(&["a"]), 0.02).unwrap();
        assert!(!v.is_value);
        assert_eq!(v.recommendation, Recommendation::Pass);
    }

    #[test]
    fn empty_legs_rejected() {
        let graph = DependencyGraph::new();
        assert!(matches!(
            value_parlay(&graph, &[], 0.02),
            Err(Error::Domain(DomainError::EmptyLegs))
        ));
    }

    #[test]
    fn unknown_leg_rejected() {
        let graph = graph_of([bet("a", "g1", 2.0, 0.5)]);
        assert!(matches!(
            value_parlay(&graph, &bet_ids(&["a", "zz"]), 0.02),
            Err(Error::Graph(GraphError::UnknownBet { .. }))
        ));
    }
}
