//! Joint probabilities and the conditional covariance matrix.

use std::collections::HashSet;

use nalgebra::DMatrix;
use tracing::warn;

use super::DependencyGraph;
use crate::domain::{Bet, BetId, CovarianceMatrix};
use crate::error::GraphError;

/// Correlation assumed between unrelated bets on the same event.
pub const SAME_EVENT_CORRELATION: f64 = 0.25;

impl DependencyGraph {
    /// P(all of `bet_ids` win) by the chain rule.
    ///
    /// Bets are visited ancestors first. Each starts from its marginal and,
    /// for every parent already assumed to have won, is blended toward
    /// P(child | parent wins) by the edge trust. Repeated ids count once; an
    /// empty set has probability 1.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownBet`] if any id is not in the graph.
    pub fn joint_probability(&self, bet_ids: &[BetId]) -> Result<f64, GraphError> {
        let ids = self.resolve_unique(bet_ids)?;

        match ids.as_slice() {
            [] => return Ok(1.0),
            [single] => return self.require(single).map(|b| b.effective_prob()),
            _ => {}
        }

        let ordered = self.topological_order(&ids).unwrap_or_else(|| {
            warn!(count = ids.len(), "no topological order for joint probability, using given order");
            ids.clone()
        });

        let mut assumed_won: HashSet<&BetId> = HashSet::with_capacity(ordered.len());
        let mut joint = 1.0;
        for bet_id in &ordered {
            let bet = self.require(bet_id)?;
            let mut prob = bet.marginal_prob();
            for parent_id in bet.parent_ids() {
                if !assumed_won.contains(parent_id) {
                    continue;
                }
                if let Some(rel) = self.relationship(parent_id, bet_id) {
                    if let Some(conditional) = rel.conditional_prob(true) {
                        prob = rel.blend(conditional, prob);
                    }
                }
            }
            joint *= prob;
            assumed_won.insert(bet_id);
        }

        Ok(joint)
    }

    /// Covariance of the win indicators of `bet_ids`, in the given order.
    ///
    /// - diagonal: `p (1 - p)` from the effective probability
    /// - direct edge i -> j: `p_i (P(j | i wins) - p_j) trust`
    /// - same event, no edge: `sqrt(v_i v_j)` times [`SAME_EVENT_CORRELATION`]
    /// - otherwise 0
    ///
    /// The raw matrix need not be positive semi-definite; see
    /// [`CovarianceMatrix::psd_corrected`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownBet`] if any id is not in the graph.
    pub fn covariance_matrix(&self, bet_ids: &[BetId]) -> Result<CovarianceMatrix, GraphError> {
        let ids = self.resolve_unique(bet_ids)?;
        let bets = ids
            .iter()
            .map(|id| self.require(id))
            .collect::<Result<Vec<_>, _>>()?;
        let n = bets.len();

        let variance: Vec<f64> = bets
            .iter()
            .map(|b| {
                let p = b.effective_prob();
                p * (1.0 - p)
            })
            .collect();

        let mut matrix = DMatrix::zeros(n, n);
        for i in 0..n {
            matrix[(i, i)] = variance[i];
            for j in (i + 1)..n {
                let cov = self.pair_covariance(i, j, &bets, &variance);
                matrix[(i, j)] = cov;
                matrix[(j, i)] = cov;
            }
        }

        Ok(CovarianceMatrix::new(ids, matrix))
    }

    fn pair_covariance(
        &self,
        i: usize,
        j: usize,
        bets: &[&Bet],
        variance: &[f64],
    ) -> f64 {
        let (a, b) = (bets[i], bets[j]);
        let edge = self
            .relationship(a.id(), b.id())
            .map(|rel| (rel, a, b))
            .or_else(|| self.relationship(b.id(), a.id()).map(|rel| (rel, b, a)));

        if let Some((rel, parent, child)) = edge {
            let p_parent = parent.effective_prob();
            let p_child = child.effective_prob();
            let conditional = rel.conditional_prob(true).unwrap_or(p_child);
            return p_parent * (conditional - p_child) * rel.trust_score();
        }

        if a.event_id() == b.event_id() {
            return (variance[i] * variance[j]).sqrt() * SAME_EVENT_CORRELATION;
        }

        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyType, EventId, Relationship};

    fn bet(id: &str, event: &str, prob: f64) -> Bet {
        Bet::try_new(BetId::from(id), EventId::from(event), "m", "s", 2.0, prob).unwrap()
    }

    fn id(s: &str) -> BetId {
        BetId::from(s)
    }

    fn ids(names: &[&str]) -> Vec<BetId> {
        names.iter().map(|n| id(n)).collect()
    }

    fn conditional(parent: &str, child: &str, win: f64, trust: f64) -> Relationship {
        Relationship::try_new(
            id(parent),
            id(child),
            DependencyType::ProbabilityConditional,
            Some(win),
            None,
            trust,
        )
        .unwrap()
    }

    #[test]
    fn empty_and_singleton() {
        let mut g = DependencyGraph::new();
        g.add_bet(bet("a", "g1", 0.55));
        assert_eq!(g.joint_probability(&[]).unwrap(), 1.0);
        assert_eq!(g.joint_probability(&ids(&["a"])).unwrap(), 0.55);
    }

    #[test]
    fn independent_legs_multiply() {
        let mut g = DependencyGraph::new();
        g.add_bet(bet("a", "g1", 0.55));
        g.add_bet(bet("b", "g2", 0.60));
        let joint = g.joint_probability(&ids(&["a", "b"])).unwrap();
        assert!((joint - 0.33).abs() < 1e-12);
    }

    #[test]
    fn chain_rule_with_full_trust() {
        let mut g = DependencyGraph::new();
        g.add_bet(bet("a", "g1", 0.5));
        g.add_bet(bet("b", "g1", 0.4));
        g.add_relationship(conditional("a", "b", 0.7, 1.0)).unwrap();

        // Caller order does not matter: the parent is visited first.
        let joint = g.joint_probability(&ids(&["b", "a"])).unwrap();
        assert!((joint - 0.5 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn duplicates_count_once() {
        let mut g = DependencyGraph::new();
        g.add_bet(bet("a", "g1", 0.5));
        g.add_bet(bet("b", "g2", 0.5));
        let joint = g.joint_probability(&ids(&["a", "a", "b"])).unwrap();
        assert!((joint - 0.25).abs() < 1e-12);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let g = DependencyGraph::new();
        assert!(g.joint_probability(&ids(&["x"])).is_err());
        assert!(g.covariance_matrix(&ids(&["x"])).is_err());
    }

    #[test]
    fn covariance_entries() {
        let mut g = DependencyGraph::new();
        g.add_bet(bet("a", "g1", 0.5));
        g.add_bet(bet("b", "g1", 0.4));
        g.add_bet(bet("c", "g1", 0.6));
        g.add_bet(bet("d", "g2", 0.3));
        g.add_relationship(conditional("a", "b", 0.7, 0.8)).unwrap();

        let cov = g.covariance_matrix(&ids(&["a", "b", "c", "d"])).unwrap();

        assert!((cov.get(0, 0) - 0.25).abs() < 1e-12);
        assert!((cov.get(1, 1) - 0.24).abs() < 1e-12);
        let direct = 0.5 * (0.7 - 0.4) * 0.8;
        assert!((cov.get(0, 1) - direct).abs() < 1e-12);
        assert_eq!(cov.get(0, 1), cov.get(1, 0));
        let same_event = (0.25_f64 * 0.24).sqrt() * SAME_EVENT_CORRELATION;
        assert!((cov.get(0, 2) - same_event).abs() < 1e-12);
        assert_eq!(cov.get(0, 3), 0.0);
        assert_eq!(cov.get(2, 3), 0.0);
    }

    #[test]
    fn covariance_edge_direction_is_irrelevant_to_lookup() {
        let mut g = DependencyGraph::new();
        g.add_bet(bet("a", "g1", 0.5));
        g.add_bet(bet("b", "g2", 0.4));
        g.add_relationship(conditional("b", "a", 0.9, 1.0)).unwrap();

        let cov = g.covariance_matrix(&ids(&["a", "b"])).unwrap();
        let expected = 0.4 * (0.9 - 0.5);
        assert!((cov.get(0, 1) - expected).abs() < 1e-12);
    }

    #[test]
    fn covariance_without_relationships_is_diagonal() {
        let mut g = DependencyGraph::new();
        g.add_bet(bet("a", "g1", 0.5));
        g.add_bet(bet("b", "g2", 0.4));
        let cov = g.covariance_matrix(&ids(&["a", "b"])).unwrap();
        assert!(cov.is_diagonal());
    }
}
