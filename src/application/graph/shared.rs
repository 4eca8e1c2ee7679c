//! Thread-safe handle to a dependency graph.
//!
//! Mutations take the write lock for their full duration so a settlement is
//! never observed half-propagated. Readers that need a consistent view for a
//! long computation (the optimizer) take a [`snapshot`](SharedGraph::snapshot).

use std::sync::Arc;

use parking_lot::RwLock;

use super::{DependencyGraph, PropagationReport};
use crate::domain::{Bet, BetId, Relationship};
use crate::error::GraphError;

/// Cloneable, lock-protected [`DependencyGraph`].
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<DependencyGraph>>,
}

impl SharedGraph {
    #[must_use]
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn add_bet(&self, bet: Bet) -> Option<Bet> {
        self.inner.write().add_bet(bet)
    }

    /// See [`DependencyGraph::add_relationship`].
    ///
    /// # Errors
    ///
    /// Propagates the graph's validation errors.
    pub fn add_relationship(&self, relationship: Relationship) -> Result<(), GraphError> {
        self.inner.write().add_relationship(relationship)
    }

    /// See [`DependencyGraph::propagate_outcome`].
    ///
    /// # Errors
    ///
    /// Propagates the graph's validation errors.
    pub fn propagate_outcome(
        &self,
        bet_id: &BetId,
        won: bool,
    ) -> Result<PropagationReport, GraphError> {
        self.inner.write().propagate_outcome(bet_id, won)
    }

    /// Run `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&DependencyGraph) -> R) -> R {
        f(&self.inner.read())
    }

    /// Owned copy of the current graph.
    #[must_use]
    pub fn snapshot(&self) -> DependencyGraph {
        self.inner.read().clone()
    }
}

impl From<DependencyGraph> for SharedGraph {
    fn from(graph: DependencyGraph) -> Self {
        Self::new(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyType, EventId};
    use std::thread;

    fn bet(id: &str) -> Bet {
        Bet::try_new(BetId::from(id), EventId::from("g1"), "m", "s", 2.0, 0.5).unwrap()
    }

    #[test]
    fn clones_share_state() {
        let shared = SharedGraph::default();
        let other = shared.clone();
        shared.add_bet(bet("a"));
        assert_eq!(other.read(DependencyGraph::len), 1);
    }

    #[test]
    fn snapshot_is_detached() {
        let shared = SharedGraph::default();
        shared.add_bet(bet("a"));
        let snapshot = shared.snapshot();
        shared.add_bet(bet("b"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(shared.read(DependencyGraph::len), 2);
    }

    #[test]
    fn concurrent_settlements_are_serialized() {
        let shared = SharedGraph::default();
        for i in 0..8 {
            shared.add_bet(bet(&format!("p{i}")));
        }
        shared.add_bet(bet("child"));
        for i in 0..8 {
            shared
                .add_relationship(
                    Relationship::try_new(
                        BetId::from(format!("p{i}").as_str()),
                        BetId::from("child"),
                        DependencyType::ProbabilityConditional,
                        Some(0.9),
                        Some(0.1),
                        1.0,
                    )
                    .unwrap(),
                )
                .unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .propagate_outcome(&BetId::from(format!("p{i}").as_str()), true)
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let graph = shared.snapshot();
        assert!((0..8).all(|i| graph.bet(&BetId::from(format!("p{i}").as_str())).unwrap().is_settled()));
        assert!((graph.bet(&BetId::from("child")).unwrap().effective_prob() - 0.9).abs() < 1e-12);
    }
}
