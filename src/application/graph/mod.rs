//! Conditional dependency graph over bets.
//!
//! Nodes are [`Bet`]s, edges are [`Relationship`]s from parent to child. The
//! graph is kept acyclic at insertion time: [`DependencyGraph::add_relationship`]
//! runs a reachability check from the prospective child and rejects any edge
//! that would close a cycle, without touching the adjacency maps.
//!
//! Settlement flows through [`DependencyGraph::propagate_outcome`], chain-rule
//! joint probabilities through [`DependencyGraph::joint_probability`], and the
//! optimizer's risk term through [`DependencyGraph::covariance_matrix`].

mod joint;
mod propagate;
mod shared;

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::domain::{Bet, BetId, Relationship};
use crate::error::GraphError;

pub use joint::SAME_EVENT_CORRELATION;
pub use propagate::PropagationReport;
pub use shared::SharedGraph;

/// Directed acyclic graph of bets and their relationships.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    bets: BTreeMap<BetId, Bet>,
    relationships: HashMap<(BetId, BetId), Relationship>,
    children: HashMap<BetId, BTreeSet<BetId>>,
    parents: HashMap<BetId, BTreeSet<BetId>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bet keyed by its id.
    ///
    /// Re-inserting an existing id replaces the bet but keeps its edges and
    /// parent list; the previous value is returned.
    pub fn add_bet(&mut self, mut bet: Bet) -> Option<Bet> {
        let id = bet.id().clone();
        if let Some(existing) = self.bets.get(&id) {
            warn!(bet_id = %id, "replacing existing bet");
            bet.inherit_parents(existing.parent_ids().to_vec());
        }
        debug!(bet_id = %id, event_id = %bet.event_id(), "bet added");
        self.bets.insert(id, bet)
    }

    /// Insert a relationship after validating endpoints and acyclicity.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownBet`] if either endpoint is missing and
    /// [`GraphError::Cycle`] if a path already leads from child to parent.
    /// The graph is unchanged on error.
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<(), GraphError> {
        let parent_id = relationship.parent_id().clone();
        let child_id = relationship.child_id().clone();

        self.require(&parent_id)?;
        self.require(&child_id)?;

        if self.would_create_cycle(&parent_id, &child_id) {
            return Err(GraphError::Cycle {
                parent: parent_id,
                child: child_id,
            });
        }

        debug!(
            parent_id = %parent_id,
            child_id = %child_id,
            dependency = %relationship.dependency_type(),
            trust = relationship.trust_score(),
            "relationship added"
        );

        self.children
            .entry(parent_id.clone())
            .or_default()
            .insert(child_id.clone());
        self.parents
            .entry(child_id.clone())
            .or_default()
            .insert(parent_id.clone());
        if let Some(child) = self.bets.get_mut(&child_id) {
            child.push_parent(parent_id.clone());
        }
        self.relationships
            .insert((parent_id, child_id), relationship);

        Ok(())
    }

    /// Depth-first search from `child` along existing edges looking for `parent`.
    fn would_create_cycle(&self, parent: &BetId, child: &BetId) -> bool {
        if parent == child {
            return true;
        }

        let mut visited = BTreeSet::new();
        let mut stack = vec![child];
        while let Some(node) = stack.pop() {
            if node == parent {
                return true;
            }
            if !visited.insert(node) {
                continue;
            }
            stack.extend(self.children_of(node));
        }
        false
    }

    fn require(&self, bet_id: &BetId) -> Result<&Bet, GraphError> {
        self.bets.get(bet_id).ok_or_else(|| GraphError::UnknownBet {
            bet_id: bet_id.clone(),
        })
    }

    #[must_use]
    pub fn bet(&self, bet_id: &BetId) -> Option<&Bet> {
        self.bets.get(bet_id)
    }

    #[must_use]
    pub fn contains(&self, bet_id: &BetId) -> bool {
        self.bets.contains_key(bet_id)
    }

    /// All bets, ordered by id.
    pub fn bets(&self) -> impl Iterator<Item = &Bet> {
        self.bets.values()
    }

    /// All bet ids, ordered.
    #[must_use]
    pub fn bet_ids(&self) -> Vec<BetId> {
        self.bets.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// The relationship on edge `parent -> child`, if any.
    #[must_use]
    pub fn relationship(&self, parent: &BetId, child: &BetId) -> Option<&Relationship> {
        self.relationships.get(&(parent.clone(), child.clone()))
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Direct children of `bet_id`.
    pub fn children_of<'a>(&'a self, bet_id: &BetId) -> impl Iterator<Item = &'a BetId> + 'a {
        self.children.get(bet_id).into_iter().flatten()
    }

    /// Direct parents of `bet_id`.
    pub fn parents_of<'a>(&'a self, bet_id: &BetId) -> impl Iterator<Item = &'a BetId> + 'a {
        self.parents.get(bet_id).into_iter().flatten()
    }

    /// Bets with no parents: natural entry points for sequential settlement.
    #[must_use]
    pub fn root_bets(&self) -> Vec<BetId> {
        self.bets
            .keys()
            .filter(|id| self.parents.get(*id).map_or(true, BTreeSet::is_empty))
            .cloned()
            .collect()
    }

    /// All descendants of `bet_id` in topological order (ancestors first).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownBet`] if `bet_id` is not in the graph.
    pub fn affected_bets(&self, bet_id: &BetId) -> Result<Vec<BetId>, GraphError> {
        self.require(bet_id)?;

        let mut descendants = BTreeSet::new();
        let mut stack: Vec<&BetId> = self.children_of(bet_id).collect();
        while let Some(node) = stack.pop() {
            if descendants.insert(node.clone()) {
                stack.extend(self.children_of(node));
            }
        }

        let nodes: Vec<BetId> = descendants.into_iter().collect();
        // Induced subgraphs of a DAG are acyclic, so this cannot fail.
        Ok(self.topological_order(&nodes).unwrap_or(nodes))
    }

    /// Kahn's algorithm over the subgraph induced by `nodes`.
    ///
    /// Ties are broken by position in `nodes`. Returns `None` if the induced
    /// subgraph is not acyclic (or `nodes` contains duplicates).
    fn topological_order(&self, nodes: &[BetId]) -> Option<Vec<BetId>> {
        let position: HashMap<&BetId, usize> =
            nodes.iter().enumerate().map(|(i, id)| (id, i)).collect();

        let mut in_degree: Vec<usize> = nodes
            .iter()
            .map(|id| {
                self.parents_of(id)
                    .filter(|p| position.contains_key(p))
                    .count()
            })
            .collect();

        let mut ready: BTreeSet<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(nodes.len());

        while let Some(i) = ready.pop_first() {
            order.push(nodes[i].clone());
            for child in self.children_of(&nodes[i]) {
                if let Some(&j) = position.get(child) {
                    in_degree[j] -= 1;
                    if in_degree[j] == 0 {
                        ready.insert(j);
                    }
                }
            }
        }

        (order.len() == nodes.len()).then_some(order)
    }

    /// Resolve ids, dropping repeats while keeping first-seen order.
    fn resolve_unique(&self, bet_ids: &[BetId]) -> Result<Vec<BetId>, GraphError> {
        let mut seen = BTreeSet::new();
        let mut unique = Vec::with_capacity(bet_ids.len());
        for id in bet_ids {
            self.require(id)?;
            if seen.insert(id) {
                unique.push(id.clone());
            }
        }
        Ok(unique)
    }
}
