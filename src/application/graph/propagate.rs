//! Outcome propagation.
//!
//! Settling a bet walks its descendants in topological order and recomputes
//! each one from its marginal. For every settled parent (in the order the
//! edges were added) the relationship either voids the child or supplies a
//! conditional estimate that is shrunk toward the marginal by the edge trust.
//! When several parents have settled, the last one wins.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use super::DependencyGraph;
use crate::domain::{BetId, DependencyType, Relationship};
use crate::error::GraphError;

/// What changed as a result of a settlement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropagationReport {
    /// Bets whose effective probability moved, with the new value.
    pub updated: BTreeMap<BetId, f64>,
    /// Bets voided by a voiding rule.
    pub voided: Vec<BetId>,
}

impl PropagationReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.voided.is_empty()
    }
}

/// Effect of one settled parent on its child.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EdgeEffect {
    Void,
    Adjust(f64),
    Unchanged,
}

fn edge_effect(relationship: &Relationship, parent_won: bool, parent_void: bool, base: f64) -> EdgeEffect {
    let voids = match relationship.dependency_type() {
        DependencyType::VoidIfParentLoses => !parent_won,
        DependencyType::VoidIfParentWins => parent_won,
        DependencyType::ProbabilityConditional
        | DependencyType::MutuallyExclusive
        | DependencyType::PerfectlyCorrelated
        | DependencyType::PerfectlyAnticorrelated
        | DependencyType::Causal => false,
    };
    if voids {
        return EdgeEffect::Void;
    }
    // A void parent still gates through voiding rules but carries no signal.
    if parent_void {
        return EdgeEffect::Unchanged;
    }
    relationship
        .conditional_prob(parent_won)
        .map_or(EdgeEffect::Unchanged, |conditional| {
            EdgeEffect::Adjust(relationship.blend(conditional, base))
        })
}

impl DependencyGraph {
    /// Record the outcome of `bet_id` and update every descendant.
    ///
    /// Descendants that are already settled or void are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownBet`] for an unknown id and
    /// [`GraphError::AlreadySettled`] if the bet already has an outcome. The
    /// graph is unchanged on error.
    pub fn propagate_outcome(
        &mut self,
        bet_id: &BetId,
        won: bool,
    ) -> Result<PropagationReport, GraphError> {
        let affected = self.affected_bets(bet_id)?;
        let bet = self
            .bets
            .get_mut(bet_id)
            .ok_or_else(|| GraphError::UnknownBet {
                bet_id: bet_id.clone(),
            })?;
        if bet.is_settled() {
            return Err(GraphError::AlreadySettled {
                bet_id: bet_id.clone(),
            });
        }
        bet.settle(won);
        info!(bet_id = %bet_id, won, descendants = affected.len(), "bet settled");

        let mut report = PropagationReport::default();
        for child_id in affected {
            let Some(child) = self.bets.get(&child_id) else {
                continue;
            };
            if child.state().is_terminal() {
                continue;
            }

            let marginal = child.marginal_prob();
            let previous = child.effective_prob();
            let mut effective = marginal;
            let mut voided = false;

            for parent_id in child.parent_ids() {
                let Some(parent) = self.bets.get(parent_id) else {
                    continue;
                };
                let Some(parent_won) = parent.won() else {
                    continue;
                };
                let Some(relationship) = self.relationship(parent_id, &child_id) else {
                    continue;
                };
                match edge_effect(relationship, parent_won, parent.is_void(), marginal) {
                    EdgeEffect::Void => {
                        debug!(bet_id = %child_id, parent_id = %parent_id, parent_won, "voiding rule triggered");
                        voided = true;
                        break;
                    }
                    EdgeEffect::Adjust(prob) => {
                        debug!(
                            bet_id = %child_id,
                            parent_id = %parent_id,
                            parent_won,
                            prob,
                            "conditional applied"
                        );
                        effective = prob;
                    }
                    EdgeEffect::Unchanged => {}
                }
            }

            let Some(child) = self.bets.get_mut(&child_id) else {
                continue;
            };
            if voided {
                child.mark_void();
                info!(bet_id = %child_id, "bet voided");
                report.voided.push(child_id);
            } else if effective != previous {
                child.set_effective_prob(effective);
                info!(bet_id = %child_id, previous, effective, "effective probability updated");
                report.updated.insert(child_id, effective);
            }
        }

        Ok(report)
    }
}
