//! Builders for domain primitives used across tests.
//!
//! Keeps tests focused on assertions rather than construction boilerplate.
//! Builders panic on invalid input since they only ever see literals.

use crate::application::graph::DependencyGraph;
use crate::domain::{Bet, BetId, DependencyType, EventId, Relationship};

/// Create a [`BetId`] from a string.
pub fn bet_id(id: &str) -> BetId {
    BetId::from(id)
}

/// Create a list of [`BetId`]s.
pub fn bet_ids(ids: &[&str]) -> Vec<BetId> {
    ids.iter().map(|id| BetId::from(*id)).collect()
}

/// A bet with default trust on the given event.
pub fn bet(id: &str, event: &str, decimal_odds: f64, prob: f64) -> Bet {
    Bet::try_new(
        BetId::from(id),
        EventId::from(event),
        "moneyline",
        id,
        decimal_odds,
        prob,
    )
    .expect("valid bet")
}

/// A bet with an explicit probability trust.
pub fn trusted_bet(id: &str, event: &str, decimal_odds: f64, prob: f64, trust: f64) -> Bet {
    bet(id, event, decimal_odds, prob)
        .with_probability_trust(trust)
        .expect("valid trust")
}

/// A probability-conditional relationship with both conditionals.
pub fn conditional(parent: &str, child: &str, win: f64, lose: f64, trust: f64) -> Relationship {
    Relationship::try_new(
        BetId::from(parent),
        BetId::from(child),
        DependencyType::ProbabilityConditional,
        Some(win),
        Some(lose),
        trust,
    )
    .expect("valid relationship")
}

/// A graph containing `bets` and no relationships.
pub fn graph_of(bets: impl IntoIterator<Item = Bet>) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for bet in bets {
        graph.add_bet(bet);
    }
    graph
}
