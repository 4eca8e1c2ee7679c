//! Candidate wagers and their settlement state.
//!
//! A [`Bet`] carries two probabilities:
//!
//! - `marginal_prob` - the unconditional estimate supplied by the prediction
//!   layer. Immutable once the bet is constructed.
//! - `effective_prob` - the probability used for sizing. Starts equal to the
//!   marginal and is only ever changed by graph propagation when a parent
//!   bet settles.
//!
//! # State machine
//!
//! ```text
//! Unsettled ──settle(won)──▶ Won | Lost
//!     │
//!     └────parent rule────▶ Void
//! ```
//!
//! `Won`, `Lost` and `Void` are terminal for the effective probability. A void
//! bet may still record its own outcome so that it can gate its children.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::{self, DomainError};
use super::id::{BetId, EventId};

/// Default confidence in a probability estimate when none is supplied.
pub const DEFAULT_PROBABILITY_TRUST: f64 = 0.9;

/// Observable lifecycle state of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BetState {
    /// Outcome unknown; effective probability may still move.
    Unsettled,
    /// Settled as a winner.
    Won,
    /// Settled as a loser.
    Lost,
    /// Nullified by a parent's voiding rule.
    Void,
}

impl BetState {
    /// Returns true for states in which the effective probability is frozen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Unsettled)
    }
}

/// A single candidate wager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bet {
    id: BetId,
    event_id: EventId,
    market: String,
    selection: String,
    decimal_odds: f64,
    marginal_prob: f64,
    effective_prob: f64,
    probability_trust: f64,
    parent_ids: Vec<BetId>,
    outcome: Option<bool>,
    void: bool,
    settled_at: Option<DateTime<Utc>>,
}

impl Bet {
    /// Create a validated bet.
    ///
    /// The effective probability starts equal to `marginal_prob` and the
    /// probability trust defaults to [`DEFAULT_PROBABILITY_TRUST`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidOdds`] if `decimal_odds <= 1.0` and
    /// [`DomainError::ProbabilityOutOfRange`] if `marginal_prob` is not in (0, 1).
    pub fn try_new(
        id: BetId,
        event_id: EventId,
        market: impl Into<String>,
        selection: impl Into<String>,
        decimal_odds: f64,
        marginal_prob: f64,
    ) -> Result<Self, DomainError> {
        if !decimal_odds.is_finite() || decimal_odds <= 1.0 {
            return Err(DomainError::InvalidOdds { odds: decimal_odds });
        }
        let marginal_prob = error::open_unit("marginal_prob", marginal_prob)?;

        Ok(Self {
            id,
            event_id,
            market: market.into(),
            selection: selection.into(),
            decimal_odds,
            marginal_prob,
            effective_prob: marginal_prob,
            probability_trust: DEFAULT_PROBABILITY_TRUST,
            parent_ids: Vec::new(),
            outcome: None,
            void: false,
            settled_at: None,
        })
    }

    /// Set the confidence in the probability estimate itself.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::TrustOutOfRange`] if `trust` is not in [0, 1].
    pub fn with_probability_trust(mut self, trust: f64) -> Result<Self, DomainError> {
        self.probability_trust = error::trust("probability_trust", trust)?;
        Ok(self)
    }

    #[must_use]
    pub const fn id(&self) -> &BetId {
        &self.id
    }

    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    #[must_use]
    pub fn market(&self) -> &str {
        &self.market
    }

    #[must_use]
    pub fn selection(&self) -> &str {
        &self.selection
    }

    #[must_use]
    pub const fn decimal_odds(&self) -> f64 {
        self.decimal_odds
    }

    /// Net odds `b = decimal_odds - 1`.
    #[must_use]
    pub fn net_odds(&self) -> f64 {
        self.decimal_odds - 1.0
    }

    #[must_use]
    pub const fn marginal_prob(&self) -> f64 {
        self.marginal_prob
    }

    #[must_use]
    pub const fn effective_prob(&self) -> f64 {
        self.effective_prob
    }

    #[must_use]
    pub const fn probability_trust(&self) -> f64 {
        self.probability_trust
    }

    /// Parents in the order their relationships were added.
    #[must_use]
    pub fn parent_ids(&self) -> &[BetId] {
        &self.parent_ids
    }

    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    /// The recorded outcome, if the bet has settled.
    #[must_use]
    pub const fn won(&self) -> Option<bool> {
        self.outcome
    }

    #[must_use]
    pub const fn is_void(&self) -> bool {
        self.void
    }

    #[must_use]
    pub const fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    /// Current lifecycle state. Void takes precedence over a recorded outcome.
    #[must_use]
    pub const fn state(&self) -> BetState {
        if self.void {
            return BetState::Void;
        }
        match self.outcome {
            None => BetState::Unsettled,
            Some(true) => BetState::Won,
            Some(false) => BetState::Lost,
        }
    }

    /// Market-implied probability `1 / decimal_odds`.
    #[must_use]
    pub fn implied_prob(&self) -> f64 {
        1.0 / self.decimal_odds
    }

    /// Edge using the effective (conditional) probability.
    #[must_use]
    pub fn edge(&self) -> f64 {
        self.effective_prob - self.implied_prob()
    }

    /// Expected value per unit staked using the effective probability.
    #[must_use]
    pub fn expected_value(&self) -> f64 {
        self.effective_prob * self.net_odds() - (1.0 - self.effective_prob)
    }

    /// Returns true if the edge meets `min_edge`.
    #[must_use]
    pub fn is_value(&self, min_edge: f64) -> bool {
        self.edge() >= min_edge
    }

    pub(crate) fn set_effective_prob(&mut self, prob: f64) {
        self.effective_prob = prob;
    }

    pub(crate) fn push_parent(&mut self, parent: BetId) {
        if !self.parent_ids.contains(&parent) {
            self.parent_ids.push(parent);
        }
    }

    pub(crate) fn inherit_parents(&mut self, parents: Vec<BetId>) {
        self.parent_ids = parents;
    }

    pub(crate) fn mark_void(&mut self) {
        self.void = true;
    }

    pub(crate) fn settle(&mut self, won: bool) {
        self.outcome = Some(won);
        self.settled_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bet(odds: f64, prob: f64) -> Bet {
        Bet::try_new(
            BetId::from("a"),
            EventId::from("g1"),
            "moneyline",
            "home",
            odds,
            prob,
        )
        .unwrap()
    }

    #[test]
    fn effective_prob_starts_at_marginal() {
        let b = bet(1.91, 0.56);
        assert_eq!(b.effective_prob(), 0.56);
        assert_eq!(b.state(), BetState::Unsettled);
    }

    #[test]
    fn edge_and_expected_value_use_effective_prob() {
        let mut b = bet(2.0, 0.5);
        b.set_effective_prob(0.625);
        assert_eq!(b.edge(), 0.125);
        assert_eq!(b.expected_value(), 0.25);
        assert!(b.is_value(0.125));
        assert!(!b.is_value(0.13));
    }

    #[test]
    fn rejects_odds_at_or_below_one() {
        let err = Bet::try_new(BetId::from("a"), EventId::from("g"), "m", "s", 1.0, 0.5);
        assert_eq!(err, Err(DomainError::InvalidOdds { odds: 1.0 }));
    }

    #[test]
    fn rejects_degenerate_marginal() {
        let err = Bet::try_new(BetId::from("a"), EventId::from("g"), "m", "s", 2.0, 1.0);
        assert!(matches!(
            err,
            Err(DomainError::ProbabilityOutOfRange {
                field: "marginal_prob",
                ..
            })
        ));
    }

    #[test]
    fn rejects_trust_above_one() {
        let err = bet(2.0, 0.5).with_probability_trust(1.5);
        assert!(matches!(err, Err(DomainError::TrustOutOfRange { .. })));
    }

    #[test]
    fn void_state_wins_over_outcome() {
        let mut b = bet(2.0, 0.5);
        b.settle(true);
        assert_eq!(b.state(), BetState::Won);
        b.mark_void();
        assert_eq!(b.state(), BetState::Void);
        assert_eq!(b.won(), Some(true));
        assert!(b.state().is_terminal());
    }

    #[test]
    fn push_parent_ignores_duplicates() {
        let mut b = bet(2.0, 0.5);
        b.push_parent(BetId::from("p"));
        b.push_parent(BetId::from("p"));
        assert_eq!(b.parent_ids().len(), 1);
    }
}
