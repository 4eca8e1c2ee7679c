//! Directed relationships between bets.
//!
//! A [`Relationship`] asserts how a parent bet's settled outcome changes a
//! child bet:
//!
//! - its probability ([`DependencyType::ProbabilityConditional`], [`DependencyType::Causal`])
//! - its validity ([`DependencyType::VoidIfParentLoses`], [`DependencyType::VoidIfParentWins`])
//! - or its outcome outright (the perfectly (anti)correlated and mutually
//!   exclusive kinds)
//!
//! # Examples
//!
//! ```
//! use betgraph::domain::{BetId, DependencyType, Relationship};
//!
//! // First five innings winner strongly predicts the full game winner.
//! let rel = Relationship::try_new(
//!     BetId::new("f5-home"),
//!     BetId::new("ml-home"),
//!     DependencyType::ProbabilityConditional,
//!     Some(0.78),
//!     Some(0.31),
//!     0.85,
//! )
//! .unwrap();
//!
//! assert_eq!(rel.conditional_prob(true), Some(0.78));
//! let marginal = rel.marginal_from_conditional(0.52).unwrap();
//! assert!((marginal - (0.78 * 0.52 + 0.31 * 0.48)).abs() < 1e-12);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{self, DomainError};
use super::id::{BetId, RelationshipId};

/// Default confidence that a relationship holds when none is supplied.
pub const DEFAULT_RELATIONSHIP_TRUST: f64 = 0.8;

/// How a parent bet's outcome affects its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    /// P(child | parent outcome) differs from P(child).
    ProbabilityConditional,
    /// Child is void if the parent loses (e.g. player must start).
    VoidIfParentLoses,
    /// Child is void if the parent wins.
    VoidIfParentWins,
    /// At most one of parent and child can win.
    MutuallyExclusive,
    /// Parent and child always resolve the same way.
    PerfectlyCorrelated,
    /// Parent and child always resolve opposite ways.
    PerfectlyAnticorrelated,
    /// One-way causal influence from parent to child.
    Causal,
}

impl DependencyType {
    /// Returns the type name as a static string.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::ProbabilityConditional => "probability_conditional",
            Self::VoidIfParentLoses => "void_if_parent_loses",
            Self::VoidIfParentWins => "void_if_parent_wins",
            Self::MutuallyExclusive => "mutually_exclusive",
            Self::PerfectlyCorrelated => "perfectly_correlated",
            Self::PerfectlyAnticorrelated => "perfectly_anticorrelated",
            Self::Causal => "causal",
        }
    }

    /// The parent outcome that voids the child, if this is a voiding rule.
    #[must_use]
    pub const fn voids_on(self) -> Option<bool> {
        match self {
            Self::VoidIfParentLoses => Some(false),
            Self::VoidIfParentWins => Some(true),
            Self::ProbabilityConditional
            | Self::MutuallyExclusive
            | Self::PerfectlyCorrelated
            | Self::PerfectlyAnticorrelated
            | Self::Causal => None,
        }
    }

    /// Conditional probability implied by the type alone.
    ///
    /// Only the deterministic kinds carry one; everything else needs an
    /// explicit estimate.
    #[must_use]
    pub const fn implied_conditional(self, parent_won: bool) -> Option<f64> {
        match (self, parent_won) {
            (Self::PerfectlyCorrelated, true) | (Self::PerfectlyAnticorrelated, false) => {
                Some(1.0)
            }
            (Self::PerfectlyCorrelated, false)
            | (Self::PerfectlyAnticorrelated, true)
            | (Self::MutuallyExclusive, true) => Some(0.0),
            (Self::MutuallyExclusive, false)
            | (Self::ProbabilityConditional, _)
            | (Self::VoidIfParentLoses, _)
            | (Self::VoidIfParentWins, _)
            | (Self::Causal, _) => None,
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Where a relationship estimate came from. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipSource {
    /// Produced by the prediction model.
    #[default]
    Model,
    /// Measured from historical outcomes.
    Historical,
    /// Supplied by a human expert.
    Expert,
    /// A settlement rule of the book (voiding conditions).
    Rule,
    /// Inferred from the pattern library.
    Inferred,
}

/// A directed edge `parent -> child` in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    id: RelationshipId,
    parent_id: BetId,
    child_id: BetId,
    dependency_type: DependencyType,
    prob_child_given_parent_wins: Option<f64>,
    prob_child_given_parent_loses: Option<f64>,
    trust_score: f64,
    source: RelationshipSource,
    sample_size: u32,
    created_at: DateTime<Utc>,
}

impl Relationship {
    /// Create a validated relationship.
    ///
    /// Conditional probabilities may be absent (pure voiding rules) and are
    /// allowed to reach 0 or 1, since a parent's outcome can make a child
    /// certain.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if a conditional probability lies outside
    /// [0, 1] or the trust score outside [0, 1].
    pub fn try_new(
        parent_id: BetId,
        child_id: BetId,
        dependency_type: DependencyType,
        prob_child_given_parent_wins: Option<f64>,
        prob_child_given_parent_loses: Option<f64>,
        trust_score: f64,
    ) -> Result<Self, DomainError> {
        let prob_child_given_parent_wins = prob_child_given_parent_wins
            .map(|p| error::closed_unit("prob_child_given_parent_wins", p))
            .transpose()?;
        let prob_child_given_parent_loses = prob_child_given_parent_loses
            .map(|p| error::closed_unit("prob_child_given_parent_loses", p))
            .transpose()?;
        let trust_score = error::trust("trust_score", trust_score)?;

        Ok(Self {
            id: RelationshipId::new(),
            parent_id,
            child_id,
            dependency_type,
            prob_child_given_parent_wins,
            prob_child_given_parent_loses,
            trust_score,
            source: RelationshipSource::default(),
            sample_size: 0,
            created_at: Utc::now(),
        })
    }

    /// Create a pure voiding rule with no probability information.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if `trust_score` is outside [0, 1].
    pub fn voiding(
        parent_id: BetId,
        child_id: BetId,
        void_when_parent_wins: bool,
        trust_score: f64,
    ) -> Result<Self, DomainError> {
        let kind = if void_when_parent_wins {
            DependencyType::VoidIfParentWins
        } else {
            DependencyType::VoidIfParentLoses
        };
        Ok(Self::try_new(parent_id, child_id, kind, None, None, trust_score)?
            .with_source(RelationshipSource::Rule))
    }

    /// Tag the provenance of this relationship.
    #[must_use]
    pub fn with_source(mut self, source: RelationshipSource) -> Self {
        self.source = source;
        self
    }

    /// Record how many observations back this relationship.
    #[must_use]
    pub fn with_sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Replace the generated identifier, e.g. when loading from a slate.
    #[must_use]
    pub fn with_id(mut self, id: RelationshipId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub const fn id(&self) -> &RelationshipId {
        &self.id
    }

    #[must_use]
    pub const fn parent_id(&self) -> &BetId {
        &self.parent_id
    }

    #[must_use]
    pub const fn child_id(&self) -> &BetId {
        &self.child_id
    }

    #[must_use]
    pub const fn dependency_type(&self) -> DependencyType {
        self.dependency_type
    }

    #[must_use]
    pub const fn prob_child_given_parent_wins(&self) -> Option<f64> {
        self.prob_child_given_parent_wins
    }

    #[must_use]
    pub const fn prob_child_given_parent_loses(&self) -> Option<f64> {
        self.prob_child_given_parent_loses
    }

    #[must_use]
    pub const fn trust_score(&self) -> f64 {
        self.trust_score
    }

    #[must_use]
    pub const fn source(&self) -> RelationshipSource {
        self.source
    }

    #[must_use]
    pub const fn sample_size(&self) -> u32 {
        self.sample_size
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// P(child | parent outcome).
    ///
    /// Explicit estimates take precedence; otherwise the dependency type may
    /// imply one (see [`DependencyType::implied_conditional`]).
    #[must_use]
    pub fn conditional_prob(&self, parent_won: bool) -> Option<f64> {
        let explicit = if parent_won {
            self.prob_child_given_parent_wins
        } else {
            self.prob_child_given_parent_loses
        };
        explicit.or_else(|| self.dependency_type.implied_conditional(parent_won))
    }

    /// Shrink a conditional estimate toward `base` by this relationship's trust.
    ///
    /// `trust * conditional + (1 - trust) * base`
    #[must_use]
    pub fn blend(&self, conditional: f64, base: f64) -> f64 {
        self.trust_score * conditional + (1.0 - self.trust_score) * base
    }

    /// Marginal P(child) from the two conditionals by total probability.
    ///
    /// Returns `None` unless both conditionals are known.
    #[must_use]
    pub fn marginal_from_conditional(&self, parent_prob: f64) -> Option<f64> {
        let win = self.conditional_prob(true)?;
        let lose = self.conditional_prob(false)?;
        Some(win * parent_prob + lose * (1.0 - parent_prob))
    }
}
