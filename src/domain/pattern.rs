//! Historically observed relationship priors.
//!
//! When no measured conditional probability exists for a pair of bets, the
//! pattern library supplies a prior: how much a parent win lifts the child's
//! probability and how far that lift can be trusted. The factories at the
//! bottom build [`Relationship`]s for the common baseball shapes.

use super::bet::Bet;
use super::error::DomainError;
use super::relationship::{DependencyType, Relationship, RelationshipSource};

/// Trust assigned to adjustments for unknown pattern names.
pub const UNKNOWN_PATTERN_TRUST: f64 = 0.5;

const MIN_ADJUSTED_PROB: f64 = 0.05;
const MAX_ADJUSTED_PROB: f64 = 0.95;

/// A named relationship prior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pattern {
    pub name: &'static str,
    /// Additive lift to the child's probability when the parent wins.
    pub prob_increase: f64,
    pub trust: f64,
    pub sample_size: u32,
}

const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "player_hr_given_team_win",
        prob_increase: 0.15,
        trust: 0.75,
        sample_size: 10_000,
    },
    Pattern {
        name: "low_total_given_ace_start",
        prob_increase: 0.12,
        trust: 0.70,
        sample_size: 5_000,
    },
    Pattern {
        name: "full_game_ml_given_f5_ml",
        prob_increase: 0.20,
        trust: 0.85,
        sample_size: 15_000,
    },
    Pattern {
        name: "player_over_tb_given_hit",
        prob_increase: 0.40,
        trust: 0.90,
        sample_size: 20_000,
    },
    Pattern {
        name: "pitcher_win_given_high_k",
        prob_increase: 0.18,
        trust: 0.65,
        sample_size: 8_000,
    },
];

const OPPOSITE_SIDES: &[(&str, &str)] = &[
    ("home", "away"),
    ("over", "under"),
    ("favorite", "underdog"),
];

/// Static table of relationship priors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternLibrary;

impl PatternLibrary {
    /// All known patterns.
    #[must_use]
    pub const fn patterns() -> &'static [Pattern] {
        PATTERNS
    }

    /// Look up a pattern by name.
    #[must_use]
    pub fn get(name: &str) -> Option<&'static Pattern> {
        PATTERNS.iter().find(|p| p.name == name)
    }

    /// Conditional probability and trust for `name` applied to `base_prob`.
    ///
    /// The adjusted probability is clamped to [0.05, 0.95]. Unknown names
    /// return `base_prob` unchanged with trust [`UNKNOWN_PATTERN_TRUST`].
    #[must_use]
    pub fn conditional_adjustment(name: &str, base_prob: f64) -> (f64, f64) {
        match Self::get(name) {
            Some(pattern) => (
                (base_prob + pattern.prob_increase).clamp(MIN_ADJUSTED_PROB, MAX_ADJUSTED_PROB),
                pattern.trust,
            ),
            None => (base_prob, UNKNOWN_PATTERN_TRUST),
        }
    }

    /// Guess the relationship type between two bet kinds.
    ///
    /// Identical kinds move together. Opposite sides exclude each other only
    /// within one event; across events everything else is a probability shift.
    #[must_use]
    pub fn infer_relationship_type(kind_a: &str, kind_b: &str, same_event: bool) -> DependencyType {
        let a = kind_a.to_lowercase();
        let b = kind_b.to_lowercase();
        if a == b {
            return DependencyType::PerfectlyCorrelated;
        }
        let opposite = OPPOSITE_SIDES
            .iter()
            .any(|&(x, y)| (a == x && b == y) || (a == y && b == x));
        if same_event && opposite {
            DependencyType::MutuallyExclusive
        } else {
            DependencyType::ProbabilityConditional
        }
    }

    /// Build a relationship `parent -> child` from a named pattern.
    ///
    /// The conditional on a parent win comes from
    /// [`conditional_adjustment`](Self::conditional_adjustment) applied to the
    /// child's marginal; no estimate is recorded for a parent loss.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] if the resulting relationship fails validation.
    pub fn relationship_from_pattern(
        parent: &Bet,
        child: &Bet,
        name: &str,
    ) -> Result<Relationship, DomainError> {
        let (conditional, trust) = Self::conditional_adjustment(name, child.marginal_prob());
        let sample_size = Self::get(name).map_or(0, |p| p.sample_size);
        Ok(Relationship::try_new(
            parent.id().clone(),
            child.id().clone(),
            DependencyType::ProbabilityConditional,
            Some(conditional),
            None,
            trust,
        )?
        .with_source(RelationshipSource::Inferred)
        .with_sample_size(sample_size))
    }
}

/// Player prop -> team outcome: a strong individual game lifts the team.
///
/// # Errors
///
/// Returns a [`DomainError`] if the resulting relationship fails validation.
pub fn player_team_dependency(
    player_bet: &Bet,
    team_bet: &Bet,
    impact_factor: f64,
) -> Result<Relationship, DomainError> {
    let marginal = team_bet.marginal_prob();
    Relationship::try_new(
        player_bet.id().clone(),
        team_bet.id().clone(),
        DependencyType::ProbabilityConditional,
        Some((marginal + impact_factor).min(MAX_ADJUSTED_PROB)),
        Some((marginal - impact_factor * 0.5).max(MIN_ADJUSTED_PROB)),
        0.70,
    )
}

/// Prerequisite -> dependent: the dependent bet is void if the prerequisite fails.
///
/// # Errors
///
/// Returns a [`DomainError`] if the resulting relationship fails validation.
pub fn validity_dependency(
    prerequisite: &Bet,
    dependent: &Bet,
) -> Result<Relationship, DomainError> {
    Relationship::voiding(prerequisite.id().clone(), dependent.id().clone(), false, 0.99)
}

/// First five innings -> full game, from historical F5/FG agreement.
///
/// # Errors
///
/// Returns a [`DomainError`] if the resulting relationship fails validation.
pub fn f5_fullgame_dependency(
    f5_bet: &Bet,
    fullgame_bet: &Bet,
) -> Result<Relationship, DomainError> {
    let marginal = fullgame_bet.marginal_prob();
    Ok(Relationship::try_new(
        f5_bet.id().clone(),
        fullgame_bet.id().clone(),
        DependencyType::ProbabilityConditional,
        Some((marginal + 0.20).min(0.92)),
        Some((marginal - 0.25).max(0.15)),
        0.85,
    )?
    .with_source(RelationshipSource::Historical)
    .with_sample_size(15_000))
}
