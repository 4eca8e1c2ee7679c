//! Slate files: a bet set, its relationships and any known outcomes.
//!
//! ```toml
//! [[bets]]
//! id = "nyy-f5"
//! event = "nyy-bos"
//! market = "first_five_moneyline"
//! selection = "NYY"
//! decimal_odds = 1.95
//! marginal_prob = 0.52
//!
//! [[bets]]
//! id = "nyy-ml"
//! event = "nyy-bos"
//! market = "moneyline"
//! selection = "NYY"
//! decimal_odds = 1.85
//! marginal_prob = 0.56
//!
//! [[relationships]]
//! parent = "nyy-f5"
//! child = "nyy-ml"
//! type = "probability_conditional"
//! prob_child_given_parent_wins = 0.78
//! prob_child_given_parent_loses = 0.30
//! trust = 0.85
//!
//! [[outcomes]]
//! bet = "nyy-f5"
//! won = true
//! ```
//!
//! A relationship may name a `pattern` from the pattern library instead of
//! giving its conditionals. Outcomes are applied in file order.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::application::graph::{DependencyGraph, PropagationReport};
use crate::domain::bet::DEFAULT_PROBABILITY_TRUST;
use crate::domain::relationship::DEFAULT_RELATIONSHIP_TRUST;
use crate::domain::{
    Bet, BetId, DependencyType, EventId, PatternLibrary, Relationship, RelationshipId,
    RelationshipSource,
};
use crate::error::{ConfigError, GraphError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BetEntry {
    pub id: BetId,
    pub event: EventId,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub selection: String,
    pub decimal_odds: f64,
    pub marginal_prob: f64,
    #[serde(default = "default_probability_trust")]
    pub probability_trust: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub parent: BetId,
    pub child: BetId,
    #[serde(rename = "type", default = "default_dependency_type")]
    pub dependency_type: DependencyType,
    #[serde(default)]
    pub prob_child_given_parent_wins: Option<f64>,
    #[serde(default)]
    pub prob_child_given_parent_loses: Option<f64>,
    #[serde(default = "default_relationship_trust")]
    pub trust: f64,
    #[serde(default)]
    pub source: Option<RelationshipSource>,
    #[serde(default)]
    pub sample_size: u32,
    /// Build from a named prior instead of explicit conditionals.
    #[serde(default)]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutcomeEntry {
    pub bet: BetId,
    pub won: bool,
}

const fn default_probability_trust() -> f64 {
    DEFAULT_PROBABILITY_TRUST
}

const fn default_relationship_trust() -> f64 {
    DEFAULT_RELATIONSHIP_TRUST
}

const fn default_dependency_type() -> DependencyType {
    DependencyType::ProbabilityConditional
}

/// Parsed slate file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Slate {
    #[serde(default)]
    pub bets: Vec<BetEntry>,
    #[serde(default)]
    pub relationships: Vec<RelationshipEntry>,
    #[serde(default)]
    pub outcomes: Vec<OutcomeEntry>,
}

/// A slate loaded into a graph, with the effect of each recorded outcome.
#[derive(Debug, Clone)]
pub struct LoadedSlate {
    pub graph: DependencyGraph,
    pub settlements: Vec<(BetId, PropagationReport)>,
}

impl Slate {
    /// Parse a slate from TOML content.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the content is malformed.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    /// Read and parse a slate file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadFile`] or [`ConfigError::Parse`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Build the graph: bets, then relationships, then outcomes in order.
    ///
    /// # Errors
    ///
    /// Surfaces the domain and graph errors of the individual operations.
    pub fn into_graph(self) -> Result<LoadedSlate> {
        let mut graph = DependencyGraph::new();

        for entry in self.bets {
            let bet = Bet::try_new(
                entry.id,
                entry.event,
                entry.market,
                entry.selection,
                entry.decimal_odds,
                entry.marginal_prob,
            )?
            .with_probability_trust(entry.probability_trust)?;
            graph.add_bet(bet);
        }

        for entry in self.relationships {
            let relationship = build_relationship(&graph, entry)?;
            graph.add_relationship(relationship)?;
        }

        let mut settlements = Vec::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            let report = graph.propagate_outcome(&outcome.bet, outcome.won)?;
            settlements.push((outcome.bet, report));
        }

        info!(
            bets = graph.len(),
            relationships = graph.relationships().count(),
            settled = settlements.len(),
            "slate loaded"
        );
        Ok(LoadedSlate { graph, settlements })
    }
}

fn build_relationship(graph: &DependencyGraph, entry: RelationshipEntry) -> Result<Relationship> {
    let mut relationship = match &entry.pattern {
        Some(name) => {
            let parent = lookup(graph, &entry.parent)?;
            let child = lookup(graph, &entry.child)?;
            PatternLibrary::relationship_from_pattern(parent, child, name)?
        }
        None => Relationship::try_new(
            entry.parent,
            entry.child,
            entry.dependency_type,
            entry.prob_child_given_parent_wins,
            entry.prob_child_given_parent_loses,
            entry.trust,
        )?
        .with_sample_size(entry.sample_size),
    };

    if let Some(source) = entry.source {
        relationship = relationship.with_source(source);
    }
    if let Some(id) = entry.id {
        relationship = relationship.with_id(RelationshipId::from(id));
    }
    Ok(relationship)
}

fn lookup<'g>(graph: &'g DependencyGraph, bet_id: &BetId) -> Result<&'g Bet> {
    graph.bet(bet_id).ok_or_else(|| {
        GraphError::UnknownBet {
            bet_id: bet_id.clone(),
        }
        .into()
    })
}
