use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::BetId;
use crate::port::outbound::solver::SolutionStatus;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Structural errors from graph mutations.
///
/// Every operation that returns one of these leaves the graph unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("unknown bet: {bet_id}")]
    UnknownBet { bet_id: BetId },

    #[error("adding {parent} -> {child} would create a circular dependency")]
    Cycle { parent: BetId, child: BetId },

    #[error("bet {bet_id} has already settled")]
    AlreadySettled { bet_id: BetId },
}

/// Failures of the convex sizing path. Recovered by the fractional-Kelly fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("no solver backend configured")]
    Unavailable,

    #[error("solver terminated with status {0:?}")]
    NotOptimal(SolutionStatus),

    #[error("solver backend error: {0}")]
    Backend(String),

    #[error("non-finite value encountered during optimization")]
    NonFinite,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
