//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_new` constructors that validate inputs,
//! so malformed probabilities or odds never reach the graph.
//!
//! # Examples
//!
//! ```
//! use betgraph::domain::error::DomainError;
//! use betgraph::domain::{Bet, BetId, EventId};
//!
//! let result = Bet::try_new(
//!     BetId::new("nyy-ml"),
//!     EventId::new("nyy@bos"),
//!     "moneyline",
//!     "home",
//!     0.95, // odds must exceed 1.0
//!     0.56,
//! );
//!
//! assert!(matches!(result, Err(DomainError::InvalidOdds { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A probability fell outside its permitted range.
    #[error("{field} must be in {range}, got {value}")]
    ProbabilityOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable range description, e.g. "(0, 1)".
        range: &'static str,
        /// The invalid value that was provided.
        value: f64,
    },

    /// Decimal odds must exceed 1.0 (payout includes the stake).
    #[error("decimal odds must be greater than 1.0, got {odds}")]
    InvalidOdds {
        /// The invalid odds that were provided.
        odds: f64,
    },

    /// Trust scores are confidence weights in [0, 1].
    #[error("{field} must be in [0, 1], got {value}")]
    TrustOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value that was provided.
        value: f64,
    },

    /// Parlays must have at least one leg.
    #[error("legs cannot be empty")]
    EmptyLegs,

    /// A risk limit fell outside its permitted range.
    #[error("invalid risk limit {field}: {reason}")]
    InvalidLimit {
        /// Name of the offending limit.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Validate a probability in the open interval (0, 1).
pub(crate) fn open_unit(field: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(DomainError::ProbabilityOutOfRange {
            field,
            range: "(0, 1)",
            value,
        })
    }
}

/// Validate a probability in the closed interval [0, 1].
pub(crate) fn closed_unit(field: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DomainError::ProbabilityOutOfRange {
            field,
            range: "[0, 1]",
            value,
        })
    }
}

/// Validate a trust score in [0, 1].
pub(crate) fn trust(field: &'static str, value: f64) -> Result<f64, DomainError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DomainError::TrustOutOfRange { field, value })
    }
}
