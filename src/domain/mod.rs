//! Solver-agnostic domain types.

pub mod allocation;
pub mod bet;
pub mod constraint;
pub mod covariance;
pub mod error;
pub mod id;
pub mod limits;
pub mod pattern;
pub mod relationship;

pub use allocation::{Allocation, AllocationPlan, ParlayValuation, Recommendation, SizingMethod};
pub use bet::{Bet, BetState};
pub use constraint::{Constraint, ConstraintSense, VariableBounds};
pub use covariance::CovarianceMatrix;
pub use error::DomainError;
pub use id::{BetId, EventId, RelationshipId};
pub use limits::RiskLimits;
pub use pattern::{Pattern, PatternLibrary};
pub use relationship::{DependencyType, Relationship, RelationshipSource};
