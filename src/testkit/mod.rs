//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for bets, relationships and small graphs.
//! - [`solver`] - In-process [`Solver`](crate::port::outbound::solver::Solver)
//!   implementations: `GreedySolver`, `StatusSolver`, `BrokenSolver`.

pub mod domain;
pub mod solver;
