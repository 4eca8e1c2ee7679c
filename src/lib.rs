//! Betgraph - conditional dependency graphs and portfolio sizing for bets.
//!
//! Bets on the same game are rarely independent: a team leading after five
//! innings usually wins, and a player prop may be void if the player does not
//! start. This crate models those relationships as a directed acyclic graph,
//! propagates settled outcomes to dependent bets, prices parlays with the
//! chain rule instead of multiplying marginals, and sizes a portfolio by
//! maximizing risk-penalized log growth under exposure caps.
//!
//! # Architecture
//!
//! - **`domain`** - Bets, relationships, constraints, covariance, reports
//! - **`port`** - The `Solver` trait used as a linear oracle
//! - **`application::graph`** - `DependencyGraph` and `SharedGraph`
//! - **`application::optimizer`** - `PortfolioOptimizer` (Frank-Wolfe growth
//!   maximization with a fractional-Kelly fallback, parlay valuation)
//! - **`adapter`** - HiGHS solver backend and the CLI
//! - **`infrastructure`** - TOML configuration, slate files, logging
//!
//! # Example
//!
//! ```no_run
//! use betgraph::application::graph::DependencyGraph;
//! use betgraph::application::optimizer::PortfolioOptimizer;
//! use betgraph::domain::{Bet, DependencyType, Relationship, RiskLimits};
//!
//! fn main() -> betgraph::error::Result<()> {
//!     let mut graph = DependencyGraph::new();
//!     graph.add_bet(Bet::try_new("f5".into(), "nyy-bos".into(), "first_five", "NYY", 1.95, 0.55)?);
//!     graph.add_bet(Bet::try_new("ml".into(), "nyy-bos".into(), "moneyline", "NYY", 1.85, 0.58)?);
//!     graph.add_relationship(Relationship::try_new(
//!         "f5".into(),
//!         "ml".into(),
//!         DependencyType::ProbabilityConditional,
//!         Some(0.78),
//!         Some(0.30),
//!         0.85,
//!     )?)?;
//!
//!     let plan = PortfolioOptimizer::try_new(RiskLimits::default())?.optimize(&graph, None)?;
//!     println!("{:?}", plan.allocations);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
