//! Application services (use cases).
//!
//! The dependency graph maintains bets and their conditional relationships;
//! the optimizer sizes positions and values parlays on top of it.

pub mod graph;
pub mod optimizer;
