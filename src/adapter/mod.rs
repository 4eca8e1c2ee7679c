//! Implementations of ports (hexagonal adapters) and CLI entry points.

pub mod inbound;
pub mod solver;
