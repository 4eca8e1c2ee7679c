//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points that adapters implement to plug
//! external systems into the application layer.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  graph + optimizer      │
//!                    └────────────┬────────────┘
//!                                 │
//!                                 ▼
//!                          ┌─────────────┐
//!                          │   Solver    │
//!                          │   Adapter   │
//!                          └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`outbound::solver::Solver`] - LP backend used as the Frank-Wolfe oracle

pub mod outbound;
