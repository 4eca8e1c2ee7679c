//! Solver backends implementing the outbound [`Solver`](crate::port::outbound::solver::Solver) port.

mod highs;

pub use highs::HiGHSSolver;
