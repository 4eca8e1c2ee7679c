//! Outbound ports: dependencies the application calls out to.

pub mod solver;
