//! Inbound adapters (entry points into the application).

pub mod cli;
