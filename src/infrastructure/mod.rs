//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic: configuration files, slate loading and logging setup.

pub mod config;
