//! Infrastructure configuration modules.

pub mod logging;
pub mod risk;
pub mod settings;
pub mod slate;
pub mod solver;
