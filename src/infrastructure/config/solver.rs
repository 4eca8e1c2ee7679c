//! Solver backend configuration.

use std::sync::Arc;

use serde::Deserialize;

use crate::adapter::solver::HiGHSSolver;
use crate::application::optimizer::FrankWolfeConfig;
use crate::port::outbound::solver::Solver;

/// Available LP backends for the convex sizing path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverBackend {
    /// HiGHS via good_lp.
    #[default]
    Highs,
    /// No backend; every run uses fractional Kelly.
    None,
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub backend: SolverBackend,
    /// Maximum Frank-Wolfe iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Frank-Wolfe gap tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

const fn default_max_iterations() -> usize {
    200
}

const fn default_tolerance() -> f64 {
    1e-7
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::default(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

impl SolverConfig {
    /// Instantiate the configured backend.
    #[must_use]
    pub fn build(&self) -> Option<Arc<dyn Solver>> {
        match self.backend {
            SolverBackend::Highs => Some(Arc::new(HiGHSSolver::new())),
            SolverBackend::None => None,
        }
    }

    #[must_use]
    pub fn frank_wolfe(&self) -> FrankWolfeConfig {
        FrankWolfeConfig {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}
