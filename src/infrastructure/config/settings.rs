//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. Every
//! section is optional; missing sections take their defaults.
//!
//! # Example
//!
//! ```no_run
//! use betgraph::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("betgraph.toml")?;
//!     config.init_logging();
//!     let optimizer = config.optimizer()?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::logging::LoggingConfig;
use super::risk::RiskConfig;
use super::solver::SolverConfig;
use crate::application::optimizer::PortfolioOptimizer;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Bankroll and exposure limits.
    #[serde(default)]
    pub risk: RiskConfig,

    /// Backend and iteration settings for the convex sizing path.
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., an exposure cap outside (0, 1])
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let risk = &self.risk;

        if risk.bankroll <= Decimal::ZERO {
            return Err(invalid("bankroll", "must be greater than 0"));
        }
        if !(risk.max_exposure > 0.0 && risk.max_exposure <= 1.0) {
            return Err(invalid("max_exposure", "must be in (0, 1]"));
        }
        if !(risk.max_single_bet > 0.0 && risk.max_single_bet < 1.0) {
            return Err(invalid("max_single_bet", "must be in (0, 1)"));
        }
        if risk.max_single_bet > risk.max_exposure {
            return Err(invalid("max_single_bet", "must not exceed max_exposure"));
        }
        if let Some(cap) = risk.max_event_exposure {
            if !(cap > 0.0 && cap <= 1.0) {
                return Err(invalid("max_event_exposure", "must be in (0, 1]"));
            }
        }
        if !(0.0..1.0).contains(&risk.min_edge) {
            return Err(invalid("min_edge", "must be in [0, 1)"));
        }
        if !(risk.risk_aversion.is_finite() && risk.risk_aversion >= 0.0) {
            return Err(invalid("risk_aversion", "must be 0 or greater"));
        }
        if !(risk.kelly_multiplier > 0.0 && risk.kelly_multiplier <= 1.0) {
            return Err(invalid("kelly_multiplier", "must be in (0, 1]"));
        }

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(invalid("format", "must be \"pretty\" or \"json\""));
        }

        if self.solver.max_iterations == 0 {
            return Err(invalid("max_iterations", "must be greater than 0"));
        }
        if !(self.solver.tolerance.is_finite() && self.solver.tolerance > 0.0) {
            return Err(invalid("tolerance", "must be greater than 0"));
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Build an optimizer from the risk and solver sections.
    ///
    /// # Errors
    ///
    /// Returns a domain error if the risk section holds an out-of-range limit.
    pub fn optimizer(&self) -> Result<PortfolioOptimizer> {
        let optimizer = PortfolioOptimizer::try_new(self.risk.clone().into())?
            .with_frank_wolfe(self.solver.frank_wolfe());
        Ok(match self.solver.build() {
            Some(solver) => optimizer.with_solver(solver),
            None => optimizer,
        })
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::infrastructure::config::solver::SolverBackend;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.optimizer().unwrap().solver_name(), Some("highs"));
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::parse_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [risk]
            bankroll = 2500
            max_exposure = 0.3
            max_single_bet = 0.1
            max_event_exposure = 0.15
            min_edge = 0.03
            risk_aversion = 1.0
            kelly_multiplier = 0.25

            [solver]
            backend = "none"
            max_iterations = 50
            tolerance = 1e-6
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, "json");
        assert_eq!(config.risk.bankroll, Decimal::from(2500));
        assert_eq!(config.risk.max_event_exposure, Some(0.15));
        assert_eq!(config.solver.backend, SolverBackend::None);
        assert_eq!(config.solver.frank_wolfe().max_iterations, 50);
        assert!(config.optimizer().unwrap().solver_name().is_none());
    }

    #[test]
    fn rejects_single_above_total() {
        let result = Config::parse_toml("[risk]\nmax_exposure = 0.1\nmax_single_bet = 0.2\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "max_single_bet",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_zero_iterations() {
        let result = Config::parse_toml("[solver]\nmax_iterations = 0\n");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "max_iterations",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_unknown_backend() {
        let result = Config::parse_toml("[solver]\nbackend = \"gurobi\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }
}
