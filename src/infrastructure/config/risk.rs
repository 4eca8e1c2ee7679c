//! Risk management configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::RiskLimits;

/// Risk management configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RiskConfig {
    /// Capital the fractions are taken of.
    #[serde(default = "default_bankroll")]
    pub bankroll: Decimal,
    /// Maximum sum of all bankroll fractions.
    #[serde(default = "default_max_exposure")]
    pub max_exposure: f64,
    /// Maximum fraction on any single bet.
    #[serde(default = "default_max_single_bet")]
    pub max_single_bet: f64,
    /// Maximum combined fraction on bets sharing an event. Defaults to
    /// 1.2 times `max_single_bet`.
    #[serde(default)]
    pub max_event_exposure: Option<f64>,
    /// Minimum edge for a bet to be sized.
    #[serde(default = "default_min_edge")]
    pub min_edge: f64,
    /// Weight of the covariance penalty.
    #[serde(default = "default_risk_aversion")]
    pub risk_aversion: f64,
    /// Multiplier on the fallback Kelly fraction (0.5 = half Kelly).
    #[serde(default = "default_kelly_multiplier")]
    pub kelly_multiplier: f64,
}

fn default_bankroll() -> Decimal {
    Decimal::from(10_000)
}

const fn default_max_exposure() -> f64 {
    0.25
}

const fn default_max_single_bet() -> f64 {
    0.05
}

const fn default_min_edge() -> f64 {
    0.02
}

const fn default_risk_aversion() -> f64 {
    0.5
}

const fn default_kelly_multiplier() -> f64 {
    0.5
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            bankroll: default_bankroll(),
            max_exposure: default_max_exposure(),
            max_single_bet: default_max_single_bet(),
            max_event_exposure: None,
            min_edge: default_min_edge(),
            risk_aversion: default_risk_aversion(),
            kelly_multiplier: default_kelly_multiplier(),
        }
    }
}

impl From<RiskConfig> for RiskLimits {
    fn from(config: RiskConfig) -> Self {
        Self {
            bankroll: config.bankroll,
            max_exposure: config.max_exposure,
            max_single_bet: config.max_single_bet,
            max_event_exposure: config.max_event_exposure,
            min_edge: config.min_edge,
            risk_aversion: config.risk_aversion,
            kelly_multiplier: config.kelly_multiplier,
        }
    }
}
