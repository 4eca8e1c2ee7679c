//! Bankroll and exposure limits applied by the optimizer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::error::DomainError;

/// No single fraction may reach 1, where `log(1 - f)` diverges.
pub const HARD_SINGLE_CAP: f64 = 0.95;

/// Allocations at or below this fraction are dropped.
pub const MIN_ALLOCATION: f64 = 0.001;

/// Per-event cap as a multiple of `max_single_bet` when none is set.
pub const DEFAULT_EVENT_MULTIPLIER: f64 = 1.2;

/// Risk constraints for one sizing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskLimits {
    pub bankroll: Decimal,
    /// Cap on the sum of all fractions.
    pub max_exposure: f64,
    /// Cap on any single fraction.
    pub max_single_bet: f64,
    /// Cap on the fraction summed over bets sharing an event.
    pub max_event_exposure: Option<f64>,
    /// Minimum edge for a bet to be considered.
    pub min_edge: f64,
    /// Weight λ of the covariance penalty.
    pub risk_aversion: f64,
    /// Multiplier on the fallback Kelly fraction.
    pub kelly_multiplier: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            bankroll: dec!(10000),
            max_exposure: 0.25,
            max_single_bet: 0.05,
            max_event_exposure: None,
            min_edge: 0.02,
            risk_aversion: 0.5,
            kelly_multiplier: 0.5,
        }
    }
}

impl RiskLimits {
    /// Check every limit against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLimit`] naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let unit = |v: f64| v.is_finite() && v > 0.0 && v <= 1.0;

        if self.bankroll <= Decimal::ZERO {
            return Err(invalid("bankroll", "must be greater than 0"));
        }
        if !unit(self.max_exposure) {
            return Err(invalid("max_exposure", "must be in (0, 1]"));
        }
        if !unit(self.max_single_bet) {
            return Err(invalid("max_single_bet", "must be in (0, 1]"));
        }
        if self.max_event_exposure.is_some_and(|cap| !unit(cap)) {
            return Err(invalid("max_event_exposure", "must be in (0, 1]"));
        }
        if !(self.min_edge.is_finite() && (0.0..1.0).contains(&self.min_edge)) {
            return Err(invalid("min_edge", "must be in [0, 1)"));
        }
        if !(self.risk_aversion.is_finite() && self.risk_aversion >= 0.0) {
            return Err(invalid("risk_aversion", "must be 0 or greater"));
        }
        if !unit(self.kelly_multiplier) {
            return Err(invalid("kelly_multiplier", "must be in (0, 1]"));
        }
        Ok(())
    }

    /// Upper bound on a single fraction after the hard cap.
    #[must_use]
    pub fn single_cap(&self) -> f64 {
        self.max_single_bet.min(HARD_SINGLE_CAP)
    }

    /// Effective per-event cap.
    #[must_use]
    pub fn event_cap(&self) -> f64 {
        self.max_event_exposure
            .unwrap_or(self.max_single_bet * DEFAULT_EVENT_MULTIPLIER)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> DomainError {
    DomainError::InvalidLimit { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_derive_from_single_bet() {
        let limits = RiskLimits::default();
        assert!((limits.event_cap() - 0.06).abs() < 1e-12);
        assert_eq!(limits.single_cap(), 0.05);

        let loose = RiskLimits {
            max_single_bet: 1.0,
            max_event_exposure: Some(0.3),
            ..RiskLimits::default()
        };
        assert_eq!(loose.single_cap(), HARD_SINGLE_CAP);
        assert_eq!(loose.event_cap(), 0.3);
    }

    #[test]
    fn validate_rejects_out_of_range_limits() {
        assert_eq!(RiskLimits::default().validate(), Ok(()));

        let cases = [
            (RiskLimits { bankroll: dec!(-5), ..RiskLimits::default() }, "bankroll"),
            (RiskLimits { max_exposure: -0.1, ..RiskLimits::default() }, "max_exposure"),
            (RiskLimits { max_single_bet: 0.0, ..RiskLimits::default() }, "max_single_bet"),
            (
                RiskLimits { max_event_exposure: Some(1.5), ..RiskLimits::default() },
                "max_event_exposure",
            ),
            (RiskLimits { min_edge: f64::NAN, ..RiskLimits::default() }, "min_edge"),
            (RiskLimits { risk_aversion: -1.0, ..RiskLimits::default() }, "risk_aversion"),
            (RiskLimits { kelly_multiplier: 2.0, ..RiskLimits::default() }, "kelly_multiplier"),
        ];
        for (limits, expected) in cases {
            match limits.validate() {
                Err(DomainError::InvalidLimit { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }
}
