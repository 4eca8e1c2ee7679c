//! Fractional Kelly sizing, used when the convex path is unavailable.
//!
//! Each bet is sized independently: `f* = (b p - q) / b`, scaled by the
//! configured multiplier and the bet's probability trust, then clipped to the
//! single-bet cap. Covariance and event caps are not considered; only the
//! total exposure cap is enforced, by proportional scaling.

use crate::domain::limits::MIN_ALLOCATION;
use crate::domain::{Bet, RiskLimits};

/// Full Kelly fraction for net odds `b` and win probability `p`.
///
/// Negative when the bet has no edge.
#[must_use]
pub fn kelly_fraction(p: f64, b: f64) -> f64 {
    if b <= 0.0 {
        return 0.0;
    }
    (b * p - (1.0 - p)) / b
}

/// Fractional Kelly sizes for `bets`, in order.
///
/// Entries at or below the minimum allocation are zero.
#[must_use]
pub fn fractional_kelly(bets: &[&Bet], limits: &RiskLimits) -> Vec<f64> {
    let cap = limits.single_cap();
    let mut fractions: Vec<f64> = bets
        .iter()
        .map(|bet| {
            let full = kelly_fraction(bet.effective_prob(), bet.net_odds());
            let sized = full * limits.kelly_multiplier * bet.probability_trust();
            let clipped = sized.clamp(0.0, cap);
            if clipped > MIN_ALLOCATION {
                clipped
            } else {
                0.0
            }
        })
        .collect();

    let total: f64 = fractions.iter().sum();
    if total > limits.max_exposure && total > 0.0 {
        let scale = limits.max_exposure / total;
        for f in &mut fractions {
            *f *= scale;
        }
    }

    fractions
}
