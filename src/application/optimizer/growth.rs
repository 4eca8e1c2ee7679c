//! Risk-penalized expected log growth.
//!
//! ```text
//! g(f) = Σ p_i log(1 + f_i b_i) + q_i log(1 - f_i) - λ fᵀ Σ f
//! ```
//!
//! `p` is the effective win probability, `q = 1 - p`, `b` the net odds and
//! `Σ` the corrected covariance matrix. The function is concave on
//! `0 <= f < 1`, so any stationary point over a convex region is the maximum.

use crate::domain::CovarianceMatrix;

/// The sizing objective for a fixed candidate set.
#[derive(Debug, Clone)]
pub struct GrowthObjective {
    probs: Vec<f64>,
    net_odds: Vec<f64>,
    covariance: CovarianceMatrix,
    risk_aversion: f64,
}

impl GrowthObjective {
    /// # Panics
    ///
    /// Panics if the inputs disagree on dimension.
    #[must_use]
    pub fn new(
        probs: Vec<f64>,
        net_odds: Vec<f64>,
        covariance: CovarianceMatrix,
        risk_aversion: f64,
    ) -> Self {
        assert_eq!(probs.len(), net_odds.len());
        assert_eq!(probs.len(), covariance.dim());
        Self {
            probs,
            net_odds,
            covariance,
            risk_aversion,
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.probs.len()
    }

    /// `g(f)`. Returns `-inf` outside the domain.
    #[must_use]
    pub fn value(&self, f: &[f64]) -> f64 {
        let growth: f64 = self
            .terms(f)
            .map(|(p, b, fi)| {
                if fi >= 1.0 || 1.0 + fi * b <= 0.0 {
                    f64::NEG_INFINITY
                } else {
                    p * (fi * b).ln_1p() + (1.0 - p) * (-fi).ln_1p()
                }
            })
            .sum();
        growth - self.risk_aversion * self.covariance.quad_form(f)
    }

    /// `∇g(f)`.
    #[must_use]
    pub fn gradient(&self, f: &[f64]) -> Vec<f64> {
        let penalty = self.covariance.mul_vec(f);
        self.terms(f)
            .zip(penalty)
            .map(|((p, b, fi), sf)| {
                p * b / (1.0 + fi * b) - (1.0 - p) / (1.0 - fi) - 2.0 * self.risk_aversion * sf
            })
            .collect()
    }

    /// `⟨∇g(f + γ d), d⟩`, the slope of `g` along `d` at step `γ`.
    #[must_use]
    pub fn directional_derivative(&self, f: &[f64], d: &[f64], gamma: f64) -> f64 {
        let point: Vec<f64> = f.iter().zip(d).map(|(fi, di)| fi + gamma * di).collect();
        dot(&self.gradient(&point), d)
    }

    fn terms<'a>(&'a self, f: &'a [f64]) -> impl Iterator<Item = (f64, f64, f64)> + 'a {
        self.probs
            .iter()
            .zip(&self.net_odds)
            .zip(f)
            .map(|((&p, &b), &fi)| (p, b, fi))
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BetId;
    use nalgebra::DMatrix;

    fn objective(p: f64, b: f64, lambda: f64) -> GrowthObjective {
        let cov = CovarianceMatrix::new(vec![BetId::from("a")], DMatrix::from_element(1, 1, p * (1.0 - p)));
        GrowthObjective::new(vec![p], vec![b], cov, lambda)
    }

    #[test]
    fn zero_fraction_has_zero_growth() {
        assert_eq!(objective(0.6, 1.0, 0.5).value(&[0.0]), 0.0);
    }

    #[test]
    fn gradient_vanishes_at_kelly_without_penalty() {
        let obj = objective(0.6, 1.0, 0.0);
        assert!(obj.gradient(&[0.2])[0].abs() < 1e-12);
        assert!(obj.gradient(&[0.1])[0] > 0.0);
        assert!(obj.gradient(&[0.3])[0] < 0.0);
    }

    #[test]
    fn penalty_lowers_growth() {
        let free = objective(0.6, 1.0, 0.0).value(&[0.1]);
        let penalized = objective(0.6, 1.0, 0.5).value(&[0.1]);
        assert!(penalized < free);
    }

    #[test]
    fn outside_domain_is_negative_infinity() {
        assert_eq!(objective(0.6, 1.0, 0.0).value(&[1.0]), f64::NEG_INFINITY);
    }

    #[test]
    fn directional_derivative_matches_gradient() {
        let obj = objective(0.6, 1.0, 0.3);
        let d = [0.25];
        let slope = obj.directional_derivative(&[0.0], &d, 0.4);
        assert!((slope - obj.gradient(&[0.1])[0] * 0.25).abs() < 1e-12);
    }
}
