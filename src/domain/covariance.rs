//! Covariance matrices over bet outcomes.
//!
//! Entries are built from conditional structure, so the raw matrix is not
//! guaranteed positive semi-definite. [`CovarianceMatrix::psd_corrected`]
//! symmetrizes and lifts the spectrum with an eigenvalue floor before the
//! matrix is used as a quadratic penalty.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::id::BetId;

/// Ridge added to every corrected matrix so the quadratic form is strictly convex.
pub const DEFAULT_RIDGE: f64 = 1e-6;

/// An n x n covariance matrix labelled by bet ids.
#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    ids: Vec<BetId>,
    matrix: DMatrix<f64>,
}

impl CovarianceMatrix {
    /// Wrap a square matrix whose rows and columns follow `ids`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not `ids.len()` square.
    #[must_use]
    pub fn new(ids: Vec<BetId>, matrix: DMatrix<f64>) -> Self {
        assert_eq!(matrix.nrows(), ids.len(), "row count must match ids");
        assert_eq!(matrix.ncols(), ids.len(), "column count must match ids");
        Self { ids, matrix }
    }

    #[must_use]
    pub fn ids(&self) -> &[BetId] {
        &self.ids
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    #[must_use]
    pub const fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Row-major copy, convenient for serialization.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.dim())
            .map(|i| self.matrix.row(i).iter().copied().collect())
            .collect()
    }

    /// True when every off-diagonal entry is zero.
    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        let n = self.dim();
        (0..n).all(|i| (0..n).all(|j| i == j || self.matrix[(i, j)] == 0.0))
    }

    /// Smallest eigenvalue of the symmetrized matrix.
    #[must_use]
    pub fn min_eigenvalue(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        symmetrized(&self.matrix)
            .symmetric_eigenvalues()
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    /// Symmetrize and shift by a multiple of the identity so that the minimum
    /// eigenvalue is at least `ridge`.
    #[must_use]
    pub fn psd_corrected(&self, ridge: f64) -> Self {
        let n = self.dim();
        if n == 0 {
            return self.clone();
        }

        let sym = symmetrized(&self.matrix);
        let min_eigen = sym
            .symmetric_eigenvalues()
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        let shift = if min_eigen < 0.0 {
            debug!(
                min_eigenvalue = min_eigen,
                "covariance not positive semi-definite, applying eigenvalue floor"
            );
            ridge - min_eigen
        } else {
            ridge
        };

        Self {
            ids: self.ids.clone(),
            matrix: sym + DMatrix::identity(n, n) * shift,
        }
    }

    /// `Σ f`.
    #[must_use]
    pub fn mul_vec(&self, f: &[f64]) -> Vec<f64> {
        let v = DVector::from_column_slice(f);
        (&self.matrix * v).iter().copied().collect()
    }

    /// `fᵀ Σ f`.
    #[must_use]
    pub fn quad_form(&self, f: &[f64]) -> f64 {
        let v = DVector::from_column_slice(f);
        v.dot(&(&self.matrix * &v))
    }
}

fn symmetrized(m: &DMatrix<f64>) -> DMatrix<f64> {
    (m + m.transpose()) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<BetId> {
        (0..n).map(|i| BetId::from(format!("b{i}"))).collect()
    }

    #[test]
    fn corrected_matrix_is_symmetric_and_psd() {
        // Off-diagonals larger than the variances: indefinite.
        let raw = DMatrix::from_row_slice(2, 2, &[0.25, 0.4, 0.3, 0.24]);
        let cov = CovarianceMatrix::new(ids(2), raw);
        assert!(cov.min_eigenvalue() < 0.0);

        let fixed = cov.psd_corrected(DEFAULT_RIDGE);
        assert_eq!(fixed.get(0, 1), fixed.get(1, 0));
        assert!(fixed.min_eigenvalue() >= DEFAULT_RIDGE * 0.5);
    }

    #[test]
    fn psd_matrix_only_gets_ridge() {
        let raw = DMatrix::from_diagonal(&DVector::from_vec(vec![0.25, 0.24]));
        let cov = CovarianceMatrix::new(ids(2), raw);
        let fixed = cov.psd_corrected(1e-6);
        assert!((fixed.get(0, 0) - 0.250_001).abs() < 1e-12);
        assert!(cov.is_diagonal());
    }

    #[test]
    fn quad_form_matches_manual_product() {
        let raw = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let cov = CovarianceMatrix::new(ids(2), raw);
        // [1, 2] * [[2,1],[1,3]] * [1,2]^T = 2 + 2*1*2 + 3*4 = 18
        assert!((cov.quad_form(&[1.0, 2.0]) - 18.0).abs() < 1e-12);
        assert_eq!(cov.mul_vec(&[1.0, 2.0]), vec![4.0, 7.0]);
    }

    #[test]
    fn empty_matrix_is_harmless() {
        let cov = CovarianceMatrix::new(vec![], DMatrix::zeros(0, 0));
        assert!(cov.is_empty());
        assert_eq!(cov.min_eigenvalue(), 0.0);
        assert!(cov.psd_corrected(DEFAULT_RIDGE).is_empty());
    }
}
