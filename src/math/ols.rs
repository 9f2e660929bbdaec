//! Least squares solver and straight-line trend fitting.
//!
//! The forecaster fits `y = a + b * x` to a short monthly series where
//! `x` is the point index (0, 1, 2, ...). The design matrix is tiny (two
//! columns, a few dozen rows at most), so we solve it through SVD, which stays
//! robust for tall matrices and reports rank problems instead of panicking.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A fitted straight line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearTrend {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit an ordinary least squares line to `(index, value)` pairs.
///
/// Needs at least two finite values; returns `None` otherwise or when the
/// solve degenerates.
pub fn fit_index_trend(values: &[f64]) -> Option<LinearTrend> {
    let n = values.len();
    if n < 2 || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let x = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { row as f64 });
    let y = DVector::from_column_slice(values);

    let beta = solve_least_squares(&x, &y)?;
    Some(LinearTrend {
        intercept: beta[0],
        slope: beta[1],
    })
}
