//! Ordinary least squares and fit-quality metrics
//!
//! Solves the normal equations `XᵀX β = Xᵀy` by Gaussian elimination with
//! partial pivoting. A column without a usable pivot makes the system
//! rank-deficient and is reported by index; callers map it back to a
//! feature name.

use crate::encoding::DesignMatrix;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Relative pivot tolerance for the elimination
const PIVOT_TOLERANCE: f64 = 1e-10;

/// OLS estimator settings
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression {
    fit_intercept: bool,
}

impl LinearRegression {
    /// Estimator without an intercept term
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fit_intercept: false,
        }
    }

    /// Add a separate intercept term
    ///
    /// Leave this off for a complete one-hot design: the indicator columns
    /// already sum to the constant column.
    #[must_use]
    pub const fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fit coefficients to `(x, y)`
    ///
    /// # Errors
    /// - `InvalidInput` if `y` length differs from `x` rows, or there are no rows
    /// - `RankDeficient` if the normal equations are singular; `column`
    ///   indexes `x`'s columns (the intercept is never reported)
    pub fn fit(&self, x: &DesignMatrix, y: &[f64]) -> Result<LinearModel> {
        if x.rows() != y.len() {
            return Err(Error::InvalidInput(format!(
                "Design has {} rows but target has {}",
                x.rows(),
                y.len()
            )));
        }
        if x.rows() == 0 {
            return Err(Error::InvalidInput("Cannot fit on zero rows".to_string()));
        }

        let offset = usize::from(self.fit_intercept);
        let p = x.cols() + offset;

        // Accumulate XᵀX and Xᵀy over augmented rows [1?, x_i]
        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        let mut augmented = vec![1.0; p];
        for (i, &target) in y.iter().enumerate() {
            augmented[offset..].copy_from_slice(x.row(i));
            for a in 0..p {
                let va = augmented[a];
                if va == 0.0 {
                    continue;
                }
                xty[a] += va * target;
                for b in 0..p {
                    xtx[a][b] += va * augmented[b];
                }
            }
        }

        let beta = solve(xtx, xty).map_err(|column| {
            // The intercept column is the constant; blame the feature instead
            Error::RankDeficient {
                column: column.saturating_sub(offset),
            }
        })?;
        debug!(rows = x.rows(), features = x.cols(), "fitted least squares");

        let (intercept, coefficients) = if self.fit_intercept {
            (beta[0], beta[1..].to_vec())
        } else {
            (0.0, beta)
        };
        Ok(LinearModel {
            intercept,
            coefficients,
        })
    }
}

/// Fitted linear mapping `ŷ = intercept + x · coefficients`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearModel {
    /// Intercept term (0 when fitted without one)
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient per design column
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Prediction for one feature row
    #[must_use]
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, b)| x * b)
                .sum::<f64>()
    }

    /// Predictions for every row of a design matrix
    ///
    /// # Errors
    /// Returns `InvalidInput` if the column count does not match.
    pub fn predict(&self, x: &DesignMatrix) -> Result<Vec<f64>> {
        if x.cols() != self.coefficients.len() {
            return Err(Error::InvalidInput(format!(
                "Model expects {} features, design has {}",
                self.coefficients.len(),
                x.cols()
            )));
        }
        Ok((0..x.rows()).map(|i| self.predict_row(x.row(i))).collect())
    }
}

/// Gaussian elimination with partial pivoting; `Err(column)` on a missing pivot
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> std::result::Result<Vec<f64>, usize> {
    let n = b.len();
    let scale = a
        .iter()
        .enumerate()
        .map(|(i, row)| row[i].abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);

    for k in 0..n {
        let pivot_row = (k..n)
            .max_by(|&i, &j| a[i][k].abs().total_cmp(&a[j][k].abs()))
            .unwrap_or(k);
        if a[pivot_row][k].abs() <= PIVOT_TOLERANCE * scale {
            return Err(k);
        }
        a.swap(k, pivot_row);
        b.swap(k, pivot_row);

        for i in (k + 1)..n {
            let factor = a[i][k] / a[k][k];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[i][j] -= factor * a[k][j];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut x = vec![0.0; n];
    for k in (0..n).rev() {
        let tail: f64 = ((k + 1)..n).map(|j| a[k][j] * x[j]).sum();
        x[k] = (b[k] - tail) / a[k][k];
    }
    Ok(x)
}

/// Mean squared error of predictions
///
/// # Errors
/// Returns `InvalidInput` for empty, mismatched, or non-finite inputs, and
/// when the error itself overflows `f64`.
#[allow(clippy::cast_precision_loss)]
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let sse: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    let mse = sse / actual.len() as f64;
    if !mse.is_finite() {
        return Err(Error::InvalidInput(
            "Mean squared error overflows f64; reduce the outcome's spread".to_string(),
        ));
    }
    Ok(mse)
}

/// Coefficient of determination
///
/// `1 - SS_res / SS_tot`, computed on values scaled by the largest magnitude
/// so the sums of squares cannot overflow. A constant target gives 1.0 for a
/// perfect fit and 0.0 otherwise, so the score is never NaN.
///
/// # Errors
/// Returns `InvalidInput` for empty, mismatched, or non-finite inputs.
#[allow(clippy::cast_precision_loss)]
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let scale = actual
        .iter()
        .chain(predicted)
        .map(|v| v.abs())
        .fold(0.0_f64, f64::max);
    if scale == 0.0 {
        return Ok(1.0);
    }

    let n = actual.len() as f64;
    let mean = actual.iter().map(|y| y / scale).sum::<f64>() / n;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y / scale - p / scale).powi(2))
        .sum();
    let ss_tot: f64 = actual.iter().map(|y| (y / scale - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() {
        return Err(Error::InvalidInput("Cannot score an empty partition".to_string()));
    }
    if actual.len() != predicted.len() {
        return Err(Error::InvalidInput(format!(
            "Length mismatch: {} actual vs {} predicted",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.iter().chain(predicted).any(|v| !v.is_finite()) {
        return Err(Error::InvalidInput("Cannot score non-finite values".to_string()));
    }
    Ok(())
}
