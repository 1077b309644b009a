//! Pairwise Pearson correlation between outcome columns

use crate::dataset::Dataset;
use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};

/// Symmetric 4x4 correlation matrix indexed by [`Outcome::ALL`] order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    values: [[f64; 4]; 4],
}

impl CorrelationMatrix {
    /// Correlate every pair of outcome columns
    ///
    /// A zero-variance column correlates 0.0 with the others. The diagonal
    /// is always 1.0.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let columns: Vec<Vec<f64>> = Outcome::ALL.iter().map(|&o| dataset.column(o)).collect();

        let mut values = [[0.0; 4]; 4];
        for i in 0..4 {
            values[i][i] = 1.0;
            for j in (i + 1)..4 {
                let r = pearson(&columns[i], &columns[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Self { values }
    }

    /// Correlation between two outcomes
    #[must_use]
    pub fn get(&self, a: Outcome, b: Outcome) -> f64 {
        self.values[a as usize][b as usize]
    }

    /// Raw matrix rows
    #[must_use]
    pub const fn values(&self) -> &[[f64; 4]; 4] {
        &self.values
    }
}

#[allow(clippy::cast_precision_loss)]
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        0.0
    } else {
        (cov / denom).clamp(-1.0, 1.0)
    }
}
