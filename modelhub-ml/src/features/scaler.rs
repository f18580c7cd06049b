//! Per-feature standardization fitted once at training time.

use super::matrix::FeatureMatrix;
use crate::error::{MlError, MlResult};
use serde::{Deserialize, Serialize};

/// Fitted mean and population standard deviation for each feature column.
///
/// A column whose standard deviation is zero (within floating-point noise) is
/// divided by one instead, so its standardized output is `x - mean`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Compute per-column mean and standard deviation over `matrix`.
    pub fn fit(matrix: &FeatureMatrix) -> MlResult<Self> {
        let Some(first) = matrix.first() else {
            return Err(MlError::training("Cannot fit scaler on an empty dataset"));
        };
        let width = first.len();
        if matrix.iter().any(|row| row.len() != width) {
            return Err(MlError::training("Feature rows have inconsistent widths"));
        }

        let n = matrix.len() as f64;
        let mut means = vec![0.0; width];
        for row in matrix {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; width];
        for row in matrix {
            for ((std, mean), value) in stds.iter_mut().zip(&means).zip(row) {
                *std += (value - mean).powi(2);
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
        }

        Ok(Self { means, stds })
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Standardize `matrix` with the fitted statistics.
    pub fn transform(&self, matrix: &FeatureMatrix) -> MlResult<FeatureMatrix> {
        matrix.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn transform_row(&self, row: &[f64]) -> MlResult<Vec<f64>> {
        if row.len() != self.n_features() {
            return Err(MlError::invalid_input(format!(
                "Expected {} features, got {}",
                self.n_features(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(value, (mean, std))| (value - mean) / effective_scale(*std, *mean))
            .collect())
    }
}

/// Divisor for a column: its standard deviation, or one for constant columns.
fn effective_scale(std: f64, mean: f64) -> f64 {
    let noise = 10.0 * f64::EPSILON * mean.abs().max(1.0);
    if std <= noise { 1.0 } else { std }
}
