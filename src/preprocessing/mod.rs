//! Preprocessing transformers for data standardization.
//!
//! # Example
//!
//! ```
//! use centinela::prelude::*;
//!
//! // Create data with different scales
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).expect("valid matrix dimensions");
//!
//! // Standardize to zero mean and unit variance
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
//!
//! // Each column now has mean ≈ 0 and std ≈ 1
//! assert!(scaled.get(0, 0).abs() < 2.0);
//! ```

use crate::error::{CentinelaError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Standard deviations at or below this are treated as zero variance.
const STD_EPSILON: f64 = 1e-10;

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std
///
/// Columns with zero variance come out all-zero: centering leaves them at
/// zero and the division is skipped rather than dividing by zero. Scaling
/// parameters are computed fresh per fit; nothing persists across runs.
///
/// # Example
///
/// ```
/// use centinela::prelude::*;
///
/// let data = Matrix::from_vec(3, 2, vec![
///     0.0, 0.0,
///     1.0, 10.0,
///     2.0, 20.0,
/// ]).expect("valid matrix dimensions");
///
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
///
/// // Verify standardization
/// let (n_rows, n_cols) = scaled.shape();
/// for j in 0..n_cols {
///     let mut sum = 0.0;
///     for i in 0..n_rows {
///         sum += scaled.get(i, j);
///     }
///     let mean = sum / n_rows as f64;
///     assert!(mean.abs() < 1e-9, "Mean should be ~0");
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f64>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f64>>,
}

impl StandardScaler {
    /// Creates a new `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        self.mean
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f64] {
        self.std
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }
}

impl Transformer for StandardScaler {
    /// Computes the mean and standard deviation of each feature.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        let mut mean = vec![0.0; n_features];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..n_samples {
                sum += x.get(i, j);
            }
            *mean_j = sum / n_samples as f64;
        }

        // Population std (divide by n, not n-1)
        let mut std = vec![0.0; n_features];
        for (j, std_j) in std.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for i in 0..n_samples {
                let diff = x.get(i, j) - mean[j];
                sum_sq += diff * diff;
            }
            *std_j = (sum_sq / n_samples as f64).sqrt();
        }

        self.mean = Some(mean);
        self.std = Some(std);

        Ok(())
    }

    /// Standardizes the data using fitted mean and std.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| CentinelaError::not_fitted("StandardScaler"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| CentinelaError::not_fitted("StandardScaler"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(CentinelaError::DimensionMismatch {
                expected: format!("{} features", mean.len()),
                actual: format!("{n_features} features"),
            });
        }

        let mut result = vec![0.0; n_samples * n_features];

        for i in 0..n_samples {
            for j in 0..n_features {
                let centered = x.get(i, j) - mean[j];
                result[i * n_features + j] = if std[j] > STD_EPSILON {
                    centered / std[j]
                } else {
                    0.0
                };
            }
        }

        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}
