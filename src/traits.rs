//! Core traits for data transformers.
//!
//! These traits define the API contracts shared across the pipeline.

use crate::error::Result;
use crate::primitives::Matrix;

/// Trait for matrix-to-matrix data transformers (scalers and the like).
///
/// Parameters are learned in `fit` and applied in `transform`; the two
/// steps are split so the same fitted parameters can be applied to a new
/// matrix with the same feature layout.
///
/// # Examples
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
/// assert_eq!(scaled.shape(), (3, 2));
/// ```
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f64>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if transformer is not fitted.
    fn transform(&self, x: &Matrix<f64>) -> Result<Matrix<f64>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f64>) -> Result<Matrix<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}
