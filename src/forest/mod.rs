//! Isolation forest: ensemble training and anomaly scoring.
//!
//! Implements the isolation-forest algorithm of Liu, Ting & Zhou (2008):
//! an ensemble of random binary partitioning trees, each grown over a small
//! subsample, scoring each record by how quickly it separates from the rest.
//! Anomalies (few and different) isolate in fewer splits than normal points.

mod tree;

pub use tree::{average_path_length, IsolationNode, IsolationTree};

use crate::detect::{self, Label};
use crate::error::{CentinelaError, Result};
use crate::primitives::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default ensemble size.
const DEFAULT_N_ESTIMATORS: usize = 100;

/// Default sub-sampling size (following the original paper).
const DEFAULT_SUBSAMPLE_SIZE: usize = 256;

/// Isolation forest anomaly detector.
///
/// Trains `n_estimators` independent trees, each over `max_samples` rows
/// drawn without replacement, then scores rows by their average path
/// length normalized to `(0, 1]`: near 1 means isolated almost
/// immediately (likely anomalous), near 0.5 means typical.
///
/// # Examples
///
/// ```
/// use centinela::prelude::*;
///
/// // Seven clustered rows and one far outlier.
/// let data = Matrix::from_vec(8, 2, vec![
///     1.0, 1.0, 1.1, 1.0, 1.0, 1.1, 0.9, 0.9,
///     1.1, 1.1, 1.0, 0.9, 0.9, 1.1, 50.0, 50.0,
/// ]).expect("valid matrix");
///
/// let mut forest = IsolationForest::new()
///     .with_n_estimators(50)
///     .with_contamination(0.125)
///     .with_random_state(42);
/// forest.fit(&data).expect("fit succeeds");
///
/// let scores = forest.score_samples(&data).expect("same layout");
/// let labels = forest.predict(&data).expect("same layout");
/// assert_eq!(scores.len(), 8);
/// assert_eq!(labels[7], Label::Anomalous);
/// ```
///
/// # Performance
///
/// - Training: O(T·ψ·log ψ) expected, T=trees, ψ=subsample size
/// - Scoring: O(rows·T·log ψ) expected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    /// Number of trees in the ensemble.
    n_estimators: usize,
    /// Subsample size ψ; `None` means `min(256, n_rows)` at fit time.
    max_samples: Option<usize>,
    /// Expected anomaly fraction, used by `predict`.
    contamination: f64,
    /// Random seed for reproducibility.
    random_state: Option<u64>,
    /// Trained trees after fitting.
    trees: Option<Vec<IsolationTree>>,
    /// Subsample size actually used at fit time.
    subsample_size: usize,
    /// Normalization constant c(ψ), fixed at fit time.
    c_norm: f64,
    /// Feature count the forest was trained with.
    n_features: usize,
}

impl Default for IsolationForest {
    fn default() -> Self {
        Self::new()
    }
}

impl IsolationForest {
    /// Creates a forest with default settings (100 trees, ψ = min(256, n),
    /// contamination 0.05).
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_samples: None,
            contamination: 0.05,
            random_state: None,
            trees: None,
            subsample_size: 0,
            c_norm: 0.0,
            n_features: 0,
        }
    }

    /// Sets the number of trees.
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the subsample size ψ used to build each tree.
    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    /// Sets the expected anomaly fraction used by [`predict`](Self::predict).
    #[must_use]
    pub fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Returns the configured number of trees.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Returns the configured contamination fraction.
    #[must_use]
    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    /// Returns true if the forest has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.trees.is_some()
    }

    /// Returns the subsample size ψ used at fit time.
    ///
    /// # Panics
    ///
    /// Panics if the forest is not fitted.
    #[must_use]
    pub fn subsample_size(&self) -> usize {
        assert!(self.is_fitted(), "Forest not fitted. Call fit() first.");
        self.subsample_size
    }

    /// Returns the feature count the forest was trained with.
    ///
    /// # Panics
    ///
    /// Panics if the forest is not fitted.
    #[must_use]
    pub fn n_features(&self) -> usize {
        assert!(self.is_fitted(), "Forest not fitted. Call fit() first.");
        self.n_features
    }

    /// Trains the ensemble on a feature matrix.
    ///
    /// Each tree draws its own subsample without replacement and grows with
    /// its own RNG; per-tree seeds are derived from the master seed up
    /// front, so a seeded fit is reproducible whether or not the `parallel`
    /// feature builds trees on the rayon pool.
    ///
    /// # Errors
    ///
    /// - [`CentinelaError::InsufficientData`] if the matrix has fewer than 2 rows.
    /// - [`CentinelaError::InvalidHyperparameter`] for a zero tree count or
    ///   a subsample size below 2.
    pub fn fit(&mut self, x: &Matrix<f64>) -> Result<()> {
        let n_rows = x.n_rows();

        if n_rows < 2 {
            return Err(CentinelaError::InsufficientData { n_samples: n_rows });
        }
        if self.n_estimators == 0 {
            return Err(CentinelaError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        if let Some(m) = self.max_samples {
            if m < 2 {
                return Err(CentinelaError::InvalidHyperparameter {
                    param: "max_samples".to_string(),
                    value: m.to_string(),
                    constraint: ">= 2".to_string(),
                });
            }
        }

        let psi = self
            .max_samples
            .unwrap_or(DEFAULT_SUBSAMPLE_SIZE)
            .min(n_rows);
        let height_limit = (psi as f64).log2().ceil() as usize;

        let mut master = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let tree_seeds: Vec<u64> = (0..self.n_estimators).map(|_| master.gen()).collect();

        #[cfg(feature = "parallel")]
        let trees: Vec<IsolationTree> = tree_seeds
            .par_iter()
            .map(|&seed| build_one_tree(x, psi, height_limit, seed))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let trees: Vec<IsolationTree> = tree_seeds
            .iter()
            .map(|&seed| build_one_tree(x, psi, height_limit, seed))
            .collect();

        self.trees = Some(trees);
        self.subsample_size = psi;
        self.c_norm = average_path_length(psi);
        self.n_features = x.n_cols();

        Ok(())
    }

    /// Computes the normalized anomaly score for every row.
    ///
    /// Scores lie in `(0, 1]` and are row-index-aligned with `x`. Scoring
    /// is read-only over immutable trees; calling it twice on the same
    /// matrix yields identical results.
    ///
    /// # Errors
    ///
    /// - [`CentinelaError::NotFitted`] if called before `fit`.
    /// - [`CentinelaError::MalformedRow`] if `x` has a different feature
    ///   count than the matrix the forest was trained on.
    pub fn score_samples(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        let trees = self
            .trees
            .as_ref()
            .ok_or_else(|| CentinelaError::not_fitted("IsolationForest"))?;

        if x.n_cols() != self.n_features {
            return Err(CentinelaError::MalformedRow {
                expected: self.n_features,
                actual: x.n_cols(),
            });
        }

        let n_rows = x.n_rows();

        #[cfg(feature = "parallel")]
        let scores: Vec<f64> = (0..n_rows)
            .into_par_iter()
            .map(|i| self.score_row(trees, x.row(i)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let scores: Vec<f64> = (0..n_rows)
            .map(|i| self.score_row(trees, x.row(i)))
            .collect();

        Ok(Vector::from_vec(scores))
    }

    /// Labels every row using the forest's configured contamination.
    ///
    /// Composes [`score_samples`](Self::score_samples) with
    /// [`detect::label_scores`]; to re-label at a different contamination
    /// without retraining, call the `detect` functions on the scores
    /// directly.
    ///
    /// # Errors
    ///
    /// Propagates scoring errors, plus
    /// [`CentinelaError::InvalidHyperparameter`] if the configured
    /// contamination is outside `(0, 1)`.
    pub fn predict(&self, x: &Matrix<f64>) -> Result<Vec<Label>> {
        let scores = self.score_samples(x)?;
        detect::label_scores(&scores, self.contamination)
    }

    /// `s = 2^(−E(h)/c(ψ))` for one row.
    fn score_row(&self, trees: &[IsolationTree], row: &[f64]) -> f64 {
        let total: f64 = trees.iter().map(|tree| tree.path_length(row)).sum();
        let mean_path = total / trees.len() as f64;
        2.0_f64.powf(-mean_path / self.c_norm)
    }
}

/// Builds one tree: draws ψ distinct rows with a seeded shuffle, then grows
/// the tree with the same RNG.
fn build_one_tree(x: &Matrix<f64>, psi: usize, height_limit: usize, seed: u64) -> IsolationTree {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..x.n_rows()).collect();
    indices.shuffle(&mut rng);
    indices.truncate(psi);
    IsolationTree::build(x, &indices, height_limit, &mut rng)
}

#[cfg(test)]
mod tests_iforest_contract;
