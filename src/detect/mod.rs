//! Decision labeling: anomaly scores to Normal/Anomalous labels.
//!
//! Labeling is a free-standing step over scores rather than part of
//! training, so a host can re-label the same scored run at a different
//! contamination level without retraining the forest.

use crate::error::{CentinelaError, Result};
use crate::primitives::Vector;
use serde::{Deserialize, Serialize};

/// Binary decision for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// Score below the contamination threshold.
    Normal,
    /// Score at or above the contamination threshold.
    Anomalous,
}

/// Per-row scoring result, row-index-aligned with the scored matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Normalized anomaly score in `(0, 1]`.
    pub score: f64,
    /// Decision at the requested contamination level.
    pub label: Label,
}

/// Validates a contamination fraction.
fn check_contamination(contamination: f64) -> Result<()> {
    if contamination > 0.0 && contamination < 1.0 {
        Ok(())
    } else {
        Err(CentinelaError::InvalidHyperparameter {
            param: "contamination".to_string(),
            value: contamination.to_string(),
            constraint: "in (0, 1)".to_string(),
        })
    }
}

/// Computes the decision threshold for a contamination fraction.
///
/// Nearest-rank quantile: the threshold is the k-th highest score where
/// `k = round(contamination × n)`, so the top `contamination` fraction of
/// rows sits at or above it. When `k` rounds to zero the threshold is
/// `+∞` and nothing is flagged.
///
/// # Errors
///
/// Returns an error if `contamination` is outside `(0, 1)` or `scores` is
/// empty.
///
/// # Panics
///
/// Panics if a score is NaN (the scorer never produces one).
///
/// # Examples
///
/// ```
/// use centinela::detect::score_threshold;
/// use centinela::primitives::Vector;
///
/// let scores = Vector::from_slice(&[0.4, 0.45, 0.5, 0.48, 0.9]);
/// let threshold = score_threshold(&scores, 0.2).expect("valid contamination");
/// assert_eq!(threshold, 0.9);
/// ```
pub fn score_threshold(scores: &Vector<f64>, contamination: f64) -> Result<f64> {
    check_contamination(contamination)?;
    let n = scores.len();
    if n == 0 {
        return Err(CentinelaError::empty_input("scores"));
    }

    let k = (contamination * n as f64).round() as usize;
    if k == 0 {
        return Ok(f64::INFINITY);
    }
    let k = k.min(n);

    let mut sorted: Vec<f64> = scores.as_slice().to_vec();
    sorted.sort_by(|a, b| {
        b.partial_cmp(a)
            .expect("scores should be comparable (not NaN)")
    });
    Ok(sorted[k - 1])
}

/// Labels every score against the contamination threshold.
///
/// Rows scoring at or above the threshold are `Anomalous` (boundary ties
/// included), the rest `Normal`. Output is row-index-aligned with the
/// input.
///
/// # Errors
///
/// Returns an error if `contamination` is outside `(0, 1)` or `scores` is
/// empty.
pub fn label_scores(scores: &Vector<f64>, contamination: f64) -> Result<Vec<Label>> {
    let threshold = score_threshold(scores, contamination)?;
    Ok(scores
        .iter()
        .map(|&s| {
            if s >= threshold {
                Label::Anomalous
            } else {
                Label::Normal
            }
        })
        .collect())
}

/// Joins scores and labels into row-aligned [`ScoreRecord`]s.
///
/// # Errors
///
/// Returns an error if `contamination` is outside `(0, 1)` or `scores` is
/// empty.
pub fn score_records(scores: &Vector<f64>, contamination: f64) -> Result<Vec<ScoreRecord>> {
    let labels = label_scores(scores, contamination)?;
    Ok(scores
        .iter()
        .zip(labels)
        .map(|(&score, label)| ScoreRecord { score, label })
        .collect())
}

/// Row indices ordered by descending score (ties keep row order).
///
/// Hosts use this to present or export the most anomalous records first
/// while still joining back to the source table by index.
///
/// # Panics
///
/// Panics if a score is NaN (the scorer never produces one).
#[must_use]
pub fn rank_indices(scores: &Vector<f64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores
            .get(b)
            .partial_cmp(&scores.get(a))
            .expect("scores should be comparable (not NaN)")
    });
    indices
}
