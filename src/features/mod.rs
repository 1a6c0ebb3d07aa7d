//! Feature preparation: raw dataset to pure-numeric matrix.
//!
//! [`FeatureEncoder`] learns a feature layout from a dataset (`fit`) and
//! renders any dataset with the same columns into a numeric matrix
//! (`transform`): temporal columns decompose into hour/day/weekday
//! sub-features, categorical columns one-hot encode against a vocabulary
//! fixed at fit time, numeric columns pass through. Every emitted value is
//! finite; missing and non-finite inputs become `0.0`.

use crate::dataset::{infer_schema, Cell, ColumnKind, Dataset};
use crate::error::{CentinelaError, Result};
use crate::primitives::Matrix;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Datetime layouts tried in order when parsing a temporal text cell.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only layouts, promoted to midnight when they match.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// One fitted raw column and how it renders into features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum EncodedColumn {
    /// Single pass-through feature.
    Numeric { name: String },
    /// Three derived features: hour (0-23), day (1-31), weekday (0-6, Mon=0).
    Temporal { name: String },
    /// One 0/1 indicator per retained level; the first observed level
    /// (lexicographic) was dropped as the baseline.
    Categorical { name: String, levels: Vec<String> },
}

impl EncodedColumn {
    fn n_features(&self) -> usize {
        match self {
            EncodedColumn::Numeric { .. } => 1,
            EncodedColumn::Temporal { .. } => 3,
            EncodedColumn::Categorical { levels, .. } => levels.len(),
        }
    }
}

/// Turns a raw [`Dataset`] into a numeric feature matrix.
///
/// The schema and categorical vocabulary are learned once in `fit` and
/// fixed thereafter, so a second table with the same columns renders into
/// an identically-laid-out matrix. Output row count always equals input
/// row count and row order is preserved.
///
/// # Examples
///
/// ```
/// use centinela::dataset::{Cell, Dataset};
/// use centinela::features::FeatureEncoder;
///
/// let ds = Dataset::new(vec![
///     (
///         "bytes".to_string(),
///         vec![Cell::Number(100.0), Cell::Number(200.0), Cell::Number(300.0)],
///     ),
///     (
///         "proto".to_string(),
///         vec![Cell::from("tcp"), Cell::from("udp"), Cell::from("tcp")],
///     ),
/// ]).expect("valid dataset");
///
/// let mut encoder = FeatureEncoder::new();
/// let matrix = encoder.fit_transform(&ds).expect("encoding should succeed");
///
/// // One numeric column plus one indicator ("udp"; "tcp" is the baseline).
/// assert_eq!(matrix.shape(), (3, 2));
/// assert_eq!(encoder.feature_names(), &["bytes".to_string(), "proto=udp".to_string()]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureEncoder {
    columns: Option<Vec<EncodedColumn>>,
    feature_names: Option<Vec<String>>,
}

impl FeatureEncoder {
    /// Creates a new, unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: None,
            feature_names: None,
        }
    }

    /// Returns true if the encoder has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.columns.is_some()
    }

    /// Returns the emitted feature names, in matrix column order.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is not fitted.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        self.feature_names
            .as_ref()
            .expect("Encoder not fitted. Call fit() first.")
    }

    /// Returns the number of features the fitted layout emits.
    ///
    /// # Panics
    ///
    /// Panics if the encoder is not fitted.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names().len()
    }

    /// Learns the feature layout from a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`CentinelaError::EmptyFeatureSet`] if no feature would be
    /// emitted (e.g. a single categorical column with one distinct value).
    pub fn fit(&mut self, dataset: &Dataset) -> Result<()> {
        let schema = infer_schema(dataset);
        let mut columns = Vec::with_capacity(schema.len());

        for col_schema in schema.columns() {
            let cells = dataset.column(&col_schema.name)?;
            let encoded = match col_schema.kind {
                ColumnKind::Numeric => EncodedColumn::Numeric {
                    name: col_schema.name.clone(),
                },
                ColumnKind::Temporal => EncodedColumn::Temporal {
                    name: col_schema.name.clone(),
                },
                ColumnKind::Categorical => {
                    let distinct: BTreeSet<String> =
                        cells.iter().filter_map(category_value).collect();
                    // Drop the first level as the redundant baseline.
                    let levels: Vec<String> = distinct.into_iter().skip(1).collect();
                    EncodedColumn::Categorical {
                        name: col_schema.name.clone(),
                        levels,
                    }
                }
            };
            columns.push(encoded);
        }

        let feature_names: Vec<String> = columns
            .iter()
            .flat_map(|col| match col {
                EncodedColumn::Numeric { name } => vec![name.clone()],
                EncodedColumn::Temporal { name } => vec![
                    format!("{name}_hour"),
                    format!("{name}_day"),
                    format!("{name}_weekday"),
                ],
                EncodedColumn::Categorical { name, levels } => levels
                    .iter()
                    .map(|level| format!("{name}={level}"))
                    .collect(),
            })
            .collect();

        if feature_names.is_empty() {
            return Err(CentinelaError::EmptyFeatureSet);
        }

        self.columns = Some(columns);
        self.feature_names = Some(feature_names);
        Ok(())
    }

    /// Renders a dataset into a numeric matrix using the fitted layout.
    ///
    /// Row count and order match the input dataset. Categorical values not
    /// seen at fit time activate no indicator.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder is not fitted or a fitted column is
    /// absent from the dataset.
    pub fn transform(&self, dataset: &Dataset) -> Result<Matrix<f64>> {
        let columns = self
            .columns
            .as_ref()
            .ok_or_else(|| CentinelaError::not_fitted("FeatureEncoder"))?;

        let n_rows = dataset.n_rows();
        let n_features: usize = columns.iter().map(EncodedColumn::n_features).sum();
        let mut data = vec![0.0; n_rows * n_features];

        let mut offset = 0;
        for col in columns {
            match col {
                EncodedColumn::Numeric { name } => {
                    let cells = dataset.column(name)?;
                    for (i, cell) in cells.iter().enumerate() {
                        data[i * n_features + offset] = sanitize(cell.as_number());
                    }
                }
                EncodedColumn::Temporal { name } => {
                    let cells = dataset.column(name)?;
                    for (i, cell) in cells.iter().enumerate() {
                        if let Some(dt) = parse_temporal(cell) {
                            let base = i * n_features + offset;
                            data[base] = f64::from(dt.hour());
                            data[base + 1] = f64::from(dt.day());
                            data[base + 2] = f64::from(dt.weekday().num_days_from_monday());
                        }
                        // Unparsable cells leave the three slots at 0.0.
                    }
                }
                EncodedColumn::Categorical { name, levels } => {
                    let cells = dataset.column(name)?;
                    for (i, cell) in cells.iter().enumerate() {
                        if let Some(value) = category_value(cell) {
                            if let Some(pos) = levels.iter().position(|l| *l == value) {
                                data[i * n_features + offset + pos] = 1.0;
                            }
                        }
                    }
                }
            }
            offset += col.n_features();
        }

        Matrix::from_vec(n_rows, n_features, data).map_err(Into::into)
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit_transform(&mut self, dataset: &Dataset) -> Result<Matrix<f64>> {
        self.fit(dataset)?;
        self.transform(dataset)
    }
}

/// Canonical string form of a categorical cell; `None` for missing cells.
fn category_value(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) => Some(s.clone()),
        Cell::Number(v) if v.is_finite() => Some(format!("{v}")),
        _ => None,
    }
}

/// Rewrites missing and non-finite values to 0.0.
fn sanitize(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parses a temporal cell. Numeric cells are unix-epoch seconds; text cells
/// are tried against the supported datetime, RFC 3339, and date layouts.
fn parse_temporal(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Number(v) if v.is_finite() => {
            DateTime::from_timestamp(*v as i64, 0).map(|dt| dt.naive_utc())
        }
        Cell::Text(s) => {
            let s = s.trim();
            for fmt in DATETIME_FORMATS {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(dt);
                }
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.naive_utc());
            }
            for fmt in DATE_FORMATS {
                if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                    return d.and_hms_opt(0, 0, 0);
                }
            }
            None
        }
        _ => None,
    }
}
