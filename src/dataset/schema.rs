//! Per-column type classification.
//!
//! Classification runs once, before any encoding, and produces a tagged
//! schema so the encoder never has to re-derive a column's role mid-pass.

use super::{Cell, Dataset};
use serde::{Deserialize, Serialize};

/// The role a raw column plays in feature preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Passed through as a single numeric feature.
    Numeric,
    /// One-hot encoded over its observed vocabulary.
    Categorical,
    /// Parsed and decomposed into hour/day/weekday sub-features.
    Temporal,
}

/// A classified column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name as it appears in the dataset.
    pub name: String,
    /// Classified role.
    pub kind: ColumnKind,
}

/// Ordered classification of every column in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Returns the classified columns in dataset order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    /// Returns the number of classified columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Returns true when the column name suggests a timestamp or date.
fn name_suggests_temporal(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("time") || lower.contains("date")
}

/// Classifies every column of a dataset.
///
/// A column whose name contains `time` or `date` (case-insensitive) is
/// Temporal; otherwise it is Numeric when every non-missing cell is a
/// number (an all-missing column counts as Numeric), else Categorical.
///
/// # Examples
///
/// ```
/// use centinela::dataset::{infer_schema, Cell, ColumnKind, Dataset};
///
/// let ds = Dataset::new(vec![
///     ("login_time".to_string(), vec![Cell::from("2024-03-01 10:30:00")]),
///     ("bytes".to_string(), vec![Cell::Number(512.0)]),
///     ("user".to_string(), vec![Cell::from("alice")]),
/// ]).expect("valid dataset");
///
/// let schema = infer_schema(&ds);
/// let kinds: Vec<ColumnKind> = schema.columns().iter().map(|c| c.kind).collect();
/// assert_eq!(kinds, vec![
///     ColumnKind::Temporal,
///     ColumnKind::Numeric,
///     ColumnKind::Categorical,
/// ]);
/// ```
#[must_use]
pub fn infer_schema(dataset: &Dataset) -> Schema {
    let columns = dataset
        .iter_columns()
        .map(|(name, cells)| {
            let kind = if name_suggests_temporal(name) {
                ColumnKind::Temporal
            } else if cells.iter().all(|c| !matches!(c, Cell::Text(_))) {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            };
            ColumnSchema {
                name: name.to_string(),
                kind,
            }
        })
        .collect();

    Schema { columns }
}
