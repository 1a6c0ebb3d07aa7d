//! Raw tabular dataset with typed cells.
//!
//! A [`Dataset`] is what the host hands the core after ingestion, whatever
//! the original file format was: an ordered sequence of records stored
//! column-major, with homogeneous column intent and missing values allowed.
//! Heavy wrangling (CSV/Excel/Parquet parsing, joins) stays on the host side.

mod schema;

pub use schema::{infer_schema, ColumnKind, ColumnSchema, Schema};

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A single raw cell value.
///
/// Columns are homogeneous in intent (a numeric column holds `Number` or
/// `Missing` cells), but the type is not enforced per column; the schema
/// pass inspects actual cells to classify each column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// A numeric value.
    Number(f64),
    /// A text value (categorical or an unparsed timestamp).
    Text(String),
    /// A missing value.
    Missing,
}

impl Cell {
    /// Returns the numeric value, if this cell holds one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if this cell holds one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this cell is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// An ordered raw table with named columns.
///
/// Row order is the join key for everything downstream: scores and labels
/// come back row-index-aligned with this table.
///
/// # Examples
///
/// ```
/// use centinela::dataset::{Cell, Dataset};
///
/// let ds = Dataset::new(vec![
///     (
///         "bytes".to_string(),
///         vec![Cell::Number(120.0), Cell::Number(340.0)],
///     ),
///     (
///         "user".to_string(),
///         vec![Cell::from("alice"), Cell::from("bob")],
///     ),
/// ]).expect("valid dataset");
/// assert_eq!(ds.shape(), (2, 2));
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<(String, Vec<Cell>)>,
    n_rows: usize,
}

impl Dataset {
    /// Creates a new `Dataset` from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if columns have different lengths, the column list
    /// is empty, a name is empty, or names are duplicated.
    pub fn new(columns: Vec<(String, Vec<Cell>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err("Dataset must have at least one column".into());
        }

        let n_rows = columns[0].1.len();

        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err("All columns must have the same length".into());
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        for i in 1..names.len() {
            if names[i] == names[i - 1] {
                return Err("Duplicate column names not allowed".into());
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns the column names in table order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns a reference to a column's cells by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&[Cell]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cells)| cells.as_slice())
            .ok_or_else(|| "Column not found".into())
    }

    /// Iterates over (name, cells) pairs in table order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[Cell])> {
        self.columns
            .iter()
            .map(|(n, cells)| (n.as_str(), cells.as_slice()))
    }
}
