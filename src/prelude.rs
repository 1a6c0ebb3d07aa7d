//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use centinela::prelude::*;
//! ```

pub use crate::dataset::{infer_schema, Cell, ColumnKind, ColumnSchema, Dataset, Schema};
pub use crate::detect::{
    label_scores, rank_indices, score_records, score_threshold, Label, ScoreRecord,
};
pub use crate::error::{CentinelaError, Result};
pub use crate::features::FeatureEncoder;
pub use crate::forest::IsolationForest;
pub use crate::preprocessing::StandardScaler;
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::Transformer;
