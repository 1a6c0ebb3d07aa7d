//! Error types for Centinela operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Centinela operations.
///
/// Every failure in the detection pipeline is surfaced as one of these
/// variants; there are no internal retries, so an error always means the
/// input was unusable, not that a transient condition occurred.
///
/// # Examples
///
/// ```
/// use centinela::error::CentinelaError;
///
/// let err = CentinelaError::MalformedRow {
///     expected: 12,
///     actual: 9,
/// };
/// assert!(err.to_string().contains("expected 12 features"));
/// ```
#[derive(Debug)]
pub enum CentinelaError {
    /// No usable numeric feature remained after encoding.
    EmptyFeatureSet,

    /// Too few rows to train on (the forest needs at least 2).
    InsufficientData {
        /// Number of rows provided
        n_samples: usize,
    },

    /// A matrix handed to the scorer does not match the trained layout.
    MalformedRow {
        /// Feature count the forest was trained with
        expected: usize,
        /// Feature count of the offending matrix
        actual: usize,
    },

    /// A transformer or estimator was used before `fit`.
    NotFitted {
        /// Component that was not fitted
        what: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CentinelaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CentinelaError::EmptyFeatureSet => {
                write!(f, "No usable feature remained after encoding")
            }
            CentinelaError::InsufficientData { n_samples } => {
                write!(f, "Insufficient data: got {n_samples} rows, need at least 2")
            }
            CentinelaError::MalformedRow { expected, actual } => {
                write!(
                    f,
                    "Malformed row: expected {expected} features, got {actual}"
                )
            }
            CentinelaError::NotFitted { what } => {
                write!(f, "{what} not fitted. Call fit() first")
            }
            CentinelaError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            CentinelaError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            CentinelaError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CentinelaError {}

impl From<&str> for CentinelaError {
    fn from(msg: &str) -> Self {
        CentinelaError::Other(msg.to_string())
    }
}

impl From<String> for CentinelaError {
    fn from(msg: String) -> Self {
        CentinelaError::Other(msg)
    }
}

impl CentinelaError {
    /// Create a not-fitted error naming the offending component.
    #[must_use]
    pub fn not_fitted(what: &str) -> Self {
        Self::NotFitted {
            what: what.to_string(),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for CentinelaError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<CentinelaError> for &str {
    fn eq(&self, other: &CentinelaError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CentinelaError>;
