//! Centinela: isolation-forest anomaly detection for tabular data in pure Rust.
//!
//! Centinela takes a raw table, prepares a pure-numeric feature matrix
//! (datetime decomposition, one-hot encoding, standardization), trains an
//! isolation forest over it, and hands back per-row anomaly scores and
//! Normal/Anomalous labels — row-index-aligned with the input from end to
//! end, so results join straight back onto the source records.
//!
//! # Quick Start
//!
//! ```
//! use centinela::prelude::*;
//!
//! // A small table: seven unremarkable sessions and one outlier.
//! let dataset = Dataset::new(vec![
//!     (
//!         "bytes".to_string(),
//!         vec![
//!             Cell::Number(100.0), Cell::Number(110.0), Cell::Number(95.0),
//!             Cell::Number(105.0), Cell::Number(98.0), Cell::Number(102.0),
//!             Cell::Number(108.0), Cell::Number(9000.0),
//!         ],
//!     ),
//!     (
//!         "requests".to_string(),
//!         vec![
//!             Cell::Number(10.0), Cell::Number(12.0), Cell::Number(9.0),
//!             Cell::Number(11.0), Cell::Number(10.0), Cell::Number(12.0),
//!             Cell::Number(11.0), Cell::Number(400.0),
//!         ],
//!     ),
//! ]).expect("valid dataset");
//!
//! // Raw table → numeric matrix → standardized matrix.
//! let mut encoder = FeatureEncoder::new();
//! let matrix = encoder.fit_transform(&dataset).expect("usable features");
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&matrix).expect("scaling succeeds");
//!
//! // Train, score, label.
//! let mut forest = IsolationForest::new()
//!     .with_n_estimators(100)
//!     .with_contamination(0.125)
//!     .with_random_state(42);
//! forest.fit(&scaled).expect("enough rows");
//!
//! let scores = forest.score_samples(&scaled).expect("same layout");
//! let labels = label_scores(&scores, 0.125).expect("valid contamination");
//! assert_eq!(labels[7], Label::Anomalous);
//! assert!(labels[..7].iter().all(|&l| l == Label::Normal));
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`dataset`]: Raw tabular `Dataset`, typed cells, and column classification
//! - [`features`]: Feature preparation (temporal decomposition, one-hot encoding)
//! - [`preprocessing`]: Data transformers (standard scaling)
//! - [`forest`]: Isolation tree and isolation forest ensemble
//! - [`detect`]: Score thresholds and Normal/Anomalous labeling
//! - [`traits`]: The `Transformer` fit/transform contract
//! - [`error`]: Error taxonomy and the crate `Result` alias
//!
//! # Determinism and parallelism
//!
//! A seeded run (`with_random_state`) is reproducible bit-for-bit. The
//! optional `parallel` cargo feature builds trees and scores rows on the
//! rayon pool without changing any result: per-tree seeds are derived up
//! front and scoring is read-only.

pub mod dataset;
pub mod detect;
pub mod error;
pub mod features;
pub mod forest;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod traits;
