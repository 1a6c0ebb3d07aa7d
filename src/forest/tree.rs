//! Single isolation tree: random recursive partitioning of a subsample.

use crate::primitives::Matrix;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Euler-Mascheroni constant, for the harmonic-number approximation.
const EULER_GAMMA: f64 = 0.577_215_664_9;

/// A node in an isolation tree.
///
/// Internal nodes own their two children exclusively; leaves record only
/// how many subsample rows reached them (the rows themselves are not kept).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IsolationNode {
    /// Binary split on one feature.
    Internal {
        /// Column index the split tests.
        split_attr: usize,
        /// Rows with `value < split_value` go left, the rest go right.
        split_value: f64,
        /// Subtree for rows below the split value.
        left: Box<IsolationNode>,
        /// Subtree for rows at or above the split value.
        right: Box<IsolationNode>,
    },
    /// Terminal node.
    Leaf {
        /// Number of subsample rows that reached this leaf.
        size: usize,
    },
}

impl IsolationNode {
    fn max_depth(&self) -> usize {
        match self {
            IsolationNode::Internal { left, right, .. } => {
                1 + left.max_depth().max(right.max_depth())
            }
            IsolationNode::Leaf { .. } => 0,
        }
    }
}

/// Expected path length of an unsuccessful search in a binary search tree
/// over `n` items: `c(n) = 2·(ln(n−1) + γ) − 2·(n−1)/n`, with `c(n) = 0`
/// for `n ≤ 1`.
#[must_use]
pub fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let nf = n as f64;
    2.0 * ((nf - 1.0).ln() + EULER_GAMMA) - 2.0 * (nf - 1.0) / nf
}

/// One random binary partitioning tree over a subsample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    root: IsolationNode,
}

impl IsolationTree {
    /// Builds a tree over the given subsample rows of `x`.
    ///
    /// `rows` are indices into `x`; the builder never copies row data.
    /// Splitting stops when a subset isolates (size 1), the height limit is
    /// reached, or every feature is constant over the subset.
    pub(crate) fn build<R: Rng>(
        x: &Matrix<f64>,
        rows: &[usize],
        height_limit: usize,
        rng: &mut R,
    ) -> Self {
        Self {
            root: build_node(x, rows, 0, height_limit, rng),
        }
    }

    /// Path length for one row: splits traversed to reach a leaf, plus the
    /// expected extra depth `c(size)` for the rows that leaf still holds.
    #[must_use]
    pub fn path_length(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                IsolationNode::Internal {
                    split_attr,
                    split_value,
                    left,
                    right,
                } => {
                    node = if row[*split_attr] < *split_value {
                        left
                    } else {
                        right
                    };
                    depth += 1;
                }
                IsolationNode::Leaf { size } => {
                    return depth as f64 + average_path_length(*size);
                }
            }
        }
    }

    /// Height of the tree (longest root-to-leaf split chain).
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.max_depth()
    }
}

fn build_node<R: Rng>(
    x: &Matrix<f64>,
    rows: &[usize],
    depth: usize,
    height_limit: usize,
    rng: &mut R,
) -> IsolationNode {
    if rows.len() <= 1 || depth >= height_limit {
        return IsolationNode::Leaf { size: rows.len() };
    }

    // Candidate split columns: those not constant over this subset. When
    // every feature is constant the subset cannot be partitioned further.
    let n_cols = x.n_cols();
    let mut candidates = Vec::new();
    for col in 0..n_cols {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &row in rows {
            let v = x.get(row, col);
            min = min.min(v);
            max = max.max(v);
        }
        if min < max {
            candidates.push((col, min, max));
        }
    }

    if candidates.is_empty() {
        return IsolationNode::Leaf { size: rows.len() };
    }

    let (split_attr, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let split_value = rng.gen_range(min..max);

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&row| x.get(row, split_attr) < split_value);

    // gen_range samples [min, max); a split landing exactly on min leaves
    // one side empty, which cannot isolate anything.
    if left_rows.is_empty() || right_rows.is_empty() {
        return IsolationNode::Leaf { size: rows.len() };
    }

    IsolationNode::Internal {
        split_attr,
        split_value,
        left: Box::new(build_node(x, &left_rows, depth + 1, height_limit, rng)),
        right: Box::new(build_node(x, &right_rows, depth + 1, height_limit, rng)),
    }
}
