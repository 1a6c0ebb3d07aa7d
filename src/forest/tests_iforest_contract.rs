// =========================================================================
// FALSIFY-IF: Isolation Forest contract (centinela forest)
//
// Each test tries to falsify one published property of the detector:
// score bounds, height limits, seeded determinism, and label counts.
//
// References:
//   - Liu, Ting, Zhou (2008) "Isolation Forest"
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn sin_matrix(n: usize, cols: usize, seed: u32) -> Matrix<f64> {
    let data: Vec<f64> = (0..n * cols)
        .map(|i| ((i as f64 + f64::from(seed)) * 0.37).sin() * 10.0)
        .collect();
    Matrix::from_vec(n, cols, data).expect("valid matrix")
}

/// FALSIFY-IF-001: Anomaly scores are in (0, 1]
#[test]
fn falsify_if_001_scores_bounded() {
    let data = sin_matrix(8, 2, 0);

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(42);
    forest.fit(&data).expect("fit succeeds");

    let scores = forest.score_samples(&data).expect("same layout");
    for (i, &score) in scores.iter().enumerate() {
        assert!(
            score > 0.0 && score <= 1.0,
            "FALSIFIED IF-001: score[{i}]={score}, expected in (0,1]"
        );
    }
}

/// FALSIFY-IF-002: Predictions are either Normal or Anomalous and row-aligned
#[test]
fn falsify_if_002_predictions_row_aligned() {
    let data = sin_matrix(10, 2, 3);

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(42)
        .with_contamination(0.1);
    forest.fit(&data).expect("fit succeeds");

    let preds = forest.predict(&data).expect("same layout");
    assert_eq!(
        preds.len(),
        10,
        "FALSIFIED IF-002: predictions len={}, expected 10",
        preds.len()
    );
}

/// FALSIFY-IF-003: No tree exceeds the ceil(log2(ψ)) height limit
#[test]
fn falsify_if_003_height_limit() {
    let data = sin_matrix(200, 3, 7);

    let mut forest = IsolationForest::new()
        .with_n_estimators(40)
        .with_max_samples(64)
        .with_random_state(42);
    forest.fit(&data).expect("fit succeeds");

    let limit = (forest.subsample_size() as f64).log2().ceil() as usize;
    for (t, tree) in forest.trees.as_ref().expect("fitted").iter().enumerate() {
        assert!(
            tree.height() <= limit,
            "FALSIFIED IF-003: tree[{t}] height {} > limit {limit}",
            tree.height()
        );
    }
}

/// FALSIFY-IF-004: Same seed, same data ⇒ bit-identical scores
#[test]
fn falsify_if_004_seeded_determinism() {
    let data = sin_matrix(50, 2, 11);

    let score = |seed: u64| {
        let mut forest = IsolationForest::new()
            .with_n_estimators(30)
            .with_random_state(seed);
        forest.fit(&data).expect("fit succeeds");
        forest.score_samples(&data).expect("same layout")
    };

    let a = score(99);
    let b = score(99);
    assert_eq!(
        a.as_slice(),
        b.as_slice(),
        "FALSIFIED IF-004: seeded runs diverged"
    );
}

mod iforest_proptest_falsify {
    use super::*;
    use proptest::prelude::*;

    /// FALSIFY-IF-001-prop: Anomaly scores in (0, 1] for random data
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn falsify_if_001_prop_scores_bounded(
            n in 8..=20usize,
            seed in 0..200u32,
        ) {
            let matrix = sin_matrix(n, 2, seed);
            let mut forest = IsolationForest::new()
                .with_n_estimators(50)
                .with_random_state(u64::from(seed));
            forest.fit(&matrix).expect("fit");

            let scores = forest.score_samples(&matrix).expect("same layout");
            for (i, &score) in scores.iter().enumerate() {
                prop_assert!(
                    score > 0.0 && score <= 1.0,
                    "FALSIFIED IF-001-prop: score[{}]={} not in (0,1]",
                    i, score
                );
            }
        }
    }

    /// FALSIFY-IF-002-prop: Score length matches sample count
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]

        #[test]
        fn falsify_if_002_prop_scores_length(
            n in 8..=20usize,
            seed in 0..200u32,
        ) {
            let matrix = sin_matrix(n, 2, seed);
            let mut forest = IsolationForest::new()
                .with_n_estimators(50)
                .with_random_state(u64::from(seed));
            forest.fit(&matrix).expect("fit");

            let scores = forest.score_samples(&matrix).expect("same layout");
            prop_assert_eq!(
                scores.len(),
                n,
                "FALSIFIED IF-002-prop: scores len {} != {}",
                scores.len(), n
            );
        }
    }
}
