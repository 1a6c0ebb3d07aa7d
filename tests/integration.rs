//! Integration tests for the Centinela detection pipeline.
//!
//! These tests verify end-to-end workflows combining multiple components.

use centinela::prelude::*;

#[test]
fn test_full_pipeline_workflow() {
    // A mixed table: timestamps, a numeric column, a categorical column.
    // Row 5 is the oddball: huge transfer at 3am from an unseen-by-most host.
    let dataset = Dataset::new(vec![
        (
            "event_time".to_string(),
            vec![
                Cell::from("2024-05-01 09:15:00"),
                Cell::from("2024-05-01 09:40:00"),
                Cell::from("2024-05-01 10:05:00"),
                Cell::from("2024-05-01 10:30:00"),
                Cell::from("2024-05-01 11:00:00"),
                Cell::from("2024-05-02 03:12:00"),
                Cell::from("2024-05-01 11:25:00"),
                Cell::from("2024-05-01 11:50:00"),
            ],
        ),
        (
            "bytes".to_string(),
            vec![
                Cell::Number(120.0),
                Cell::Number(131.0),
                Cell::Number(118.0),
                Cell::Number(125.0),
                Cell::Number(122.0),
                Cell::Number(50_000.0),
                Cell::Number(128.0),
                Cell::Number(124.0),
            ],
        ),
        (
            "host".to_string(),
            vec![
                Cell::from("web-1"),
                Cell::from("web-2"),
                Cell::from("web-1"),
                Cell::from("web-2"),
                Cell::from("web-1"),
                Cell::from("bastion"),
                Cell::from("web-2"),
                Cell::from("web-1"),
            ],
        ),
    ])
    .expect("valid dataset");

    let mut encoder = FeatureEncoder::new();
    let matrix = encoder.fit_transform(&dataset).expect("usable features");
    assert_eq!(matrix.n_rows(), dataset.n_rows());

    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&matrix).expect("scaling succeeds");
    assert_eq!(scaled.shape(), matrix.shape());
    assert!(scaled.is_finite());

    let mut forest = IsolationForest::new()
        .with_n_estimators(100)
        .with_contamination(0.125)
        .with_random_state(42);
    forest.fit(&scaled).expect("enough rows");

    let scores = forest.score_samples(&scaled).expect("same layout");
    assert_eq!(scores.len(), 8);

    // Row 5 should be the most anomalous.
    let ranked = rank_indices(&scores);
    assert_eq!(ranked[0], 5);

    let labels = label_scores(&scores, 0.125).expect("valid contamination");
    assert_eq!(labels[5], Label::Anomalous);
    assert_eq!(labels.iter().filter(|&&l| l == Label::Anomalous).count(), 1);
}

#[test]
fn test_tight_cluster_with_far_outliers() {
    // 1000 clustered rows (bounded jitter around the origin) plus 50 far
    // outliers; at contamination 0.05 at least 90% of the planted outliers
    // should land in the flagged top fraction.
    let n_cluster = 1000;
    let n_outliers = 50;
    let n_features = 4;

    let mut data = Vec::with_capacity((n_cluster + n_outliers) * n_features);
    for i in 0..n_cluster * n_features {
        data.push(((i as f64) * 0.37).sin());
    }
    for i in 0..n_outliers * n_features {
        data.push(20.0 + ((i as f64) * 0.51).sin());
    }
    let x = Matrix::from_vec(n_cluster + n_outliers, n_features, data).expect("valid matrix");

    let mut forest = IsolationForest::new()
        .with_n_estimators(100)
        .with_random_state(42);
    forest.fit(&x).expect("fit succeeds");

    let scores = forest.score_samples(&x).expect("same layout");
    let labels = label_scores(&scores, 0.05).expect("valid contamination");

    let flagged_outliers = labels[n_cluster..]
        .iter()
        .filter(|&&l| l == Label::Anomalous)
        .count();
    assert!(
        flagged_outliers * 10 >= n_outliers * 9,
        "only {flagged_outliers}/{n_outliers} outliers flagged"
    );
}

#[test]
fn test_relabel_without_retraining() {
    let data: Vec<f64> = (0..200).map(|i| ((i as f64) * 0.37).sin() * 10.0).collect();
    let x = Matrix::from_vec(100, 2, data).expect("valid matrix");

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(7);
    forest.fit(&x).expect("fit succeeds");
    let scores = forest.score_samples(&x).expect("same layout");

    let strict = label_scores(&scores, 0.02).expect("valid contamination");
    let loose = label_scores(&scores, 0.10).expect("valid contamination");

    assert_eq!(strict.iter().filter(|&&l| l == Label::Anomalous).count(), 2);
    assert_eq!(loose.iter().filter(|&&l| l == Label::Anomalous).count(), 10);

    // Everything the strict threshold flags, the loose one flags too.
    for (s, l) in strict.iter().zip(loose.iter()) {
        if *s == Label::Anomalous {
            assert_eq!(*l, Label::Anomalous);
        }
    }
}

#[test]
fn test_trained_forest_serde_round_trip() {
    let data: Vec<f64> = (0..120).map(|i| ((i as f64) * 0.29).sin() * 5.0).collect();
    let x = Matrix::from_vec(60, 2, data).expect("valid matrix");

    let mut forest = IsolationForest::new()
        .with_n_estimators(20)
        .with_random_state(99);
    forest.fit(&x).expect("fit succeeds");
    let before = forest.score_samples(&x).expect("same layout");

    let json = serde_json::to_string(&forest).expect("forest serializes");
    let restored: IsolationForest = serde_json::from_str(&json).expect("forest deserializes");
    let after = restored.score_samples(&x).expect("same layout");

    assert_eq!(before.as_slice(), after.as_slice());
}

#[test]
fn test_score_records_align_with_dataset_rows() {
    let dataset = Dataset::new(vec![(
        "value".to_string(),
        vec![
            Cell::Number(1.0),
            Cell::Number(1.1),
            Cell::Number(0.9),
            Cell::Number(1.05),
            Cell::Number(1.02),
            Cell::Number(0.95),
            Cell::Number(1.08),
            Cell::Number(42.0),
        ],
    )])
    .expect("valid dataset");

    let mut encoder = FeatureEncoder::new();
    let matrix = encoder.fit_transform(&dataset).expect("usable features");

    let mut forest = IsolationForest::new()
        .with_n_estimators(100)
        .with_random_state(13);
    forest.fit(&matrix).expect("enough rows");
    let scores = forest.score_samples(&matrix).expect("same layout");

    let records = score_records(&scores, 0.125).expect("valid contamination");
    assert_eq!(records.len(), dataset.n_rows());
    for (record, &score) in records.iter().zip(scores.iter()) {
        assert_eq!(record.score, score);
    }
    assert_eq!(records[7].label, Label::Anomalous);
}

#[test]
fn test_identical_rows_all_score_equal() {
    let x = Matrix::from_vec(20, 3, vec![7.0; 60]).expect("valid matrix");

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(1);
    forest.fit(&x).expect("fit succeeds");

    let scores = forest.score_samples(&x).expect("same layout");
    let first = scores.get(0);
    assert!(first.is_finite());
    for &s in scores.iter() {
        assert!((s - first).abs() < 1e-12);
    }
}

#[test]
fn test_empty_categorical_table_fails_cleanly() {
    let dataset = Dataset::new(vec![(
        "tag".to_string(),
        vec![Cell::from("only"), Cell::from("only"), Cell::from("only")],
    )])
    .expect("valid dataset");

    let mut encoder = FeatureEncoder::new();
    let err = encoder.fit(&dataset).expect_err("no usable features");
    assert!(matches!(err, CentinelaError::EmptyFeatureSet));
}

#[test]
fn test_scoring_new_batch_with_fitted_pipeline() {
    // Fit encoder + scaler + forest on one table, then score a second
    // table with the same columns.
    let train = Dataset::new(vec![
        (
            "amount".to_string(),
            (0..50)
                .map(|i| Cell::Number(100.0 + ((i as f64) * 0.7).sin() * 5.0))
                .collect(),
        ),
        (
            "kind".to_string(),
            (0..50)
                .map(|i| Cell::from(if i % 2 == 0 { "buy" } else { "sell" }))
                .collect(),
        ),
    ])
    .expect("valid dataset");

    let test = Dataset::new(vec![
        (
            "amount".to_string(),
            vec![Cell::Number(101.0), Cell::Number(5000.0)],
        ),
        (
            "kind".to_string(),
            vec![Cell::from("buy"), Cell::from("hold")],
        ),
    ])
    .expect("valid dataset");

    let mut encoder = FeatureEncoder::new();
    let train_matrix = encoder.fit_transform(&train).expect("usable features");
    let mut scaler = StandardScaler::new();
    let train_scaled = scaler.fit_transform(&train_matrix).expect("scaling");

    let mut forest = IsolationForest::new()
        .with_n_estimators(50)
        .with_random_state(21);
    forest.fit(&train_scaled).expect("fit succeeds");

    let test_matrix = encoder.transform(&test).expect("same columns");
    let test_scaled = scaler.transform(&test_matrix).expect("same layout");
    let scores = forest.score_samples(&test_scaled).expect("same layout");

    assert_eq!(scores.len(), 2);
    // The wildly out-of-range row isolates faster.
    assert!(scores.get(1) > scores.get(0));
}
