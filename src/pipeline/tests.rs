//! Tests for the pipeline.

use super::*;
use crate::data::{CategoricalFeature, HEALTHY_LABEL, STRESS_LABEL};

/// 40 rows where short sleep combined with heavy workload means stress.
fn labelled_table() -> FeatureTable {
    let n = 40;
    let sleep: Vec<f64> = (0..n).map(|i| 4.0 + (i % 5) as f64).collect();
    let assignments: Vec<f64> = (0..n).map(|i| (i % 6) as f64).collect();
    let labels: Vec<String> = (0..n)
        .map(|i| {
            if sleep[i] < 6.0 || assignments[i] >= 4.0 {
                STRESS_LABEL.to_string()
            } else {
                HEALTHY_LABEL.to_string()
            }
        })
        .collect();
    let numeric = vec![
        (NumericFeature::Age, (0..n).map(|i| 18.0 + (i % 7) as f64).collect()),
        (NumericFeature::SleepHours, sleep),
        (NumericFeature::Assignments, assignments),
    ];
    let categorical = CategoricalFeature::ALL
        .into_iter()
        .map(|f| {
            let column = (0..n)
                .map(|i| match f {
                    CategoricalFeature::Exercise => ["Jarang", "Kadang", "Sering"][i % 3],
                    CategoricalFeature::Gender => ["Laki-laki", "Perempuan"][i % 2],
                    _ => "x",
                })
                .map(String::from)
                .collect();
            (f, column)
        })
        .collect();
    FeatureTable::new(numeric, categorical, Some(labels)).expect("valid table")
}

fn small_config() -> TrainingConfig {
    TrainingConfig::default().with_n_estimators(30)
}

#[test]
fn test_config_defaults() {
    let config = TrainingConfig::default();
    assert_eq!(config.test_size(), 0.2);
    assert_eq!(config.random_state(), 42);
    assert_eq!(config.n_estimators(), 200);
    assert_eq!(config.max_depth(), 4);
    assert!(config.gpa_repair().enabled);
}

#[test]
fn test_config_validate_rejects_out_of_range() {
    for config in [
        TrainingConfig::default().with_test_size(1.0),
        TrainingConfig::default().with_n_estimators(0),
        TrainingConfig::default().with_max_depth(0),
    ] {
        assert!(matches!(
            config.validate().unwrap_err(),
            StressError::InvalidHyperparameter { .. }
        ));
    }
}

#[test]
fn test_fit_sorts_classes() {
    let mut pipeline = StressPipeline::new(&small_config());
    assert!(!pipeline.is_fitted());
    pipeline.fit(&labelled_table()).expect("fit should succeed");
    assert_eq!(pipeline.classes(), &[STRESS_LABEL, HEALTHY_LABEL]);
    assert_eq!(
        pipeline.numeric_features(),
        &[
            NumericFeature::Age,
            NumericFeature::SleepHours,
            NumericFeature::Assignments
        ]
    );
}

#[test]
fn test_fit_requires_labels() {
    let mut pipeline = StressPipeline::new(&small_config());
    let err = pipeline.fit(&labelled_table().without_labels()).unwrap_err();
    assert!(matches!(err, StressError::MissingColumn { ref column } if column == "Label"));
}

#[test]
fn test_predict_learns_training_rule() {
    let table = labelled_table();
    let mut pipeline = StressPipeline::new(&small_config());
    pipeline.fit(&table).expect("fit should succeed");

    let predicted = pipeline.predict(&table).expect("fitted");
    let truth = table.labels().expect("labelled");
    let correct = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    assert!(correct as f64 / truth.len() as f64 >= 0.9);
}

#[test]
fn test_predict_proba_rows_sum_to_one() {
    let table = labelled_table();
    let mut pipeline = StressPipeline::new(&small_config());
    pipeline.fit(&table).expect("fit should succeed");

    let proba = pipeline.predict_proba(&table).expect("fitted");
    assert_eq!(proba.n_cols(), 2);
    for row in proba.rows() {
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_predict_before_fit() {
    let pipeline = StressPipeline::new(&small_config());
    assert!(matches!(
        pipeline.predict(&labelled_table()).unwrap_err(),
        StressError::NotFitted(_)
    ));
}

#[test]
fn test_feature_importances_named_and_sorted() {
    let mut pipeline = StressPipeline::new(&small_config());
    pipeline.fit(&labelled_table()).expect("fit should succeed");

    let importances = pipeline.feature_importances().expect("fitted");
    assert_eq!(importances.len(), pipeline.feature_names().len());
    assert!(importances
        .windows(2)
        .all(|w| w[0].importance >= w[1].importance));
    let total: f64 = importances.iter().map(|f| f.importance).sum();
    assert!((total - 1.0).abs() < 1e-9);

    let top = pipeline.top_features(2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0], importances[0]);
    assert!(
        top[0].name == "num__Jam Tidur per Hari"
            || top[0].name == "num__Jumlah Tugas Besar per Minggu"
    );
}

#[test]
fn test_from_parts_checks_class_count() {
    let mut pipeline = StressPipeline::new(&small_config());
    pipeline.fit(&labelled_table()).expect("fit should succeed");

    let err = StressPipeline::from_parts(
        pipeline.transformer().clone(),
        pipeline.forest().clone(),
        vec!["only-one".to_string()],
    )
    .unwrap_err();
    assert!(matches!(err, StressError::DimensionMismatch { .. }));

    let rebuilt = StressPipeline::from_parts(
        pipeline.transformer().clone(),
        pipeline.forest().clone(),
        pipeline.classes().to_vec(),
    )
    .expect("parts are consistent");
    assert_eq!(rebuilt, pipeline);
}

#[test]
fn test_bincode_round_trip() {
    let table = labelled_table();
    let mut pipeline = StressPipeline::new(&small_config());
    pipeline.fit(&table).expect("fit should succeed");

    let bytes = bincode::serialize(&pipeline).expect("serialize");
    let restored: StressPipeline = bincode::deserialize(&bytes).expect("deserialize");
    assert_eq!(
        restored.predict_proba(&table).expect("fitted"),
        pipeline.predict_proba(&table).expect("fitted")
    );
}
