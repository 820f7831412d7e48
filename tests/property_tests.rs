//! Property-based tests using proptest.
//!
//! GPA cleaning, normalization statistics and the split recipe.

use proptest::prelude::*;
use stress_risk::data::NumericFeature;
use stress_risk::model_selection::train_test_split;
use stress_risk::preprocessing::{clean_gpa, FeatureStats, GpaRepair, NormalizationStats};

// Values with enough spread to be normalized
fn column_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0f64..24.0, 3..60)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn gpa_at_least_one_is_unchanged(v in 1.0f64..10.0) {
        prop_assert_eq!(clean_gpa(Some(&v.to_string())), Some(v));
    }

    #[test]
    fn gpa_fraction_is_rescaled_and_clamped(v in 0.0f64..1.0) {
        let cleaned = clean_gpa(Some(&v.to_string())).expect("numeric");
        prop_assert_eq!(cleaned, (v * 20.0).min(4.0));
        prop_assert!((0.0..=4.0).contains(&cleaned));
    }

    #[test]
    fn gpa_decimal_comma_matches_point(whole in 1u32..4, frac in 0u32..100) {
        let comma = format!("{whole},{frac:02}");
        let point = format!("{whole}.{frac:02}");
        prop_assert_eq!(clean_gpa(Some(&comma)), clean_gpa(Some(&point)));
    }

    #[test]
    fn gpa_non_numeric_is_missing(text in "[a-zA-Z ]{1,12}") {
        prop_assume!(text.trim().parse::<f64>().is_err());
        prop_assert_eq!(clean_gpa(Some(&text)), None);
    }

    #[test]
    fn disabled_repair_keeps_fractions(v in 0.0f64..1.0) {
        prop_assert_eq!(GpaRepair::disabled().clean(Some(&v.to_string())), Some(v));
    }

    #[test]
    fn std_is_never_negative(values in column_strategy()) {
        let stats = FeatureStats::from_values(&values).expect("non-empty");
        prop_assert!(stats.std >= 0.0);
    }

    #[test]
    fn z_scores_have_zero_mean_unit_std(values in column_strategy()) {
        let stats = FeatureStats::from_values(&values).expect("non-empty");
        prop_assume!(stats.std > 1e-3);

        let normalization = NormalizationStats::from_stats([(NumericFeature::SleepHours, stats)]);
        let z: Vec<f64> = values
            .iter()
            .map(|&v| normalization.normalize_value(NumericFeature::SleepHours, v).expect("usable"))
            .collect();

        let z_stats = FeatureStats::from_values(&z).expect("non-empty");
        prop_assert!(z_stats.mean.abs() < 1e-9);
        prop_assert!((z_stats.std - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_values_do_not_move_stats(values in column_strategy(), holes in 1usize..5) {
        let mut with_nan = values.clone();
        with_nan.extend(std::iter::repeat(f64::NAN).take(holes));
        prop_assert_eq!(FeatureStats::from_values(&values), FeatureStats::from_values(&with_nan));
    }

    #[test]
    fn split_partitions_rows(n in 2usize..200, test_size in 0.05f64..0.95, seed in any::<u64>()) {
        let n_test = (n as f64 * test_size).ceil() as usize;
        prop_assume!(n_test < n);
        let split = train_test_split(n, test_size, Some(seed)).expect("valid split");
        prop_assert_eq!(split.test.len(), n_test);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..n).collect::<Vec<_>>());
    }
}
