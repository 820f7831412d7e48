//! Tests for preprocessing module.

use super::*;
use crate::data::STRESS_LABEL;
use crate::traits::Transformer;

const HEADER: &str = "Gender;Umur;Jurusan/Program Studi;Jam Belajar per Hari;Jam Tidur per Hari;IPK;Jumlah Tugas Besar per Minggu;Frekuensi Olahraga;Pemasukan Keluarga;Status Hubungan;Label";

fn raw(rows: &[&str]) -> RawTable {
    let text = std::iter::once(HEADER)
        .chain(rows.iter().copied())
        .collect::<Vec<_>>()
        .join("\n");
    RawTable::from_reader(text.as_bytes()).expect("valid csv")
}

fn two_rows() -> FeatureTable {
    clean_table(&raw(&[
        "Perempuan;20;Informatika;3;7;3,5;2;Sering;Sedang;Jomblo;Sehat",
        "Laki-laki;22;Teknik Sipil;6;4;0.188194444;5;Jarang;Rendah;Dalam hubungan;Risiko Stres",
    ]))
    .expect("clean should succeed")
}

#[test]
fn test_gpa_decimal_comma() {
    assert_eq!(clean_gpa(Some("3,5")), Some(3.5));
    assert_eq!(clean_gpa(Some(" 3.25 ")), Some(3.25));
}

#[test]
fn test_gpa_fraction_rescaled() {
    let value = clean_gpa(Some("0.188194444")).expect("parsable");
    assert!((value - 3.76388888).abs() < 1e-6);
}

#[test]
fn test_gpa_rescale_clamped() {
    assert_eq!(clean_gpa(Some("0.9")), Some(4.0));
}

#[test]
fn test_gpa_boundary_one_not_rescaled() {
    assert_eq!(clean_gpa(Some("1.0")), Some(1.0));
    assert_eq!(clean_gpa(Some("0")), Some(0.0));
}

#[test]
fn test_gpa_unparseable_is_missing() {
    assert_eq!(clean_gpa(Some("tiga")), None);
    assert_eq!(clean_gpa(Some("")), None);
    assert_eq!(clean_gpa(Some("NaN")), None);
}

#[test]
fn test_gpa_repair_disabled() {
    let repair = GpaRepair::disabled();
    assert_eq!(repair.clean(Some("0,15")), Some(0.15));
}

#[test]
fn test_coerce_numeric() {
    assert_eq!(coerce_numeric(Some("7")), 7.0);
    assert!(coerce_numeric(Some("7,5")).is_nan());
    assert!(coerce_numeric(None).is_nan());
}

#[test]
fn test_clean_table_scenario() {
    let table = two_rows();
    assert_eq!(table.n_rows(), 2);
    let gpa = table.numeric(NumericFeature::Gpa).expect("gpa present");
    assert_eq!(gpa[0], 3.5);
    assert!((gpa[1] - 3.76388888).abs() < 1e-6);
    assert_eq!(table.labels().expect("labelled")[1], STRESS_LABEL);
}

#[test]
fn test_clean_table_stats_scenario() {
    let table = two_rows();
    let stats = NormalizationStats::fit(&table).expect("fit should succeed");
    let gpa = stats.get(NumericFeature::Gpa).expect("gpa stats");
    assert!((gpa.mean - 3.63).abs() < 0.005);
    assert!((gpa.std - 0.1838).abs() < 0.005);
    assert!(stats.get(NumericFeature::Age).is_none());
}

#[test]
fn test_clean_table_without_gpa_column() {
    let text = "Gender;Umur;Jurusan/Program Studi;Jam Belajar per Hari;Jam Tidur per Hari;Jumlah Tugas Besar per Minggu;Frekuensi Olahraga;Pemasukan Keluarga;Status Hubungan\n\
                Perempuan;20;Informatika;3;7;2;Sering;Sedang;Jomblo";
    let table = clean_table(&RawTable::from_reader(text.as_bytes()).expect("valid csv"))
        .expect("clean should succeed");
    assert!(!table.has_numeric(NumericFeature::Gpa));
    assert!(table.labels().is_none());
    let stats = NormalizationStats::fit(&table).expect("fit should succeed");
    assert_eq!(
        stats.features(),
        vec![
            NumericFeature::StudyHours,
            NumericFeature::SleepHours,
            NumericFeature::Assignments
        ]
    );
}

#[test]
fn test_clean_table_missing_required_column() {
    let text = "Gender;Umur\nPerempuan;20";
    let err = clean_table(&RawTable::from_reader(text.as_bytes()).expect("valid csv")).unwrap_err();
    assert!(matches!(err, crate::error::StressError::MissingColumn { .. }));
}

#[test]
fn test_clean_table_missing_categorical_cell() {
    let table = clean_table(&raw(&["Perempuan;20;;3;7;3,5;2;Sering;Sedang;Jomblo;Sehat"]))
        .expect("clean should succeed");
    assert_eq!(table.categorical(CategoricalFeature::Department)[0], "");
}

#[test]
fn test_column_transformer_layout() {
    let table = two_rows();
    let mut transformer = ColumnTransformer::new();
    let x = transformer.fit_transform(&table).expect("fit should succeed");

    // 5 numeric + 2 per categorical
    assert_eq!(x.shape(), (2, 15));
    let names = transformer.feature_names();
    assert_eq!(names.len(), 15);
    assert_eq!(names[0], "num__Umur");
    assert_eq!(names[5], "cat__Gender_Laki-laki");
    assert_eq!(names[6], "cat__Gender_Perempuan");
    assert_eq!(x.get(0, 0), 20.0);
    assert_eq!(x.get(0, 5), 0.0);
    assert_eq!(x.get(0, 6), 1.0);
}

#[test]
fn test_column_transformer_unknown_category_is_zero_block() {
    let table = two_rows();
    let mut transformer = ColumnTransformer::new();
    transformer.fit(&table).expect("fit should succeed");

    let unseen = clean_table(&raw(&[
        "Perempuan;20;Kedokteran;3;7;3,5;2;Sering;Sedang;Jomblo;Sehat",
    ]))
    .expect("clean should succeed");
    let x = transformer.transform(&unseen).expect("transform should succeed");
    // department block follows the two gender columns
    assert_eq!(x.row(0)[7..9], [0.0, 0.0]);
}

#[test]
fn test_column_transformer_not_fitted() {
    let transformer = ColumnTransformer::new();
    let err = transformer.transform(&two_rows()).unwrap_err();
    assert!(matches!(err, crate::error::StressError::NotFitted(_)));
}

#[test]
fn test_column_transformer_missing_numeric_at_transform() {
    let table = two_rows();
    let mut transformer = ColumnTransformer::new();
    transformer.fit(&table).expect("fit should succeed");

    let text = "Gender;Umur;Jurusan/Program Studi;Jam Belajar per Hari;Jam Tidur per Hari;Jumlah Tugas Besar per Minggu;Frekuensi Olahraga;Pemasukan Keluarga;Status Hubungan\n\
                Perempuan;20;Informatika;3;7;2;Sering;Sedang;Jomblo";
    let no_gpa = clean_table(&RawTable::from_reader(text.as_bytes()).expect("valid csv"))
        .expect("clean should succeed");
    let err = transformer.transform(&no_gpa).unwrap_err();
    assert!(matches!(err, crate::error::StressError::MissingColumn { ref column } if column == "IPK"));
}

#[test]
fn test_one_hot_encoder_not_fitted() {
    let encoder = OneHotEncoder::new();
    assert_eq!(encoder.n_outputs(), 0);
    assert!(encoder.encode("x").is_err());
}
