//! Synthetic survey data shared by unit tests.

use crate::data::{FeatureTable, RawTable, HEALTHY_LABEL, STRESS_LABEL};
use crate::pipeline::StressPipeline;
use crate::preprocessing::clean_table;

pub(crate) const HEADER: &str = "Gender;Umur;Jurusan/Program Studi;Jam Belajar per Hari;Jam Tidur per Hari;IPK;Jumlah Tugas Besar per Minggu;Frekuensi Olahraga;Pemasukan Keluarga;Status Hubungan;Label";

/// Semicolon-delimited survey where short sleep or a heavy assignment load
/// means stress. About 60% of rows are labelled stress risk.
pub(crate) fn survey_csv(n: usize) -> String {
    let mut lines = vec![HEADER.to_string()];
    for i in 0..n {
        let sleep = 4 + i % 5;
        let assignments = i % 6;
        let study = 1 + (i * 3) % 7;
        let gpa = if i % 4 == 0 {
            format!("0.{}", 15 + i % 5)
        } else {
            format!("3,{}", i % 10)
        };
        let label = if sleep < 6 || assignments >= 4 {
            STRESS_LABEL
        } else {
            HEALTHY_LABEL
        };
        lines.push(format!(
            "{};{};{};{study};{sleep};{gpa};{assignments};{};{};{};{label}",
            ["Laki-laki", "Perempuan"][i % 2],
            18 + i % 8,
            ["Informatika", "Teknik Sipil", "Manajemen"][i % 3],
            ["Jarang", "Kadang", "Sering"][i % 3],
            ["Rendah", "Sedang", "Tinggi"][(i / 2) % 3],
            ["Jomblo", "Dalam hubungan"][(i / 3) % 2],
        ));
    }
    lines.join("\n")
}

/// [`survey_csv`] loaded and cleaned.
pub(crate) fn survey(n: usize) -> FeatureTable {
    let raw = RawTable::from_reader(survey_csv(n).as_bytes()).expect("valid csv");
    clean_table(&raw).expect("clean should succeed")
}

/// Copy of `pipeline` whose first split reads `feature_idx`, whatever the
/// forest's width. Decodes fine and only fails the structure check.
pub(crate) fn retarget_first_split(pipeline: &StressPipeline, feature_idx: usize) -> StressPipeline {
    fn retarget(value: &mut serde_json::Value, feature_idx: usize) -> bool {
        match value {
            serde_json::Value::Object(map) => {
                if let Some(idx) = map.get_mut("feature_idx") {
                    *idx = serde_json::Value::from(feature_idx);
                    return true;
                }
                map.values_mut().any(|v| retarget(v, feature_idx))
            }
            serde_json::Value::Array(items) => items.iter_mut().any(|v| retarget(v, feature_idx)),
            _ => false,
        }
    }

    let mut value = serde_json::to_value(pipeline).expect("pipeline serializes");
    assert!(retarget(&mut value, feature_idx), "pipeline has no split");
    serde_json::from_value(value).expect("pipeline deserializes")
}
