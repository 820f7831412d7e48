//! Inference on submitted student profiles.
//!
//! A profile arrives in original units. Its numeric fields are z-scored with
//! the stats from the training run that produced the pipeline, then the
//! one-row table goes through the pipeline. Probabilities are looked up by
//! class label, so the model's class order never matters.

use crate::data::{CategoricalFeature, FeatureTable, NumericFeature, HEALTHY_LABEL, STRESS_LABEL};
use crate::error::{Result, StressError};
use crate::training::TrainedModel;
use serde::{Deserialize, Serialize};

/// Largest number of profiles accepted in one prediction request.
pub const MAX_BATCH: usize = 5;

fn default_name() -> String {
    "Mahasiswa".to_string()
}

/// One student's survey answers, in original units.
///
/// Field names accept both the snake-case names and the dataset headers.
///
/// # Examples
///
/// ```
/// use stress_risk::inference::StudentProfile;
///
/// let json = r#"{
///     "gender": "Perempuan", "age": 20, "department": "Informatika",
///     "study_hours": 4, "sleep_hours": 7, "gpa": 3.4, "assignments": 2,
///     "exercise": "Sering", "income": "Sedang", "relationship": "Jomblo"
/// }"#;
/// let profile: StudentProfile = serde_json::from_str(json).expect("valid profile");
/// assert_eq!(profile.name, "Mahasiswa");
/// profile.validate().expect("in range");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Display name, not a model input
    #[serde(default = "default_name", alias = "Nama")]
    pub name: String,
    /// "Laki-laki" / "Perempuan"
    #[serde(alias = "Gender")]
    pub gender: String,
    /// Age in years
    #[serde(alias = "Umur")]
    pub age: f64,
    /// Department / study program
    #[serde(alias = "Jurusan/Program Studi")]
    pub department: String,
    /// Study hours per day
    #[serde(alias = "Jam Belajar per Hari")]
    pub study_hours: f64,
    /// Sleep hours per day
    #[serde(alias = "Jam Tidur per Hari")]
    pub sleep_hours: f64,
    /// Grade point average
    #[serde(alias = "IPK")]
    pub gpa: f64,
    /// Major assignments per week
    #[serde(alias = "Jumlah Tugas Besar per Minggu")]
    pub assignments: f64,
    /// "Jarang" / "Kadang" / "Sering"
    #[serde(alias = "Frekuensi Olahraga")]
    pub exercise: String,
    /// "Rendah" / "Sedang" / "Tinggi"
    #[serde(alias = "Pemasukan Keluarga")]
    pub income: String,
    /// "Jomblo" / "Dalam hubungan"
    #[serde(alias = "Status Hubungan")]
    pub relationship: String,
}

impl StudentProfile {
    /// Value of a numeric field.
    #[must_use]
    pub fn numeric(&self, feature: NumericFeature) -> f64 {
        match feature {
            NumericFeature::Age => self.age,
            NumericFeature::StudyHours => self.study_hours,
            NumericFeature::SleepHours => self.sleep_hours,
            NumericFeature::Gpa => self.gpa,
            NumericFeature::Assignments => self.assignments,
        }
    }

    /// Value of a categorical field.
    #[must_use]
    pub fn categorical(&self, feature: CategoricalFeature) -> &str {
        match feature {
            CategoricalFeature::Gender => &self.gender,
            CategoricalFeature::Department => &self.department,
            CategoricalFeature::Exercise => &self.exercise,
            CategoricalFeature::Income => &self.income,
            CategoricalFeature::Relationship => &self.relationship,
        }
    }

    /// Checks numeric fields against the accepted input ranges:
    /// age 18–25, study 1–7 h, sleep 3–9 h, GPA 0–4, assignments 0–5.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::InvalidProfile`] for the first field out of range.
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, f64, f64, f64, &'static str); 5] = [
            ("age", self.age, 18.0, 25.0, "18..=25"),
            ("study_hours", self.study_hours, 1.0, 7.0, "1..=7"),
            ("sleep_hours", self.sleep_hours, 3.0, 9.0, "3..=9"),
            ("gpa", self.gpa, 0.0, 4.0, "0.0..=4.0"),
            ("assignments", self.assignments, 0.0, 5.0, "0..=5"),
        ];
        for (field, value, lo, hi, constraint) in checks {
            if !(lo..=hi).contains(&value) {
                return Err(StressError::InvalidProfile {
                    field,
                    value: value.to_string(),
                    constraint,
                });
            }
        }
        Ok(())
    }

    /// One-row table in original units, without labels.
    ///
    /// # Errors
    ///
    /// Propagates table construction errors.
    pub fn to_table(&self) -> Result<FeatureTable> {
        let numeric = NumericFeature::ALL
            .into_iter()
            .map(|f| (f, vec![self.numeric(f)]))
            .collect();
        let categorical = CategoricalFeature::ALL
            .into_iter()
            .map(|f| (f, vec![self.categorical(f).to_string()]))
            .collect();
        FeatureTable::new(numeric, categorical, None)
    }
}

/// Model output for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class label
    pub label: String,
    /// Probability of the healthy class
    pub probability_healthy: f64,
    /// Probability of the stress-risk class
    pub probability_stress: f64,
}

impl Prediction {
    /// Whether the predicted label is the stress-risk class.
    #[must_use]
    pub fn is_at_risk(&self) -> bool {
        self.label == STRESS_LABEL
    }
}

/// Reads the probability of `label` from one `predict_proba` row.
///
/// # Errors
///
/// Returns [`StressError::MissingClassLabel`] if `label` is not one of
/// `classes`, and a dimension error if the row is shorter than `classes`.
///
/// # Examples
///
/// ```
/// use stress_risk::inference::probability_for;
///
/// let classes = vec!["Sehat".to_string(), "Risiko Stres".to_string()];
/// let p = probability_for(&classes, &[0.3, 0.7], "Risiko Stres").expect("known label");
/// assert_eq!(p, 0.7);
/// assert!(probability_for(&classes, &[0.3, 0.7], "Lainnya").is_err());
/// ```
pub fn probability_for(classes: &[String], proba: &[f64], label: &str) -> Result<f64> {
    let index = classes
        .iter()
        .position(|c| c == label)
        .ok_or_else(|| StressError::MissingClassLabel {
            label: label.to_string(),
            classes: classes.to_vec(),
        })?;
    proba
        .get(index)
        .copied()
        .ok_or_else(|| StressError::dimension_mismatch("probabilities", classes.len(), proba.len()))
}

/// Predicts one profile with a trained model.
///
/// Only the features in the model's stats are z-scored; age stays in
/// years. Range validation is the caller's choice (see
/// [`StudentProfile::validate`]).
///
/// # Errors
///
/// Returns an error if normalization fails or either class label is
/// missing from the model.
pub fn predict_profile(model: &TrainedModel, profile: &StudentProfile) -> Result<Prediction> {
    let raw = profile.to_table()?;
    let normalized = model.stats.transform(&raw)?;

    let pipeline = &model.pipeline;
    let proba = pipeline.predict_proba(&normalized)?;
    let row = proba.row(0);
    let classes = pipeline.classes();

    let probability_healthy = probability_for(classes, row, HEALTHY_LABEL)?;
    let probability_stress = probability_for(classes, row, STRESS_LABEL)?;
    let label = classes[crate::traits::argmax(row)].clone();

    tracing::debug!(
        name = %profile.name,
        label = %label,
        probability_stress,
        "profile predicted"
    );
    Ok(Prediction {
        label,
        probability_healthy,
        probability_stress,
    })
}

/// Validates and predicts a batch of 1 to [`MAX_BATCH`] profiles.
///
/// # Errors
///
/// Returns [`StressError::InvalidBatch`] for an empty or oversized batch,
/// [`StressError::InvalidProfile`] for the first out-of-range profile, or
/// any prediction error. Nothing is returned for a partially valid batch.
pub fn predict_batch(model: &TrainedModel, profiles: &[StudentProfile]) -> Result<Vec<Prediction>> {
    if profiles.is_empty() || profiles.len() > MAX_BATCH {
        return Err(StressError::InvalidBatch {
            size: profiles.len(),
            max: MAX_BATCH,
        });
    }
    for profile in profiles {
        profile.validate()?;
    }
    profiles
        .iter()
        .map(|profile| predict_profile(model, profile))
        .collect()
}

#[cfg(test)]
#[path = "inference_tests.rs"]
mod tests;
