//! Rule-based recommendations that accompany a prediction.
//!
//! For a stress-risk prediction the profile's triggers are listed, or a
//! general list when none fires. For a healthy prediction the profile's
//! strengths are listed together with the upkeep tips.

use crate::inference::{Prediction, StudentProfile};
use serde::{Deserialize, Serialize};

/// Tone of one recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    /// A specific habit to change
    Warning,
    /// A habit worth keeping
    Positive,
    /// Generic guidance
    General,
}

/// One recommendation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    /// Tone
    pub kind: AdviceKind,
    /// Message shown to the student
    pub message: String,
}

impl Advice {
    fn new(kind: AdviceKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

const EXERCISE_RARELY: &str = "Jarang";
const IN_RELATIONSHIP: &str = "Dalam hubungan";

const GENERAL_STRESS_TIPS: [&str; 4] = [
    "Jaga pola tidur 7-9 jam",
    "Kelola waktu dengan baik",
    "Lakukan aktivitas relaksasi",
    "Konsultasi dengan konselor jika diperlukan",
];

const HEALTHY_UPKEEP_TIPS: [&str; 3] = [
    "Jaga konsistensi pola tidur dan belajar",
    "Tetap aktif bergerak dan berolahraga",
    "Luangkan waktu untuk hobi dan relaksasi",
];

/// Habits in the profile that call for a change, regardless of prediction.
#[must_use]
pub fn risk_factors(profile: &StudentProfile, at_risk: bool) -> Vec<Advice> {
    let mut advice = Vec::new();
    let warn = |message: String| Advice::new(AdviceKind::Warning, message);

    if profile.sleep_hours < 6.0 {
        advice.push(warn(format!(
            "Tingkatkan jam tidur dari {} jam menjadi 7-9 jam per hari untuk pemulihan optimal",
            profile.sleep_hours
        )));
    } else if profile.sleep_hours > 9.0 {
        advice.push(warn(format!(
            "Kurangi jam tidur dari {} jam menjadi 7-9 jam (tidur berlebihan bisa menurunkan produktivitas)",
            profile.sleep_hours
        )));
    }

    if profile.study_hours > 6.0 {
        advice.push(warn(format!(
            "Atur ulang waktu belajar, {} jam terlalu lama. Fokus pada kualitas, bukan kuantitas (4-5 jam efektif lebih baik)",
            profile.study_hours
        )));
    } else if profile.study_hours < 2.0 {
        advice.push(warn(format!(
            "Tambah waktu belajar dari {} jam menjadi minimal 3-4 jam per hari",
            profile.study_hours
        )));
    }

    if profile.exercise == EXERCISE_RARELY {
        advice.push(warn(
            "Mulai olahraga rutin minimal 3x seminggu (30 menit) untuk mengurangi stres dan meningkatkan fokus"
                .to_string(),
        ));
    }

    if profile.gpa < 2.5 {
        advice.push(warn(format!(
            "Tingkatkan strategi belajar, IPK {:.2} perlu perhatian khusus. Pertimbangkan belajar kelompok atau konsultasi dosen",
            profile.gpa
        )));
    }

    if profile.assignments >= 4.0 {
        advice.push(warn(format!(
            "Kelola beban tugas, {} tugas besar per minggu sangat tinggi. Buat prioritas dan deadline yang realistis",
            profile.assignments
        )));
    }

    if profile.relationship == IN_RELATIONSHIP && at_risk {
        advice.push(warn(
            "Seimbangkan kehidupan pribadi, komunikasikan kebutuhan waktu belajar dengan pasangan"
                .to_string(),
        ));
    }

    advice
}

/// Recommendations for a profile and its prediction.
///
/// # Examples
///
/// ```
/// use stress_risk::advice::{advise, AdviceKind};
/// use stress_risk::inference::{Prediction, StudentProfile};
///
/// let profile = StudentProfile {
///     name: "Ani".into(),
///     gender: "Perempuan".into(),
///     age: 20.0,
///     department: "Informatika".into(),
///     study_hours: 4.0,
///     sleep_hours: 5.0,
///     gpa: 3.2,
///     assignments: 2.0,
///     exercise: "Kadang".into(),
///     income: "Sedang".into(),
///     relationship: "Jomblo".into(),
/// };
/// let prediction = Prediction {
///     label: "Risiko Stres".into(),
///     probability_healthy: 0.3,
///     probability_stress: 0.7,
/// };
/// let advice = advise(&profile, &prediction);
/// assert_eq!(advice.len(), 1);
/// assert_eq!(advice[0].kind, AdviceKind::Warning);
/// ```
#[must_use]
pub fn advise(profile: &StudentProfile, prediction: &Prediction) -> Vec<Advice> {
    if prediction.is_at_risk() {
        let specific = risk_factors(profile, true);
        if !specific.is_empty() {
            return specific;
        }
        return GENERAL_STRESS_TIPS
            .iter()
            .map(|tip| Advice::new(AdviceKind::General, *tip))
            .collect();
    }

    let mut advice = Vec::new();
    if (7.0..=9.0).contains(&profile.sleep_hours) {
        advice.push(Advice::new(
            AdviceKind::Positive,
            format!("Pola tidur Anda ({} jam) sudah ideal", profile.sleep_hours),
        ));
    }
    if profile.exercise == "Kadang" || profile.exercise == "Sering" {
        advice.push(Advice::new(
            AdviceKind::Positive,
            format!("Kebiasaan olahraga '{}' sangat baik", profile.exercise),
        ));
    }
    if profile.gpa >= 3.0 {
        advice.push(Advice::new(
            AdviceKind::Positive,
            format!("IPK {:.2} menunjukkan performa akademik yang baik", profile.gpa),
        ));
    }
    advice.extend(
        HEALTHY_UPKEEP_TIPS
            .iter()
            .map(|tip| Advice::new(AdviceKind::General, *tip)),
    );
    advice
}
