//! Dataset schema, loading and the in-memory feature table.
//!
//! The survey file is semicolon-delimited with a fixed header (column names
//! are the original Indonesian survey questions). [`RawTable`] holds cells as
//! text exactly as read; the cleaner in [`crate::preprocessing`] turns it into
//! a typed [`FeatureTable`].

mod loader;
pub mod summary;
mod table;

pub use loader::RawTable;
pub use summary::{describe, ColumnStats, DatasetSummary};
pub use table::FeatureTable;

use serde::{Deserialize, Serialize};

/// Header of the target column.
pub const LABEL_COLUMN: &str = "Label";

/// Label of the healthy class.
pub const HEALTHY_LABEL: &str = "Sehat";

/// Label of the stress-risk class.
pub const STRESS_LABEL: &str = "Risiko Stres";

/// Numeric survey fields.
///
/// The serde representation is the file header, so persisted statistics are
/// keyed by the same names the dataset uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NumericFeature {
    /// Age in years
    #[serde(rename = "Umur")]
    Age,
    /// Study hours per day
    #[serde(rename = "Jam Belajar per Hari")]
    StudyHours,
    /// Sleep hours per day
    #[serde(rename = "Jam Tidur per Hari")]
    SleepHours,
    /// Grade point average (0.0–4.0), optional column
    #[serde(rename = "IPK")]
    Gpa,
    /// Major assignments per week
    #[serde(rename = "Jumlah Tugas Besar per Minggu")]
    Assignments,
}

impl NumericFeature {
    /// All numeric features in model column order.
    pub const ALL: [Self; 5] = [
        Self::Age,
        Self::StudyHours,
        Self::SleepHours,
        Self::Gpa,
        Self::Assignments,
    ];

    /// Column header in the dataset file.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Age => "Umur",
            Self::StudyHours => "Jam Belajar per Hari",
            Self::SleepHours => "Jam Tidur per Hari",
            Self::Gpa => "IPK",
            Self::Assignments => "Jumlah Tugas Besar per Minggu",
        }
    }

    /// Whether the feature is z-scored before training and inference.
    ///
    /// Age passes through in its original units.
    #[must_use]
    pub fn is_normalized(self) -> bool {
        !matches!(self, Self::Age)
    }

    /// Whether the dataset may omit this column entirely.
    #[must_use]
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Gpa)
    }

    /// Looks a feature up by its header.
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.header() == header)
    }
}

impl std::fmt::Display for NumericFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

/// Categorical survey fields, one-hot encoded by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalFeature {
    /// "Laki-laki" / "Perempuan"
    #[serde(rename = "Gender")]
    Gender,
    /// Department / study program
    #[serde(rename = "Jurusan/Program Studi")]
    Department,
    /// "Jarang" / "Kadang" / "Sering"
    #[serde(rename = "Frekuensi Olahraga")]
    Exercise,
    /// "Rendah" / "Sedang" / "Tinggi"
    #[serde(rename = "Pemasukan Keluarga")]
    Income,
    /// "Jomblo" / "Dalam hubungan"
    #[serde(rename = "Status Hubungan")]
    Relationship,
}

impl CategoricalFeature {
    /// All categorical features in model column order.
    pub const ALL: [Self; 5] = [
        Self::Gender,
        Self::Department,
        Self::Exercise,
        Self::Income,
        Self::Relationship,
    ];

    /// Position in [`CategoricalFeature::ALL`].
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Column header in the dataset file.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Department => "Jurusan/Program Studi",
            Self::Exercise => "Frekuensi Olahraga",
            Self::Income => "Pemasukan Keluarga",
            Self::Relationship => "Status Hubungan",
        }
    }
}

impl std::fmt::Display for CategoricalFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}
