//! stress-risk: student stress-risk classification in pure Rust.
//!
//! The crate turns a semicolon-delimited student survey into a random forest
//! that predicts `"Sehat"` (healthy) or `"Risiko Stres"` (stress risk):
//! GPA values are repaired, numeric features are z-scored with statistics
//! persisted next to the model, categorical features are one-hot encoded and
//! probabilities are always looked up by class label.
//!
//! # Quick Start
//!
//! ```
//! use stress_risk::prelude::*;
//!
//! let csv = "\
//! Gender;Umur;Jurusan/Program Studi;Jam Belajar per Hari;Jam Tidur per Hari;IPK;Jumlah Tugas Besar per Minggu;Frekuensi Olahraga;Pemasukan Keluarga;Status Hubungan;Label
//! Perempuan;20;Informatika;4;8;3,5;1;Sering;Sedang;Jomblo;Sehat
//! Laki-laki;21;Manajemen;6;4;0.15;5;Jarang;Rendah;Jomblo;Risiko Stres
//! Perempuan;19;Informatika;3;7;3,8;2;Kadang;Tinggi;Jomblo;Sehat
//! Laki-laki;22;Teknik Sipil;7;5;2,9;4;Jarang;Sedang;Dalam hubungan;Risiko Stres
//! Perempuan;23;Manajemen;2;8;3,1;0;Sering;Rendah;Jomblo;Sehat
//! Laki-laki;20;Informatika;5;4;0.17;5;Jarang;Tinggi;Jomblo;Risiko Stres
//! Laki-laki;24;Teknik Sipil;3;9;3,3;1;Kadang;Sedang;Jomblo;Sehat
//! Perempuan;18;Manajemen;6;5;2,7;4;Jarang;Rendah;Dalam hubungan;Risiko Stres
//! Laki-laki;21;Informatika;4;7;3,6;2;Sering;Tinggi;Jomblo;Sehat
//! Perempuan;25;Teknik Sipil;7;3;2,5;5;Jarang;Sedang;Jomblo;Risiko Stres";
//!
//! let raw = RawTable::from_reader(csv.as_bytes()).expect("valid csv");
//! let table = clean_table(&raw).expect("expected columns present");
//!
//! let config = TrainingConfig::default().with_n_estimators(20);
//! let model = train(&table, &config).expect("training should succeed");
//!
//! let profile = StudentProfile {
//!     name: "Ani".into(),
//!     gender: "Perempuan".into(),
//!     age: 20.0,
//!     department: "Informatika".into(),
//!     study_hours: 4.0,
//!     sleep_hours: 8.0,
//!     gpa: 3.6,
//!     assignments: 1.0,
//!     exercise: "Sering".into(),
//!     income: "Sedang".into(),
//!     relationship: "Jomblo".into(),
//! };
//! let prediction = predict_profile(&model, &profile).expect("known labels");
//! let total = prediction.probability_healthy + prediction.probability_stress;
//! assert!((total - 1.0).abs() < 1e-6);
//! ```
//!
//! # Modules
//!
//! - [`data`]: dataset schema, loading, feature table and summaries
//! - [`preprocessing`]: GPA repair, z-score statistics, one-hot encoding
//! - [`tree`]: decision tree and random forest classifiers
//! - [`pipeline`]: column transform composed with the forest
//! - [`training`]: training run and held-out evaluation
//! - [`inference`]: profile validation and label-indexed prediction
//! - [`advice`]: rule-based recommendations
//! - [`cache`]: memoized training state
//! - [`serialization`]: persisted model artifacts
//! - [`service`]: request-level entry points
//! - [`config`]: environment configuration

pub mod advice;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod serialization;
pub mod service;
pub mod traits;
pub mod training;
pub mod tree;

#[cfg(test)]
mod test_support;

pub use error::{Result, StressError};
pub use primitives::Matrix;
pub use traits::{Classifier, Transformer};
