//! Evaluation metrics for classifiers.
//!
//! Accuracy, precision, recall, F1-score (micro, macro, support-weighted),
//! confusion matrix and a per-class report.

pub mod classification;

pub use classification::{
    accuracy, classification_report, confusion_matrix, f1_score, precision, recall, Average,
    ClassMetrics,
};
