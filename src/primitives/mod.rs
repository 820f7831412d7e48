//! Core compute primitives.
//!
//! Feature matrices are dense, row-major and `f64`; missing values are NaN.

mod matrix;

pub use matrix::Matrix;
