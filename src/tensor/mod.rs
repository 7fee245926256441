//! Minimal dense linear algebra for the controllers
//!
//! Provides:
//! - `Matrix`: 2-D array of `f64` backed by `ndarray::Array2`
//! - matrix product, elementwise add and map
//! - a little-endian binary record format for single matrices and lists

pub mod codec;
pub mod matrix;

pub use matrix::Matrix;

use thiserror::Error;

/// Errors raised by matrix arithmetic and decoding
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TensorError {
    #[error("incompatible dimensions for {op}: {left_rows}x{left_cols} and {right_rows}x{right_cols}")]
    DimensionMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("expected {expected} values for the declared shape, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error("matrix record needs {needed} bytes but only {available} remain")]
    Truncated { needed: usize, available: usize },

    #[error("expected {expected} matrix records, found {found}")]
    MissingRecords { expected: usize, found: usize },
}
