//! Error types for frame operations.

use thiserror::Error;

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reshaping or converting tabular data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Requested column does not exist in the frame
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Row counts of two inputs disagree
    #[error("Row misalignment: expected {expected} rows, got {actual}")]
    RowMisaligned {
        /// Row count of the first input
        expected: usize,
        /// Row count of the offending input
        actual: usize,
    },

    /// Column has the wrong scientific type for the operation
    #[error("Scitype mismatch for column '{column}': expected {expected}, got {actual}")]
    ScitypeMismatch {
        /// Name of the offending column
        column: String,
        /// Scitype required by the operation
        expected: String,
        /// Scitype actually found
        actual: String,
    },

    /// Column group widths do not partition the frame
    #[error("Invalid split: group widths sum to {requested} but frame has {available} columns")]
    InvalidSplit {
        /// Sum of the requested group widths
        requested: usize,
        /// Number of columns in the frame
        available: usize,
    },

    /// Operation requires at least one row or column
    #[error("Empty frame: {0}")]
    EmptyFrame(String),

    /// Column contains nulls where a dense value is required
    #[error("Column '{0}' contains null values")]
    NullValues(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
