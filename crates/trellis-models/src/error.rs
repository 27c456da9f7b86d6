//! Error types for model fitting and prediction.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while fitting or applying a component model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Feature/target dimensions disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Training data has no rows
    #[error("Empty training data")]
    EmptyTraining,

    /// Hyperparameter outside its valid range
    #[error("Invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    /// Normal equations could not be solved
    #[error("Singular matrix in least squares solve")]
    SingularMatrix,

    /// Category absent from the training data seen at transform time
    #[error("Unknown category '{value}' in column '{column}'")]
    UnknownCategory {
        /// Column in which the category appeared
        column: String,
        /// The unseen category value
        value: String,
    },

    /// Frame operation error
    #[error("Data error: {0}")]
    Data(#[from] trellis_data::DataError),
}
