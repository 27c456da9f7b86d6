//! Error types for network construction and evaluation.

use thiserror::Error;

/// Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors that can occur while building, fitting or evaluating a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Node dependencies do not form a DAG
    #[error("Cycle detected in network graph")]
    CycleDetected,

    /// Node id does not belong to this network
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Machine id does not belong to this network
    #[error("Unknown machine: {0}")]
    UnknownMachine(String),

    /// Evaluation reached a source with no bound value
    #[error("Source '{0}' has no bound value")]
    SourceUnbound(String),

    /// A binding targeted a non-source node
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// Prediction requested before the machine was trained
    #[error("Machine '{0}' is not fitted")]
    MachineNotFitted(String),

    /// Node produced or received a value of the wrong kind
    #[error("Value kind mismatch at '{node}': expected {expected}, got {actual}")]
    ValueKind {
        /// Name of the offending node
        node: String,
        /// Kind required at this point in the graph
        expected: String,
        /// Kind actually produced
        actual: String,
    },

    /// Machine's model kind does not fit the requested node
    #[error("Machine '{machine}' cannot be used here: {reason}")]
    MachineKind {
        /// Name of the machine
        machine: String,
        /// Why the machine does not fit
        reason: String,
    },

    /// Model error during fit or prediction
    #[error("Model error: {0}")]
    Model(#[from] trellis_models::ModelError),

    /// Frame operation error
    #[error("Data error: {0}")]
    Data(#[from] trellis_data::DataError),
}
