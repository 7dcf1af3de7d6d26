//! Error types for the transfer-function model.

/// Result alias used throughout `tfn-core`.
pub type Result<T> = std::result::Result<T, TfnError>;

/// Errors raised by control-point edits, evaluation, and configuration.
#[derive(Debug, thiserror::Error)]
pub enum TfnError {
    /// A sequence invariant does not hold (too few points, unsorted, bad endpoints).
    #[error("malformed transfer function: {0}")]
    MalformedTransferFunction(String),

    #[error("control point index {index} out of range (len {len})")]
    InvalidIndex { index: usize, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The selected transfer function was loaded from a file and may not be edited.
    #[error("transfer function '{0}' is read-only")]
    ReadOnly(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
