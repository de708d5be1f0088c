//! Error types for spatio-grid.

use spatio_grid_types::Dataset;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced by configuration, record parsing and the execution engines.
///
/// There are no recoverable domain errors: every variant aborts the unit of
/// work that produced it.
#[derive(Debug, Error)]
pub enum GridError {
    /// Run parameters failed validation. Raised before any partitioning.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An input line could not be decoded.
    #[error("malformed {dataset} record at line {line}: {source}")]
    MalformedRecord {
        dataset: Dataset,
        /// 1-based line number in the input.
        line: usize,
        source: RecordError,
    },

    #[error("execution engine error: {0}")]
    Engine(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Serialization(err.to_string())
    }
}

/// Why a single text record failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field `{field}` is not an integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("field `{field}` must not be negative, got {value}")]
    NegativeExtent { field: &'static str, value: i64 },
}
