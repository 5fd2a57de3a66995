//! Error types for the RAG crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Chunking or retrieval parameters are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Vector length differs from the index dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension provided.
        actual: usize,
    },

    /// An index was built from zero vectors.
    #[error("cannot build an index from zero vectors")]
    EmptyInput,

    /// A position does not exist in the metadata map.
    #[error("position {position} out of range for {len} records")]
    IndexOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of records in the map.
        len: usize,
    },

    /// A persisted index or metadata file is structurally invalid.
    #[error("corrupt persisted state at {path}: {reason}")]
    CorruptPersistedState {
        /// File that failed validation.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The embedding or answer provider failed.
    #[error("provider error: {0}")]
    Provider(#[source] anyhow::Error),

    /// Reading or writing a persisted file failed.
    #[error("persistence error at {path}: {source}")]
    Persistence {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RagError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptPersistedState {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
