//! Index error types.
//!
//! Retrieval errors are non-fatal — the orchestrator degrades to empty
//! results or a sentinel document when the index is unavailable.

use thiserror::Error;

/// Errors from embedding-store and retrieval operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The embedding provider call failed.
    #[error("embedding provider failed: {0}")]
    Embedding(String),

    /// Filesystem failure while persisting or reading artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document list artifact was malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Index artifacts missing, unreadable, or mismatched — rebuild needed.
    #[error("index artifacts not found")]
    NotFound,

    /// A vector's dimensionality differed from the rest of the matrix.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimensionality established by the first vector.
        expected: usize,
        /// Offending vector's dimensionality.
        got: usize,
    },

    /// Matrix rows and document count disagree.
    #[error("matrix rows ({rows}) do not match document count ({documents})")]
    Misaligned {
        /// Row count of the matrix.
        rows: usize,
        /// Length of the document list.
        documents: usize,
    },

    /// Rebuild requested with nothing to index.
    #[error("no documents to index")]
    Empty,

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

/// Result alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
