//! Record store error types.

use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored collection (or imported document) is not valid JSON for its record type.
    #[error("Failed to decode {collection}: {source}")]
    Decoding {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    /// No record with the given id.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A draft or setting failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
