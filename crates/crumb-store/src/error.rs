use thiserror::Error;

use crumb_core::ValidationError;

/// Fault in the underlying key-value storage.
///
/// Unparseable *content* is not an error — the store treats it as absent;
/// this type covers I/O faults only.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed for {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage write failed for {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage remove failed for {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by [`crate::PersistedStore`] write operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity failed its shape validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The entity could not be serialized for storage.
    #[error("failed to serialize entity for storage: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The durable write or removal failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
