//! Error types for storage and registry mutations

use thiserror::Error;

/// Failure reading or writing the durable plant snapshot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed plant data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a registry mutation.
///
/// When the snapshot write fails the in-memory change has already been applied.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("plant id already exists: {0}")]
    DuplicateId(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
