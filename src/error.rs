//! Error types for the storage layer.
//!
//! Only the storage adapters surface typed errors. Store mutations never
//! fail for expected conditions (unknown id, empty collection, persistence
//! unavailable) — those are silent no-ops or logged-and-swallowed, and the
//! in-memory collection stays authoritative for the running session.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the local storage area.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create storage directory {0}")]
    CreateDir(PathBuf),
}
