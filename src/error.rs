//! Error types for the closet.
//!
//! Storage failures are split the way callers need to react to them:
//! the store could not be opened, a single write was rejected, or a bulk
//! import did not complete as a unit. Deleting a missing item is never an error.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for closet operations.
pub type Result<T> = std::result::Result<T, ClosetError>;

/// Main error type for the closet library.
#[derive(Error, Debug)]
pub enum ClosetError {
    /// The durable store could not be opened (permissions, bad path, corrupt file)
    #[error("Storage unavailable at {location}: {reason}")]
    StorageUnavailable { location: String, reason: String },

    /// A single add/delete write was rejected (e.g. quota exceeded)
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// A read snapshot could not be taken
    #[error("Read failed: {0}")]
    ReadFailed(String),

    /// A bulk replace could not complete as a unit; the previous contents are kept
    #[error("Import failed: {0}")]
    ImportFailed(String),

    /// Image decode/encode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed data URI or image payload
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// JSON (de)serialization failure for backups and config
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error outside the database itself
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be loaded
    #[error("Config error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl ClosetError {
    pub fn storage_unavailable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::StorageUnavailable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}
