//! Error types for lorelei-config

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lorelei-config
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete file '{path}': {source}")]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory '{path}': {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Fallback file not found: {0}")]
    FallbackNotFound(PathBuf),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to parse record '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to serialize record: {0}")]
    Serialize(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Invalid entity id '{0}': must be a plain file name")]
    InvalidEntityId(String),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::DirectoryNotFound(_) | Error::FallbackNotFound(_) => true,
            Error::FileRead { source, .. } | Error::DirectoryRead { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }

    /// Check if a record (or the fallback file) failed to parse
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}
