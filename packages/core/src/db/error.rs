//! Storage Error Types
//!
//! This module defines error types for the key-value blob stores that hold
//! the serialized tree and preferences.

use std::path::PathBuf;
use thiserror::Error;

/// Blob store operation errors
///
/// Covers the failure cases of reading, writing and removing keys. Parsing of
/// the stored values is handled by service-layer error types.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key contains characters the backend cannot store
    #[error("Invalid storage key: {key}")]
    InvalidKey { key: String },

    /// Failed to create the storage directory
    #[error("Failed to create storage directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a stored value
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a value
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to remove a value
    #[error("Failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    /// Create an invalid key error
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Create a directory creation error
    pub fn directory_creation_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::DirectoryCreationFailed { path, source }
    }

    /// Create a read error
    pub fn read_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::ReadFailed { path, source }
    }

    /// Create a write error
    pub fn write_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::WriteFailed { path, source }
    }

    /// Create a remove error
    pub fn remove_failed(path: PathBuf, source: std::io::Error) -> Self {
        Self::RemoveFailed { path, source }
    }
}
