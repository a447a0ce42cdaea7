//! Service Layer Error Types
//!
//! This module defines error types for tree operations. Addressing a person
//! that does not exist is not an error: store operations report it as a
//! silent no-op (`Ok(None)` / `Ok(false)`).

use crate::db::StorageError;
use crate::models::ValidationError;
use thiserror::Error;

/// Family tree operation errors
#[derive(Error, Debug)]
pub enum FamilyTreeError {
    /// Writing to or reading from the blob store failed
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    /// A field value or name was rejected
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Import text is not a usable forest; existing state is untouched
    #[error("Malformed import: {0}")]
    MalformedImport(String),

    /// The persisted forest could not be read back
    #[error("Stored family tree is corrupt: {0}")]
    CorruptState(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FamilyTreeError {
    /// Create a malformed import error
    pub fn malformed_import(msg: impl Into<String>) -> Self {
        Self::MalformedImport(msg.into())
    }

    /// Create a corrupt state error
    pub fn corrupt_state(msg: impl Into<String>) -> Self {
        Self::CorruptState(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
