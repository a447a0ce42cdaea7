//! BlobStore Trait - Persistence Gateway
//!
//! The core treats storage as a flat key-value store of strings. The whole
//! serialized forest lives under one key and each preference under its own,
//! so a backend only needs `get`, `set` and `remove`.
//!
//! # Examples
//!
//! ```rust
//! use familytree_core::db::{BlobStore, MemoryStore, FOREST_KEY};
//!
//! let mut store = MemoryStore::new();
//! store.set(FOREST_KEY, "[]").unwrap();
//! assert_eq!(store.get(FOREST_KEY).unwrap().as_deref(), Some("[]"));
//! ```

use super::error::StorageError;

/// Key holding the serialized forest (a JSON array with one root record).
pub const FOREST_KEY: &str = "familyTreeData";

/// Key holding the selected spacing profile name.
pub const SPACING_PROFILE_KEY: &str = "layoutMode";

/// Key holding the background style string.
pub const BACKGROUND_KEY: &str = "familyTreeBackground";

/// Abstraction over the medium that persists the tree and preferences.
///
/// Calls are synchronous: every mutation of the tree is followed by a full
/// write before control returns to the caller.
pub trait BlobStore {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<B: BlobStore + ?Sized> BlobStore for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
