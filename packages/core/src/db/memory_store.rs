//! In-memory blob store.
//!
//! Backs tests and throwaway sessions. Counts writes so callers can check
//! that no-op operations really skip persistence.

use super::blob_store::BlobStore;
use super::error::StorageError;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing entries (not counted as writes).
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            writes: 0,
        }
    }

    /// Number of `set` and `remove` calls so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.write_count(), 4);
    }

    #[test]
    fn test_seeded_entries_are_not_writes() {
        let store = MemoryStore::with_entries([("layoutMode", "wide")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.write_count(), 0);
    }
}
