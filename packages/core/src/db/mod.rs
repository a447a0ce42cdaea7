//! Persistence Layer
//!
//! This module is the persistence gateway of the core:
//!
//! - `BlobStore` - key-value contract (get / set / remove) the core writes through
//! - `MemoryStore` - in-process backend for tests and scratch sessions
//! - `FileStore` - one JSON file per key, written atomically
//! - `TreeEvent` - change notifications sent after each successful write
//!
//! The core never depends on a concrete backend; the session owns whichever
//! store the caller constructs.

mod blob_store;
mod error;
pub mod events;
mod file_store;
mod memory_store;

pub use blob_store::{BlobStore, BACKGROUND_KEY, FOREST_KEY, SPACING_PROFILE_KEY};
pub use error::StorageError;
pub use events::TreeEvent;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;
