//! FamilyTree Core Logic Layer
//!
//! This crate provides the data model, persistence and derived views for the
//! FamilyTree genealogy editor.
//!
//! # Architecture
//!
//! - **Single Record Type**: every node of the tree is a [`Person`] owning its children
//! - **Whole-Forest Persistence**: each mutation rewrites the forest through a [`BlobStore`]
//! - **Derived Views**: layout and statistics are recomputed from the forest on demand
//! - **Synchronous Core**: no async runtime; change notifications use a broadcast channel
//!
//! # Modules
//!
//! - [`models`] - Data structures (Person, PersonFields, Preferences, clocks)
//! - [`db`] - Persistence gateway (BlobStore, FileStore, MemoryStore, events)
//! - [`services`] - Tree store, session, layout, statistics, search and transfer

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::{BlobStore, FileStore, MemoryStore, StorageError, TreeEvent};
pub use models::*;
pub use services::*;
