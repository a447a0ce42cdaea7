//! Domain Events for FamilyTreeStore
//!
//! This module defines the events emitted by `FamilyTreeStore` after a
//! mutation has been persisted. The presentation layer subscribes to them to
//! know when to recompute layout and statistics, without the core ever
//! referring to presentation concerns.
//!
//! # Event Flow
//!
//! 1. A store mutation changes the in-memory tree
//! 2. The whole forest is written to the blob store
//! 3. The event is sent on a tokio broadcast channel (write-then-notify)
//! 4. Subscribers drain their receivers with `try_recv`

use crate::models::PersonField;
use serde::{Deserialize, Serialize};

/// Domain events emitted by FamilyTreeStore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TreeEvent {
    /// A new person (possibly with nested children) was attached to a parent
    #[serde(rename = "person:created", rename_all = "camelCase")]
    PersonCreated { parent_id: String, person_id: String },

    /// A single field of a person changed
    #[serde(rename = "person:updated", rename_all = "camelCase")]
    PersonUpdated { person_id: String, field: PersonField },

    /// A person and its whole subtree were removed
    #[serde(rename = "person:deleted", rename_all = "camelCase")]
    PersonDeleted { person_id: String, removed: usize },

    /// The tree was replaced by a fresh default root
    #[serde(rename = "tree:reset", rename_all = "camelCase")]
    TreeReset { root_id: String },

    /// The tree was replaced wholesale (import)
    #[serde(rename = "tree:replaced", rename_all = "camelCase")]
    TreeReplaced { total: usize },
}

impl TreeEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &str {
        match self {
            TreeEvent::PersonCreated { .. } => "person:created",
            TreeEvent::PersonUpdated { .. } => "person:updated",
            TreeEvent::PersonDeleted { .. } => "person:deleted",
            TreeEvent::TreeReset { .. } => "tree:reset",
            TreeEvent::TreeReplaced { .. } => "tree:replaced",
        }
    }
}
