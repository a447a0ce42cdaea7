//! User preferences stored next to the tree.
//!
//! Preferences load leniently: a missing or unrecognised value falls back to
//! the default instead of failing the session.

use serde::{Deserialize, Serialize};

use crate::services::layout::SpacingProfile;

/// Display preferences persisted between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Active spacing preset (default: normal)
    #[serde(default)]
    pub spacing_profile: SpacingProfile,

    /// Background style string, opaque to the core (e.g. a CSS gradient)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}
