//! Editing Session
//!
//! `FamilyTreeSession` is the entry point a front end holds for the lifetime
//! of one editing session. It owns the [`FamilyTreeStore`], the display
//! preferences and the clock used for ages, and derives layout and
//! statistics on demand from the current forest.
//!
//! # Lifecycle
//!
//! ```rust
//! use familytree_core::db::MemoryStore;
//! use familytree_core::services::{FamilyTreeSession, SpacingProfile};
//!
//! # fn main() -> Result<(), familytree_core::services::FamilyTreeError> {
//! let mut session = FamilyTreeSession::open(MemoryStore::new())?;
//! session.store_mut().add_sample_family()?;
//! session.set_spacing_profile(SpacingProfile::Compact)?;
//!
//! let layout = session.layout();
//! assert_eq!(layout.nodes.len(), 5);
//!
//! let backend = session.close()?;
//! # let _ = backend;
//! # Ok(())
//! # }
//! ```

use crate::db::{BlobStore, TreeEvent, BACKGROUND_KEY, SPACING_PROFILE_KEY};
use crate::models::age;
use crate::models::time::{SystemTimeProvider, TimeProvider};
use crate::models::{Person, Preferences};
use crate::services::error::FamilyTreeError;
use crate::services::layout::{LayoutEngine, SpacingProfile, TreeLayout};
use crate::services::statistics::Statistics;
use crate::services::tree_store::FamilyTreeStore;
use tokio::sync::broadcast;

pub struct FamilyTreeSession<B: BlobStore> {
    store: FamilyTreeStore<B>,
    preferences: Preferences,
    clock: Box<dyn TimeProvider>,
}

impl<B: BlobStore> FamilyTreeSession<B> {
    /// Open a session on `backend` using the system clock.
    ///
    /// Loads the stored forest (creating a default root if absent) and the
    /// stored preferences.
    pub fn open(backend: B) -> Result<Self, FamilyTreeError> {
        Self::with_clock(backend, Box::new(SystemTimeProvider))
    }

    /// Open a session with an explicit clock (tests use a fixed one).
    pub fn with_clock(backend: B, clock: Box<dyn TimeProvider>) -> Result<Self, FamilyTreeError> {
        let store = FamilyTreeStore::load(backend)?;
        let preferences = load_preferences(store.backend())?;
        tracing::info!(
            "Opened family tree session ({} people, {} spacing)",
            store.person_count(),
            preferences.spacing_profile
        );

        Ok(Self {
            store,
            preferences,
            clock,
        })
    }

    pub fn store(&self) -> &FamilyTreeStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FamilyTreeStore<B> {
        &mut self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.store.subscribe()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Layout of the current forest under the active spacing profile.
    pub fn layout(&self) -> TreeLayout {
        LayoutEngine::new(self.preferences.spacing_profile).layout(self.store.forest())
    }

    pub fn statistics(&self) -> Statistics {
        self.store.statistics()
    }

    /// People matching `query`; see [`FamilyTreeStore::search`].
    pub fn search(&self, query: &str) -> Vec<&Person> {
        self.store.search(query)
    }

    /// Age of the person with `id`, `None` if unknown or undefined.
    pub fn age_of(&self, id: &str) -> Option<u32> {
        let person = self.store.find_by_id(id)?;
        age::age_of(person, self.clock.as_ref())
    }

    pub fn clock(&self) -> &dyn TimeProvider {
        self.clock.as_ref()
    }

    pub fn spacing_profile(&self) -> SpacingProfile {
        self.preferences.spacing_profile
    }

    /// Switch the spacing profile and persist the choice.
    pub fn set_spacing_profile(&mut self, profile: SpacingProfile) -> Result<(), FamilyTreeError> {
        self.store
            .backend_mut()
            .set(SPACING_PROFILE_KEY, profile.as_str())?;
        self.preferences.spacing_profile = profile;
        tracing::info!("Spacing profile set to {}", profile);
        Ok(())
    }

    pub fn background(&self) -> Option<&str> {
        self.preferences.background.as_deref()
    }

    /// Persist a background style string.
    ///
    /// An empty or blank value is ignored and the current background kept.
    ///
    /// # Returns
    ///
    /// `true` if the background was stored.
    pub fn set_background(&mut self, background: &str) -> Result<bool, FamilyTreeError> {
        if background.trim().is_empty() {
            tracing::debug!("Ignoring empty background");
            return Ok(false);
        }

        self.store.backend_mut().set(BACKGROUND_KEY, background)?;
        self.preferences.background = Some(background.to_string());
        Ok(true)
    }

    /// Flush the forest and preferences one last time and hand back the
    /// backend.
    pub fn close(mut self) -> Result<B, FamilyTreeError> {
        self.store.flush()?;
        let backend = self.store.backend_mut();
        backend.set(SPACING_PROFILE_KEY, self.preferences.spacing_profile.as_str())?;
        if let Some(background) = &self.preferences.background {
            backend.set(BACKGROUND_KEY, background)?;
        }
        tracing::info!("Closed family tree session");
        Ok(self.store.into_backend())
    }
}

fn load_preferences<B: BlobStore>(backend: &B) -> Result<Preferences, FamilyTreeError> {
    let spacing_profile = backend
        .get(SPACING_PROFILE_KEY)?
        .map(|name| SpacingProfile::from_name_lenient(&name))
        .unwrap_or_default();

    let background = backend
        .get(BACKGROUND_KEY)?
        .filter(|value| !value.trim().is_empty());

    Ok(Preferences {
        spacing_profile,
        background,
    })
}
