//! Family Tree Store - Lookup and Mutation
//!
//! This module owns the forest of person records and is the only place that
//! mutates it:
//!
//! - Lookup (`find_by_id`, `find_parent_of`, `search`)
//! - Creation (`add_child`, `add_children`, `add_sample_family`)
//! - Editing (`update_field`)
//! - Removal (`delete_person`, `reset_to_default`)
//! - Wholesale replacement (`replace_all`, `import_json`)
//!
//! # Persistence
//!
//! Every successful mutation writes the whole forest to the blob store before
//! returning, then broadcasts a [`TreeEvent`]. Operations addressed to an id
//! that does not exist are silent no-ops: nothing changes, nothing is written
//! and no event is sent.
//!
//! # Tree Shape
//!
//! Children are only ever attached as freshly created records or detached
//! together with their subtree, so the structure stays a strict tree. Parents
//! are found by depth-first search; records carry no back-references.

use crate::db::{BlobStore, TreeEvent, FOREST_KEY};
use crate::models::{
    Gender, Person, PersonField, PersonFields, PersonIter, ValidationError, MAX_GENERATIONS,
};
use crate::services::error::FamilyTreeError;
use crate::services::search::SearchFilter;
use crate::services::statistics::{self, Statistics};
use crate::services::transfer;
use tokio::sync::broadcast;

/// Broadcast channel capacity for tree events.
///
/// Subscribers that fall further behind than this only miss intermediate
/// notifications; the tree itself is always read fresh.
const TREE_EVENT_CHANNEL_CAPACITY: usize = 128;

pub struct FamilyTreeStore<B: BlobStore> {
    forest: Vec<Person>,
    backend: B,
    event_tx: broadcast::Sender<TreeEvent>,
}

impl<B: BlobStore> FamilyTreeStore<B> {
    /// Load the forest from `backend`, creating and persisting a default root
    /// when none is stored yet.
    ///
    /// # Errors
    ///
    /// - `FamilyTreeError::Storage` if the backend cannot be read or written
    /// - `FamilyTreeError::CorruptState` if the stored forest does not parse;
    ///   the stored value is left untouched
    pub fn load(backend: B) -> Result<Self, FamilyTreeError> {
        match backend.get(FOREST_KEY)? {
            Some(raw) => {
                let forest = transfer::parse_forest(&raw)
                    .map_err(|e| FamilyTreeError::corrupt_state(e.to_string()))?;
                warn_on_duplicates(&forest);
                tracing::info!(
                    "Loaded family tree with {} people",
                    PersonIter::forest(&forest).count()
                );
                Ok(Self::from_parts(forest, backend))
            }
            None => {
                tracing::info!("No stored family tree, creating default root");
                let mut store = Self::from_parts(vec![Person::default_root()], backend);
                store.persist()?;
                Ok(store)
            }
        }
    }

    /// Build a store around an existing forest and persist it.
    ///
    /// An empty `forest` is replaced by a default root. A forest deeper than
    /// [`MAX_GENERATIONS`] is rejected before anything is written.
    pub fn with_forest(forest: Vec<Person>, backend: B) -> Result<Self, FamilyTreeError> {
        check_generations(&forest)?;
        let forest = if forest.is_empty() {
            vec![Person::default_root()]
        } else {
            forest
        };
        let mut store = Self::from_parts(forest, backend);
        store.persist()?;
        Ok(store)
    }

    fn from_parts(forest: Vec<Person>, backend: B) -> Self {
        let (event_tx, _) = broadcast::channel(TREE_EVENT_CHANNEL_CAPACITY);
        Self {
            forest,
            backend,
            event_tx,
        }
    }

    /// Read-only view of the forest (in practice a single root).
    pub fn forest(&self) -> &[Person] {
        &self.forest
    }

    pub fn root(&self) -> &Person {
        // Non-empty by construction: load, with_forest and import never
        // accept an empty forest.
        &self.forest[0]
    }

    pub fn root_id(&self) -> &str {
        &self.root().id
    }

    /// Total number of people across the forest
    pub fn person_count(&self) -> usize {
        PersonIter::forest(&self.forest).count()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Receive a [`TreeEvent`] after each persisted mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.event_tx.subscribe()
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Depth-first search for a person by id.
    pub fn find_by_id(&self, id: &str) -> Option<&Person> {
        PersonIter::forest(&self.forest).find(|person| person.id == id)
    }

    /// Direct parent of `child_id`, `None` for a root or an unknown id.
    pub fn find_parent_of(&self, child_id: &str) -> Option<&Person> {
        find_parent(&self.forest, child_id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    /// People matching `query`, in depth-first pre-order.
    pub fn search(&self, query: &str) -> Vec<&Person> {
        SearchFilter::new(query).apply(&self.forest)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.forest)
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Append a new child under `parent_id`.
    ///
    /// Unset `fields` take the new-child defaults; nested `fields.children`
    /// are created in the same write.
    ///
    /// # Returns
    ///
    /// The new id, or `None` if the parent does not exist (no write).
    ///
    /// # Errors
    ///
    /// `ValidationError::TooManyGenerations` if the tree would grow deeper
    /// than [`MAX_GENERATIONS`]; nothing is written.
    pub fn add_child(
        &mut self,
        parent_id: &str,
        fields: PersonFields,
    ) -> Result<Option<String>, FamilyTreeError> {
        let created = self.attach_children(parent_id, vec![fields])?;
        Ok(created.and_then(|ids| ids.into_iter().next()))
    }

    /// Append several children under `parent_id` with a single write.
    ///
    /// # Returns
    ///
    /// `false` if the parent does not exist; nothing is added in that case.
    pub fn add_children(
        &mut self,
        parent_id: &str,
        children: Vec<PersonFields>,
    ) -> Result<bool, FamilyTreeError> {
        Ok(self.attach_children(parent_id, children)?.is_some())
    }

    fn attach_children(
        &mut self,
        parent_id: &str,
        children: Vec<PersonFields>,
    ) -> Result<Option<Vec<String>>, FamilyTreeError> {
        let Some(parent_level) = level_of(&self.forest, parent_id, 0) else {
            tracing::warn!("add child: parent {} not found", parent_id);
            return Ok(None);
        };

        let added = children.iter().map(PersonFields::generations).max().unwrap_or(0);
        if parent_level + 1 + added > MAX_GENERATIONS {
            tracing::warn!(
                "add child: {} would exceed {} generations",
                parent_id,
                MAX_GENERATIONS
            );
            return Err(ValidationError::TooManyGenerations(MAX_GENERATIONS).into());
        }

        let Some(parent) = find_mut(&mut self.forest, parent_id) else {
            return Ok(None);
        };

        let mut created = Vec::with_capacity(children.len());
        for fields in children {
            let child = Person::from_fields(fields);
            created.push(child.id.clone());
            parent.children.push(child);
        }

        self.persist()?;
        tracing::info!("Added {} child(ren) under {}", created.len(), parent_id);

        for person_id in &created {
            self.emit(TreeEvent::PersonCreated {
                parent_id: parent_id.to_string(),
                person_id: person_id.clone(),
            });
        }
        Ok(Some(created))
    }

    /// Seed a small example family: three children under the root and one
    /// grandchild under the first of them.
    pub fn add_sample_family(&mut self) -> Result<(), FamilyTreeError> {
        let root_id = self.root_id().to_string();
        self.add_children(
            &root_id,
            vec![
                PersonFields::new()
                    .with_name("Child A")
                    .with_gender(Gender::Male),
                PersonFields::new()
                    .with_name("Child B")
                    .with_gender(Gender::Female),
                PersonFields::new()
                    .with_name("Child C")
                    .with_gender(Gender::Female),
            ],
        )?;

        let first_child = self.root().children.first().map(|child| child.id.clone());
        if let Some(first_child_id) = first_child {
            self.add_children(
                &first_child_id,
                vec![PersonFields::new()
                    .with_name("Grandchild A1")
                    .with_gender(Gender::Female)],
            )?;
        }
        Ok(())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Set one editable field of a person.
    ///
    /// # Returns
    ///
    /// `false` if the person does not exist (no write).
    ///
    /// # Errors
    ///
    /// `FamilyTreeError::Validation` for a gender outside the offered values;
    /// the record is unchanged and nothing is written.
    pub fn update_field(
        &mut self,
        id: &str,
        field: PersonField,
        value: impl Into<String>,
    ) -> Result<bool, FamilyTreeError> {
        let Some(person) = find_mut(&mut self.forest, id) else {
            tracing::warn!("update {}: person {} not found", field, id);
            return Ok(false);
        };

        person.set_field(field, value)?;

        self.persist()?;
        tracing::debug!("Updated {} of {}", field, id);
        self.emit(TreeEvent::PersonUpdated {
            person_id: id.to_string(),
            field,
        });
        Ok(true)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove a person and their whole subtree.
    ///
    /// Deleting the root instead resets the tree to a fresh default root.
    /// Callers are expected to have confirmed either operation with the user.
    ///
    /// # Returns
    ///
    /// `false` if `id` is not in the tree (no write).
    pub fn delete_person(&mut self, id: &str) -> Result<bool, FamilyTreeError> {
        if self.root_id() == id {
            self.reset_to_default()?;
            return Ok(true);
        }

        let Some(removed) = remove_descendant(&mut self.forest, id) else {
            tracing::warn!("delete: person {} not found", id);
            return Ok(false);
        };

        let removed_count = removed.subtree_size();
        self.persist()?;
        tracing::info!("Deleted {} ({} people removed)", id, removed_count);
        self.emit(TreeEvent::PersonDeleted {
            person_id: id.to_string(),
            removed: removed_count,
        });
        Ok(true)
    }

    /// Replace the whole forest with a single default root.
    ///
    /// # Returns
    ///
    /// The id of the new root.
    pub fn reset_to_default(&mut self) -> Result<String, FamilyTreeError> {
        let root = Person::default_root();
        let root_id = root.id.clone();
        self.forest = vec![root];

        self.persist()?;
        tracing::info!("Reset family tree to default root {}", root_id);
        self.emit(TreeEvent::TreeReset {
            root_id: root_id.clone(),
        });
        Ok(root_id)
    }

    // =========================================================================
    // Replacement
    // =========================================================================

    /// Replace the forest wholesale.
    ///
    /// The forest is taken as-is; repeated ids are only reported through
    /// logging. An empty forest is replaced by a default root so that the
    /// root always exists.
    ///
    /// # Errors
    ///
    /// `ValidationError::TooManyGenerations` if the forest is deeper than
    /// [`MAX_GENERATIONS`]; nothing is written.
    pub fn replace_all(&mut self, forest: Vec<Person>) -> Result<(), FamilyTreeError> {
        check_generations(&forest)?;
        warn_on_duplicates(&forest);
        self.forest = if forest.is_empty() {
            tracing::warn!("replace_all: empty forest, keeping a default root");
            vec![Person::default_root()]
        } else {
            forest
        };

        self.persist()?;
        let total = self.person_count();
        tracing::info!("Replaced family tree ({} people)", total);
        self.emit(TreeEvent::TreeReplaced { total });
        Ok(())
    }

    /// Parse exported JSON and replace the forest with it.
    ///
    /// # Errors
    ///
    /// `FamilyTreeError::MalformedImport` if the text does not parse; the
    /// current forest is kept and nothing is written.
    pub fn import_json(&mut self, text: &str) -> Result<usize, FamilyTreeError> {
        let forest = transfer::parse_forest(text).inspect_err(|e| {
            tracing::warn!("Import rejected: {}", e);
        })?;
        self.replace_all(forest)?;
        Ok(self.person_count())
    }

    /// Pretty-printed JSON of the current forest.
    pub fn export_json(&self) -> Result<String, FamilyTreeError> {
        transfer::export_forest(&self.forest)
    }

    /// Write the current forest again.
    pub fn flush(&mut self) -> Result<(), FamilyTreeError> {
        self.persist()
    }

    fn persist(&mut self) -> Result<(), FamilyTreeError> {
        let serialized = transfer::serialize_forest(&self.forest)?;
        self.backend.set(FOREST_KEY, &serialized)?;
        Ok(())
    }

    fn emit(&self, event: TreeEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

fn check_generations(forest: &[Person]) -> Result<(), FamilyTreeError> {
    if !forest.is_empty() && statistics::max_level(forest) + 1 > MAX_GENERATIONS {
        tracing::warn!("Rejected forest deeper than {} generations", MAX_GENERATIONS);
        return Err(ValidationError::TooManyGenerations(MAX_GENERATIONS).into());
    }
    Ok(())
}

fn warn_on_duplicates(forest: &[Person]) {
    let duplicates = transfer::find_duplicate_ids(forest);
    if !duplicates.is_empty() {
        tracing::warn!(
            "Family tree contains {} repeated id(s): {:?}",
            duplicates.len(),
            duplicates
        );
    }
}

fn find_mut<'a>(persons: &'a mut [Person], id: &str) -> Option<&'a mut Person> {
    for person in persons.iter_mut() {
        if person.id == id {
            return Some(person);
        }
        if let Some(found) = find_mut(&mut person.children, id) {
            return Some(found);
        }
    }
    None
}

/// Zero-based generation of the first person with `id`.
fn level_of(persons: &[Person], id: &str, level: usize) -> Option<usize> {
    for person in persons {
        if person.id == id {
            return Some(level);
        }
        if let Some(found) = level_of(&person.children, id, level + 1) {
            return Some(found);
        }
    }
    None
}

fn find_parent<'a>(persons: &'a [Person], child_id: &str) -> Option<&'a Person> {
    for person in persons {
        if person.children.iter().any(|child| child.id == child_id) {
            return Some(person);
        }
        if let Some(found) = find_parent(&person.children, child_id) {
            return Some(found);
        }
    }
    None
}

/// Detach the first non-root person with `id`, returning its subtree.
fn remove_descendant(persons: &mut [Person], id: &str) -> Option<Person> {
    for person in persons.iter_mut() {
        if let Some(index) = person.children.iter().position(|child| child.id == id) {
            return Some(person.children.remove(index));
        }
        if let Some(removed) = remove_descendant(&mut person.children, id) {
            return Some(removed);
        }
    }
    None
}

#[cfg(test)]
#[path = "tree_store_test.rs"]
mod tree_store_test;
