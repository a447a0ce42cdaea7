//! Family Tree Store Tests
//!
//! Covers lookup, mutation, persistence and event ordering against the
//! in-memory blob store.

use super::*;
use crate::db::{BlobStore, MemoryStore};
use crate::models::{ValidationError, DEFAULT_CHILD_NAME, DEFAULT_ROOT_NAME};
use tokio::sync::broadcast::error::TryRecvError;

fn new_store() -> FamilyTreeStore<MemoryStore> {
    FamilyTreeStore::load(MemoryStore::new()).unwrap()
}

/// Root with children A, B, C and grandchild A1 under A
fn sample_store() -> FamilyTreeStore<MemoryStore> {
    let mut store = new_store();
    store.add_sample_family().unwrap();
    store
}

fn child_names(person: &Person) -> Vec<&str> {
    person.children.iter().map(|c| c.name.as_str()).collect()
}

fn stored_forest(store: &FamilyTreeStore<MemoryStore>) -> Vec<Person> {
    let raw = store.backend().get(FOREST_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_load_empty_backend_creates_default_root() {
    let store = new_store();

    assert_eq!(store.forest().len(), 1);
    assert_eq!(store.root().name, DEFAULT_ROOT_NAME);
    assert_eq!(store.root().gender, Gender::Male);
    assert!(store.root().children.is_empty());

    // Default root is persisted immediately
    assert_eq!(store.backend().write_count(), 1);
    assert_eq!(stored_forest(&store), store.forest());
}

#[test]
fn test_load_existing_forest() {
    let raw = r#"[{"id":"r","name":"Ada","children":[{"id":"c","name":"Byron"}]}]"#;
    let store = FamilyTreeStore::load(MemoryStore::with_entries([(FOREST_KEY, raw)])).unwrap();

    assert_eq!(store.root_id(), "r");
    assert_eq!(store.find_by_id("c").unwrap().name, "Byron");
    assert_eq!(store.backend().write_count(), 0);
}

#[test]
fn test_load_corrupt_forest_is_reported_and_kept() {
    for raw in ["{not json", "[]", "42"] {
        let backend = MemoryStore::with_entries([(FOREST_KEY, raw)]);
        let err = FamilyTreeStore::load(backend).err().unwrap();
        assert!(matches!(err, FamilyTreeError::CorruptState(_)), "{raw}: {err}");
    }
}

#[test]
fn test_add_child_defaults() {
    let mut store = new_store();
    let root_id = store.root_id().to_string();

    let id = store
        .add_child(&root_id, PersonFields::new())
        .unwrap()
        .unwrap();

    let child = store.find_by_id(&id).unwrap();
    assert_eq!(child.name, DEFAULT_CHILD_NAME);
    assert_eq!(child.gender, Gender::Male);
    assert!(child.birth.is_empty());
    assert!(child.children.is_empty());
    assert_eq!(store.find_parent_of(&id).unwrap().id, root_id);
}

#[test]
fn test_add_child_appends_last() {
    let mut store = sample_store();
    let root_id = store.root_id().to_string();

    store
        .add_child(&root_id, PersonFields::new().with_name("Child D"))
        .unwrap();

    assert_eq!(
        child_names(store.root()),
        vec!["Child A", "Child B", "Child C", "Child D"]
    );
}

#[test]
fn test_add_child_with_nested_fields() {
    let mut store = new_store();
    let root_id = store.root_id().to_string();

    let fields = PersonFields::new()
        .with_name("Parent")
        .with_child(PersonFields::new().with_name("Kid"));
    let id = store.add_child(&root_id, fields).unwrap().unwrap();

    let parent = store.find_by_id(&id).unwrap();
    assert_eq!(child_names(parent), vec!["Kid"]);
    assert_ne!(parent.children[0].id, id);
    assert_eq!(store.person_count(), 3);
    assert_eq!(store.backend().write_count(), 2);
}

#[test]
fn test_add_child_to_unknown_parent_is_noop() {
    let mut store = sample_store();
    let writes = store.backend().write_count();
    let before = store.forest().to_vec();

    let result = store.add_child("missing", PersonFields::new()).unwrap();

    assert!(result.is_none());
    assert_eq!(store.forest(), before.as_slice());
    assert_eq!(store.backend().write_count(), writes);
}

#[test]
fn test_add_children_single_write() {
    let mut store = new_store();
    let root_id = store.root_id().to_string();

    let added = store
        .add_children(
            &root_id,
            vec![
                PersonFields::new().with_name("One"),
                PersonFields::new().with_name("Two"),
                PersonFields::new().with_name("Three"),
            ],
        )
        .unwrap();

    assert!(added);
    assert_eq!(child_names(store.root()), vec!["One", "Two", "Three"]);
    assert_eq!(store.backend().write_count(), 2);

    assert!(!store.add_children("missing", vec![PersonFields::new()]).unwrap());
    assert_eq!(store.backend().write_count(), 2);
}

#[test]
fn test_sample_family_shape() {
    let store = sample_store();
    let root = store.root();

    assert_eq!(child_names(root), vec!["Child A", "Child B", "Child C"]);
    assert_eq!(child_names(&root.children[0]), vec!["Grandchild A1"]);
    assert_eq!(root.children[1].gender, Gender::Female);
    assert_eq!(store.person_count(), 5);
}

#[test]
fn test_find_parent_of_root_is_none() {
    let store = sample_store();
    assert!(store.find_parent_of(store.root_id()).is_none());
    assert!(store.find_parent_of("missing").is_none());
}

#[test]
fn test_update_field() {
    let mut store = sample_store();
    let id = store.root().children[1].id.clone();

    assert!(store.update_field(&id, PersonField::Name, "Beatrice").unwrap());
    assert!(store.update_field(&id, PersonField::Birth, "1921").unwrap());
    assert!(store
        .update_field(&id, PersonField::Gender, "female")
        .unwrap());

    let person = store.find_by_id(&id).unwrap();
    assert_eq!(person.name, "Beatrice");
    assert_eq!(person.birth, "1921");
    assert_eq!(stored_forest(&store), store.forest());
}

#[test]
fn test_update_unknown_person_is_noop() {
    let mut store = sample_store();
    let writes = store.backend().write_count();

    assert!(!store.update_field("missing", PersonField::Name, "X").unwrap());
    assert_eq!(store.backend().write_count(), writes);
}

#[test]
fn test_update_invalid_gender_is_rejected() {
    let mut store = sample_store();
    let id = store.root_id().to_string();
    let writes = store.backend().write_count();

    let err = store
        .update_field(&id, PersonField::Gender, "robot")
        .unwrap_err();

    assert!(matches!(
        err,
        FamilyTreeError::Validation(ValidationError::InvalidGender(_))
    ));
    assert_eq!(store.root().gender, Gender::Male);
    assert_eq!(store.backend().write_count(), writes);
}

#[test]
fn test_delete_removes_subtree_and_keeps_sibling_order() {
    let mut store = sample_store();
    let a = store.root().children[0].clone();
    let grandchild_id = a.children[0].id.clone();

    assert!(store.delete_person(&a.id).unwrap());

    assert_eq!(child_names(store.root()), vec!["Child B", "Child C"]);
    assert!(store.find_by_id(&a.id).is_none());
    assert!(store.find_by_id(&grandchild_id).is_none());
    assert_eq!(store.person_count(), 3);
    assert_eq!(stored_forest(&store), store.forest());
}

#[test]
fn test_delete_middle_child() {
    let mut store = sample_store();
    let b_id = store.root().children[1].id.clone();

    store.delete_person(&b_id).unwrap();

    assert_eq!(child_names(store.root()), vec!["Child A", "Child C"]);
}

#[test]
fn test_delete_root_resets() {
    let mut store = sample_store();
    let old_root = store.root_id().to_string();

    assert!(store.delete_person(&old_root).unwrap());

    assert_eq!(store.forest().len(), 1);
    assert_ne!(store.root_id(), old_root);
    assert_eq!(store.root().name, DEFAULT_ROOT_NAME);
    assert!(store.root().children.is_empty());
}

#[test]
fn test_delete_unknown_is_noop() {
    let mut store = sample_store();
    let writes = store.backend().write_count();

    assert!(!store.delete_person("missing").unwrap());
    assert_eq!(store.person_count(), 5);
    assert_eq!(store.backend().write_count(), writes);
}

#[test]
fn test_reset_to_default() {
    let mut store = sample_store();
    let new_root = store.reset_to_default().unwrap();

    assert_eq!(store.root_id(), new_root);
    assert_eq!(store.person_count(), 1);
}

#[test]
fn test_replace_all_empty_keeps_a_root() {
    let mut store = sample_store();
    store.replace_all(Vec::new()).unwrap();

    assert_eq!(store.forest().len(), 1);
    assert_eq!(store.root().name, DEFAULT_ROOT_NAME);
}

#[test]
fn test_export_import_round_trip() {
    let mut source = sample_store();
    let a_id = source.root().children[0].id.clone();
    source
        .update_field(&a_id, PersonField::Notes, "Emigrated in 1923")
        .unwrap();
    let exported = source.export_json().unwrap();

    let mut target = new_store();
    let count = target.import_json(&exported).unwrap();

    assert_eq!(count, 5);
    assert_eq!(target.forest(), source.forest());
    assert_eq!(stored_forest(&target), source.forest());
}

#[test]
fn test_import_fills_missing_fields() {
    let mut store = new_store();
    store
        .import_json(r#"[{"id":"x","name":"Solo","children":null}]"#)
        .unwrap();

    let person = store.find_by_id("x").unwrap();
    assert_eq!(person.gender, Gender::Male);
    assert!(person.children.is_empty());
    assert!(person.notes.is_empty());
}

#[test]
fn test_malformed_import_leaves_tree_untouched() {
    let mut store = sample_store();
    let before = store.forest().to_vec();
    let writes = store.backend().write_count();

    for text in ["not json", "[]", "\"text\""] {
        let err = store.import_json(text).unwrap_err();
        assert!(matches!(err, FamilyTreeError::MalformedImport(_)), "{text}");
    }

    assert_eq!(store.forest(), before.as_slice());
    assert_eq!(store.backend().write_count(), writes);
}

/// Single line of descent `generations` deep; returns the youngest id.
fn chain_store(generations: usize) -> (FamilyTreeStore<MemoryStore>, String) {
    let mut store = new_store();
    let mut youngest = store.root_id().to_string();
    for index in 1..generations {
        let fields = PersonFields::new().with_name(format!("Generation {}", index + 1));
        youngest = store.add_child(&youngest, fields).unwrap().unwrap();
    }
    (store, youngest)
}

#[test]
fn test_deep_tree_reloads_and_reimports() {
    let (store, youngest) = chain_store(70);
    assert_eq!(store.statistics().generations, 70);
    let exported = store.export_json().unwrap();

    let mut other = new_store();
    assert_eq!(other.import_json(&exported).unwrap(), 70);
    assert!(other.contains(&youngest));

    let forest = store.forest().to_vec();
    let reloaded = FamilyTreeStore::load(store.into_backend()).unwrap();
    assert_eq!(reloaded.forest(), forest.as_slice());
}

#[test]
fn test_add_child_past_generation_limit_is_rejected() {
    let (mut store, youngest) = chain_store(MAX_GENERATIONS);
    let writes = store.backend().write_count();

    let err = store.add_child(&youngest, PersonFields::new()).unwrap_err();
    assert!(matches!(
        err,
        FamilyTreeError::Validation(ValidationError::TooManyGenerations(_))
    ));

    let parent_id = store.find_parent_of(&youngest).unwrap().id.clone();
    let nested = PersonFields::new().with_child(PersonFields::new());
    assert!(store.add_child(&parent_id, nested).is_err());

    assert_eq!(store.person_count(), MAX_GENERATIONS);
    assert_eq!(store.backend().write_count(), writes);

    // The deepest accepted tree still loads
    let reloaded = FamilyTreeStore::load(store.into_backend()).unwrap();
    assert_eq!(reloaded.person_count(), MAX_GENERATIONS);
}

#[test]
fn test_import_past_generation_limit_is_rejected() {
    let mut store = sample_store();
    let writes = store.backend().write_count();

    let mut too_deep = Person::new("Oldest");
    for _ in 0..MAX_GENERATIONS {
        let mut parent = Person::new("Ancestor");
        parent.children.push(too_deep);
        too_deep = parent;
    }
    let forest = vec![too_deep];
    let text = serde_json::to_string(&forest).unwrap();

    assert!(store.import_json(&text).is_err());
    let err = store.replace_all(forest.clone()).unwrap_err();
    assert!(matches!(
        err,
        FamilyTreeError::Validation(ValidationError::TooManyGenerations(_))
    ));
    assert!(FamilyTreeStore::with_forest(forest, MemoryStore::new()).is_err());

    assert_eq!(store.person_count(), 5);
    assert_eq!(store.backend().write_count(), writes);
}

#[test]
fn test_search_and_statistics() {
    let store = sample_store();

    let hits: Vec<_> = store.search("child").iter().map(|p| p.name.clone()).collect();
    assert_eq!(
        hits,
        vec!["Child A", "Grandchild A1", "Child B", "Child C"]
    );
    assert_eq!(store.search("   ").len(), 5);

    let stats = store.statistics();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.males, 2);
    assert_eq!(stats.females, 3);
    assert_eq!(stats.generations, 3);
}

#[test]
fn test_events_follow_persisted_mutations() {
    let mut store = new_store();
    let mut events = store.subscribe();
    let root_id = store.root_id().to_string();

    let child_id = store
        .add_child(&root_id, PersonFields::new())
        .unwrap()
        .unwrap();

    match events.try_recv().unwrap() {
        TreeEvent::PersonCreated {
            parent_id,
            person_id,
        } => {
            assert_eq!(parent_id, root_id);
            assert_eq!(person_id, child_id);
            // The write already happened when the event is observed
            assert!(stored_forest(&store)
                .iter()
                .flat_map(|p| p.children.iter())
                .any(|c| c.id == child_id));
        }
        other => panic!("unexpected event {other:?}"),
    }

    store
        .update_field(&child_id, PersonField::Name, "Named")
        .unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        TreeEvent::PersonUpdated {
            person_id: child_id.clone(),
            field: PersonField::Name,
        }
    );

    store.delete_person(&child_id).unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        TreeEvent::PersonDeleted {
            person_id: child_id,
            removed: 1,
        }
    );
}

#[test]
fn test_noop_operations_send_no_event() {
    let mut store = sample_store();
    let mut events = store.subscribe();

    store.add_child("missing", PersonFields::new()).unwrap();
    store.update_field("missing", PersonField::Name, "x").unwrap();
    store.delete_person("missing").unwrap();
    let _ = store.import_json("garbage");

    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
}
