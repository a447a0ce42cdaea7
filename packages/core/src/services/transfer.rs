//! JSON import and export of whole forests.
//!
//! Export writes the persisted shape (an array holding the root record)
//! pretty-printed. Import accepts that shape, or a bare root object, and
//! rejects anything that does not parse into at least one person.
//!
//! Parsing runs without serde_json's fixed recursion limit, so deep trees the
//! store accepted can always be read back. Nesting is bounded up front by
//! [`MAX_GENERATIONS`] instead.

use crate::models::{Person, PersonIter, MAX_GENERATIONS};
use crate::services::error::FamilyTreeError;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Serialize a forest in the compact form used for persistence.
pub fn serialize_forest(forest: &[Person]) -> Result<String, FamilyTreeError> {
    serde_json::to_string(forest).map_err(|e| FamilyTreeError::serialization(e.to_string()))
}

/// Serialize a forest pretty-printed for export.
pub fn export_forest(forest: &[Person]) -> Result<String, FamilyTreeError> {
    serde_json::to_string_pretty(forest).map_err(|e| FamilyTreeError::serialization(e.to_string()))
}

/// Parse user-supplied text into a forest.
///
/// # Errors
///
/// Returns `FamilyTreeError::MalformedImport` when the text is not JSON, is
/// neither an array nor an object, contains a record without an `id`, holds
/// no records at all, or nests deeper than [`MAX_GENERATIONS`] allow.
///
/// # Examples
///
/// ```rust
/// use familytree_core::services::transfer::parse_forest;
///
/// let forest = parse_forest(r#"[{"id":"p1","name":"Root","children":[]}]"#).unwrap();
/// assert_eq!(forest[0].name, "Root");
///
/// assert!(parse_forest("not json").is_err());
/// assert!(parse_forest("[]").is_err());
/// ```
pub fn parse_forest(text: &str) -> Result<Vec<Person>, FamilyTreeError> {
    // An array holding the root, then a children array per generation
    let max_nesting = 2 * MAX_GENERATIONS + 1;
    if nesting_depth(text) > max_nesting {
        return Err(FamilyTreeError::malformed_import(format!(
            "tree nests deeper than {MAX_GENERATIONS} generations"
        )));
    }

    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)
        .and_then(|value| deserializer.end().map(|()| value))
        .map_err(|e| FamilyTreeError::malformed_import(format!("invalid JSON: {e}")))?;

    let forest = match value {
        Value::Array(_) => serde_json::from_value::<Vec<Person>>(value)
            .map_err(|e| FamilyTreeError::malformed_import(e.to_string()))?,
        Value::Object(_) => vec![serde_json::from_value::<Person>(value)
            .map_err(|e| FamilyTreeError::malformed_import(e.to_string()))?],
        other => {
            return Err(FamilyTreeError::malformed_import(format!(
                "expected an array of people, found {}",
                json_kind(&other)
            )))
        }
    };

    if forest.is_empty() {
        return Err(FamilyTreeError::malformed_import(
            "forest must contain a root person",
        ));
    }

    Ok(forest)
}

/// Deepest bracket nesting in `text`, ignoring brackets inside strings.
fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Ids that occur more than once, in first-repeat order.
pub fn find_duplicate_ids(forest: &[Person]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for person in PersonIter::forest(forest) {
        if !seen.insert(person.id.as_str()) && reported.insert(person.id.as_str()) {
            duplicates.push(person.id.clone());
        }
    }

    duplicates
}

/// Suggested file name for a download made on `date`.
///
/// ```rust
/// # use familytree_core::services::transfer::export_file_name;
/// # use chrono::NaiveDate;
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(export_file_name(date), "family_tree_2024-03-09.json");
/// ```
pub fn export_file_name(date: NaiveDate) -> String {
    format!("family_tree_{}.json", date.format("%Y-%m-%d"))
}
