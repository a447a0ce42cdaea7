//! Person Data Structures
//!
//! This module defines the `Person` record, the single node type of a family
//! tree, together with the types used to create and edit it.
//!
//! # Architecture
//!
//! - **Nested Ownership**: Every `Person` owns its `children` in insertion order.
//!   There is no stored back-reference to the parent; parents are found by search.
//! - **Stable Wire Shape**: The serialized form is exactly
//!   `id, name, birth, death, gender, image, notes, relationship, children`.
//!   Layout data (`x`, `y`, `subtreeWidth`) is never part of a `Person` and is
//!   ignored if an older export still carries it.
//!
//! # Examples
//!
//! ```rust
//! use familytree_core::models::{Gender, Person, PersonFields};
//!
//! let root = Person::default_root();
//! assert_eq!(root.name, "Root Ancestor");
//!
//! let child = Person::from_fields(
//!     PersonFields::new()
//!         .with_name("Ada Lovelace")
//!         .with_gender(Gender::Female)
//!         .with_birth("1815-12-10"),
//! );
//! assert_eq!(child.name, "Ada Lovelace");
//! assert!(child.is_living());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Display name given to a freshly created root.
pub const DEFAULT_ROOT_NAME: &str = "Root Ancestor";

/// Display name given to a freshly created child.
pub const DEFAULT_CHILD_NAME: &str = "New Person";

/// Deepest tree the store will hold, counted in generations.
///
/// Every accepted tree must also load back, so the same bound applies to
/// adding children, replacing the forest and parsing stored or imported JSON.
pub const MAX_GENERATIONS: usize = 128;

/// Validation errors for Person operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown or read-only person field: {0}")]
    UnknownField(String),

    #[error("Invalid gender: {0}")]
    InvalidGender(String),

    #[error("Invalid spacing profile: {0}")]
    InvalidSpacingProfile(String),

    #[error("Family tree would exceed {0} generations")]
    TooManyGenerations(usize),
}

/// Gender of a person.
///
/// The editor offers `male` and `female`. Any other stored value is kept
/// verbatim in `Other` so that imported data survives a save unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other(value) => value,
        }
    }

    pub fn is_male(&self) -> bool {
        matches!(self, Gender::Male)
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        match value.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other(value),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => "male".to_string(),
            Gender::Female => "female".to_string(),
            Gender::Other(value) => value,
        }
    }
}

/// Strict parse used for user edits: only the offered values are accepted.
impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ValidationError::InvalidGender(s.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single person in the family tree.
///
/// # Fields
///
/// - `id`: Opaque unique identifier, never changed after creation
/// - `name`: Display name (may be empty)
/// - `birth` / `death`: Empty, a 4-digit year, or a full date string.
///   An empty `death` means the person is living.
/// - `gender`: See [`Gender`]
/// - `image`: Image reference (usually a data URI) or empty
/// - `notes`: Free text
/// - `relationship`: Label for the edge to the parent (e.g. "spouse", "adopted")
/// - `children`: Ordered children; order drives left-to-right layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub birth: String,

    #[serde(default)]
    pub death: String,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub relationship: String,

    #[serde(default, deserialize_with = "deserialize_children")]
    pub children: Vec<Person>,
}

/// Treats `"children": null` the same as a missing list.
fn deserialize_children<'de, D>(deserializer: D) -> Result<Vec<Person>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Person>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Person {
    /// Create an empty person with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            birth: String::new(),
            death: String::new(),
            gender: Gender::Male,
            image: String::new(),
            notes: String::new(),
            relationship: String::new(),
            children: Vec::new(),
        }
    }

    /// The record used on first run and whenever the whole tree is reset.
    pub fn default_root() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }

    /// Build a new subtree from field overrides.
    ///
    /// Unset fields take the "new child" defaults. Every created record,
    /// including nested children, receives a fresh id.
    pub fn from_fields(fields: PersonFields) -> Self {
        let PersonFields {
            name,
            birth,
            death,
            gender,
            image,
            notes,
            relationship,
            children,
        } = fields;

        Self {
            id: generate_id(),
            name: name.unwrap_or_else(|| DEFAULT_CHILD_NAME.to_string()),
            birth: birth.unwrap_or_default(),
            death: death.unwrap_or_default(),
            gender: gender.unwrap_or_default(),
            image: image.unwrap_or_default(),
            notes: notes.unwrap_or_default(),
            relationship: relationship.unwrap_or_default(),
            children: children.into_iter().map(Person::from_fields).collect(),
        }
    }

    /// A person with no death value is considered living.
    pub fn is_living(&self) -> bool {
        self.death.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Read a settable field by name.
    pub fn field(&self, field: PersonField) -> &str {
        match field {
            PersonField::Name => &self.name,
            PersonField::Birth => &self.birth,
            PersonField::Death => &self.death,
            PersonField::Gender => self.gender.as_str(),
            PersonField::Image => &self.image,
            PersonField::Notes => &self.notes,
            PersonField::Relationship => &self.relationship,
        }
    }

    /// Set a field by name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidGender` if `field` is `Gender` and the
    /// value is not one of the offered genders. The record is left unchanged.
    pub fn set_field(
        &mut self,
        field: PersonField,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let value = value.into();
        match field {
            PersonField::Name => self.name = value,
            PersonField::Birth => self.birth = value,
            PersonField::Death => self.death = value,
            PersonField::Gender => self.gender = value.parse()?,
            PersonField::Image => self.image = value,
            PersonField::Notes => self.notes = value,
            PersonField::Relationship => self.relationship = value,
        }
        Ok(())
    }

    /// Up to two upper-case initials taken from the words of the name.
    ///
    /// ```rust
    /// # use familytree_core::models::Person;
    /// assert_eq!(Person::new("ada king lovelace").initials(), "AK");
    /// assert_eq!(Person::new("").initials(), "??");
    /// ```
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split(' ')
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();

        if initials.is_empty() {
            "??".to_string()
        } else {
            initials
        }
    }

    /// Depth-first, pre-order iterator over this person and all descendants.
    pub fn iter(&self) -> PersonIter<'_> {
        PersonIter { stack: vec![self] }
    }

    /// Number of records in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        self.iter().count()
    }
}

/// Pre-order traversal over a subtree or a whole forest.
pub struct PersonIter<'a> {
    stack: Vec<&'a Person>,
}

impl<'a> PersonIter<'a> {
    /// Iterate every person of a forest, root by root.
    pub fn forest(forest: &'a [Person]) -> Self {
        Self {
            stack: forest.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PersonIter<'a> {
    type Item = &'a Person;

    fn next(&mut self) -> Option<Self::Item> {
        let person = self.stack.pop()?;
        self.stack.extend(person.children.iter().rev());
        Some(person)
    }
}

/// Generate a new opaque person id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Names of the fields that may be edited after creation.
///
/// `id` and `children` are deliberately absent: ids are immutable and the
/// child list only changes through add/delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonField {
    Name,
    Birth,
    Death,
    Gender,
    Image,
    Notes,
    Relationship,
}

impl PersonField {
    pub const ALL: [PersonField; 7] = [
        PersonField::Name,
        PersonField::Birth,
        PersonField::Death,
        PersonField::Gender,
        PersonField::Image,
        PersonField::Notes,
        PersonField::Relationship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonField::Name => "name",
            PersonField::Birth => "birth",
            PersonField::Death => "death",
            PersonField::Gender => "gender",
            PersonField::Image => "image",
            PersonField::Notes => "notes",
            PersonField::Relationship => "relationship",
        }
    }
}

impl FromStr for PersonField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersonField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for PersonField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field overrides used when creating people.
///
/// Every field is optional; unset fields fall back to the new-child defaults.
/// `children` describes a nested subtree to create in the same operation.
/// There is no `id` field: ids are always generated, so any `id` key in
/// deserialized input is ignored.
///
/// # Examples
///
/// ```rust
/// # use familytree_core::models::{Gender, PersonFields};
/// let fields = PersonFields::new()
///     .with_name("Child A")
///     .with_gender(Gender::Male)
///     .with_child(PersonFields::new().with_name("Grandchild A1"));
/// assert_eq!(fields.children.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PersonFields>,
}

impl PersonFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_birth(mut self, birth: impl Into<String>) -> Self {
        self.birth = Some(birth.into());
        self
    }

    pub fn with_death(mut self, death: impl Into<String>) -> Self {
        self.death = Some(death.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    /// Generations described by these fields, 1 for a single person.
    pub fn generations(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(PersonFields::generations)
            .max()
            .unwrap_or(0)
    }

    pub fn with_child(mut self, child: PersonFields) -> Self {
        self.children.push(child);
        self
    }

    /// Set one field by name, with the same rules as [`Person::set_field`].
    pub fn set(
        &mut self,
        field: PersonField,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let value = value.into();
        match field {
            PersonField::Name => self.name = Some(value),
            PersonField::Birth => self.birth = Some(value),
            PersonField::Death => self.death = Some(value),
            PersonField::Gender => self.gender = Some(value.parse()?),
            PersonField::Image => self.image = Some(value),
            PersonField::Notes => self.notes = Some(value),
            PersonField::Relationship => self.relationship = Some(value),
        }
        Ok(())
    }
}
