//! Data Models
//!
//! This module contains the data structures used throughout FamilyTree:
//!
//! - `Person` - The single record type; a tree of persons is the whole dataset
//! - `PersonFields` / `PersonField` - Creation overrides and editable field names
//! - `age` - Lenient age computation from birth/death strings
//! - `time` - Clock abstraction used for ages of living people
//! - `Preferences` - Persisted display settings

pub mod age;
mod person;
mod preferences;
pub mod time;

pub use person::{
    generate_id, Gender, Person, PersonField, PersonFields, PersonIter, ValidationError,
    DEFAULT_CHILD_NAME, DEFAULT_ROOT_NAME, MAX_GENERATIONS,
};
pub use preferences::Preferences;
