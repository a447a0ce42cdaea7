//! Business Services
//!
//! This module contains the family tree logic built on top of the models
//! and the persistence gateway:
//!
//! - `FamilyTreeStore` - Lookup and mutation of the forest, persisted on every change
//! - `FamilyTreeSession` - Store plus preferences and clock for one editing session
//! - `LayoutEngine` - Subtree widths, centered positions and generation labels
//! - `Statistics` - Counts by gender, living status and generation
//! - `SearchFilter` - Case-insensitive matching over names, dates and notes
//! - `transfer` - JSON import and export of whole forests
//!
//! Services never touch presentation concerns; they hand out plain data and
//! broadcast `TreeEvent`s after each persisted mutation.

pub mod error;
pub mod layout;
pub mod search;
pub mod session;
pub mod statistics;
pub mod transfer;
pub mod tree_store;

pub use error::FamilyTreeError;
pub use layout::{
    Connector, GenerationLabel, LayoutConfig, LayoutEngine, NodePosition, Point, Spacing,
    SpacingProfile, TreeLayout, RELATIONSHIP_PALETTE,
};
pub use search::SearchFilter;
pub use session::FamilyTreeSession;
pub use statistics::Statistics;
pub use tree_store::FamilyTreeStore;
