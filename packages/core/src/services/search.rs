//! Person search.
//!
//! Name and notes match case-insensitively; birth and death values match
//! verbatim so that "19" finds every 20th-century date. A blank query is
//! inactive and matches everyone.

use crate::models::{Person, PersonIter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    query: String,
    folded: String,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let folded = query.to_lowercase();
        Self { query, folded }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the filter narrows anything at all
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn matches(&self, person: &Person) -> bool {
        if !self.is_active() {
            return true;
        }

        person.name.to_lowercase().contains(&self.folded)
            || person.birth.contains(&self.query)
            || person.death.contains(&self.query)
            || person.notes.to_lowercase().contains(&self.folded)
    }

    /// Matching persons of a forest in depth-first pre-order.
    ///
    /// ```rust
    /// use familytree_core::models::Person;
    /// use familytree_core::services::SearchFilter;
    ///
    /// let mut root = Person::new("Grace Hopper");
    /// root.children.push(Person::new("Someone Else"));
    ///
    /// let forest = [root];
    /// let hits = SearchFilter::new("hopper").apply(&forest);
    /// assert_eq!(hits.len(), 1);
    /// ```
    pub fn apply<'a>(&self, forest: &'a [Person]) -> Vec<&'a Person> {
        PersonIter::forest(forest)
            .filter(|person| self.matches(person))
            .collect()
    }
}
