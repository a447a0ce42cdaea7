//! Statistics Aggregator
//!
//! A single depth-first pass over the forest producing head counts.
//!
//! # Gender Buckets
//!
//! Counting is deliberately coarse: a person is counted as male only when the
//! stored gender is `male`; every other value, including unknown strings kept
//! from imports, lands in the female bucket.

use crate::models::Person;
use serde::{Deserialize, Serialize};

/// Head counts over the whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub males: usize,
    pub females: usize,
    pub living: usize,
    pub deceased: usize,
    /// Deepest generation + 1
    pub generations: usize,
}

impl Statistics {
    /// Aggregate over a forest in O(n).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use familytree_core::models::Person;
    /// use familytree_core::services::Statistics;
    ///
    /// let stats = Statistics::compute(&[Person::default_root()]);
    /// assert_eq!(stats.total, 1);
    /// assert_eq!(stats.generations, 1);
    /// ```
    pub fn compute(forest: &[Person]) -> Self {
        let mut stats = Statistics::default();
        let mut max_level = 0;

        let mut stack: Vec<(&Person, usize)> = forest.iter().map(|p| (p, 0)).collect();
        while let Some((person, level)) = stack.pop() {
            stats.total += 1;
            if person.gender.is_male() {
                stats.males += 1;
            } else {
                stats.females += 1;
            }
            if person.is_living() {
                stats.living += 1;
            } else {
                stats.deceased += 1;
            }
            max_level = max_level.max(level);
            stack.extend(person.children.iter().map(|child| (child, level + 1)));
        }

        stats.generations = max_level + 1;
        stats
    }

    /// Share of males in percent, 0 for an empty tree
    pub fn male_percentage(&self) -> f64 {
        percentage(self.males, self.total)
    }

    /// Share of the female bucket in percent, 0 for an empty tree
    pub fn female_percentage(&self) -> f64 {
        percentage(self.females, self.total)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Deepest generation index of a forest (0 when only roots exist).
pub fn max_level(forest: &[Person]) -> usize {
    fn walk(persons: &[Person], level: usize) -> usize {
        persons
            .iter()
            .filter(|person| !person.children.is_empty())
            .map(|person| walk(&person.children, level + 1))
            .fold(level, usize::max)
    }

    walk(forest, 0)
}
