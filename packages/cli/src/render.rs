//! Plain-text rendering of trees, statistics and layouts.

use familytree_core::models::age;
use familytree_core::models::time::TimeProvider;
use familytree_core::{Person, Statistics, TreeLayout};
use std::fmt::Write;

/// One line per person: name, lifespan, age and id.
pub fn person_line(person: &Person, clock: &dyn TimeProvider) -> String {
    let mut line = if person.name.is_empty() {
        "(unnamed)".to_string()
    } else {
        person.name.clone()
    };

    if !person.birth.is_empty() || !person.death.is_empty() {
        let _ = write!(line, " ({}–{})", person.birth, person.death);
    }
    if let Some(years) = age::age_of(person, clock) {
        let _ = write!(line, ", {years}");
    }
    if !person.relationship.is_empty() {
        let _ = write!(line, " [{}]", person.relationship);
    }
    let _ = write!(line, "  {}", person.id);
    line
}

/// Indented outline of the forest in depth-first order.
pub fn outline(forest: &[Person], clock: &dyn TimeProvider) -> String {
    let mut out = String::new();
    for root in forest {
        let _ = writeln!(out, "{}", person_line(root, clock));
        write_children(&mut out, root, "", clock);
    }
    out
}

fn write_children(out: &mut String, person: &Person, prefix: &str, clock: &dyn TimeProvider) {
    let count = person.children.len();
    for (index, child) in person.children.iter().enumerate() {
        let last = index + 1 == count;
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let _ = writeln!(out, "{prefix}{branch}{}", person_line(child, clock));
        write_children(out, child, &format!("{prefix}{indent}"), clock);
    }
}

pub fn statistics(stats: &Statistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total people: {}", stats.total);
    let _ = writeln!(
        out,
        "Male:         {} ({:.1}%)",
        stats.males,
        stats.male_percentage()
    );
    let _ = writeln!(
        out,
        "Female/other: {} ({:.1}%)",
        stats.females,
        stats.female_percentage()
    );
    let _ = writeln!(out, "Living:       {}", stats.living);
    let _ = writeln!(out, "Deceased:     {}", stats.deceased);
    let _ = writeln!(out, "Generations:  {}", stats.generations);
    out
}

/// Generation labels followed by one row per card.
pub fn layout(forest: &[Person], layout: &TreeLayout) -> String {
    let mut out = String::new();
    for label in &layout.generation_labels {
        let _ = writeln!(out, "{:<8} top {:>8.1}", label.text, label.top);
    }

    let names = forest.iter().flat_map(Person::iter);
    for (node, person) in layout.nodes.iter().zip(names) {
        let _ = writeln!(
            out,
            "{:>8.1} {:>8.1}  w {:>7.1}  gen {}  {} {}  {}",
            node.x,
            node.y,
            node.subtree_width,
            node.level + 1,
            node.relationship_color(),
            person.initials(),
            person.name
        );
    }
    out
}
