//! Layout Engine
//!
//! Assigns every person a 2D position from the shape of the tree and the
//! active spacing profile. The engine is a pure function of its inputs and
//! keeps no cache: callers recompute after every mutation.
//!
//! # Algorithm
//!
//! 1. **Measure (bottom-up):** a leaf reserves one horizontal slot `H`; an
//!    inner node reserves the sum of its children's widths, never less than `H`.
//! 2. **Place (top-down):** roots sit at the anchor. The children of a node at
//!    `parent_x` are tiled left-to-right starting at `parent_x - total / 2`,
//!    each centered in its own reserved width, so the sibling group is centered
//!    under the parent. A node at depth `level` gets `y = level * V + offset`.
//!
//! Derived outputs (generation labels, connector polylines, label palette
//! indices) are produced in the same pass.
//!
//! # Examples
//!
//! ```rust
//! use familytree_core::models::Person;
//! use familytree_core::services::layout::{LayoutEngine, SpacingProfile};
//!
//! let mut root = Person::new("Root");
//! root.children.push(Person::new("A"));
//! root.children.push(Person::new("B"));
//!
//! let layout = LayoutEngine::new(SpacingProfile::Normal).layout(&[root.clone()]);
//! let a = layout.position(&root.children[0].id).unwrap();
//! let b = layout.position(&root.children[1].id).unwrap();
//! assert_eq!((a.x, b.x), (375.0, 625.0));
//! assert_eq!(a.y, 350.0);
//! ```

use crate::models::{Person, ValidationError};
use crate::services::statistics::max_level;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Colours cycled through for relationship labels
pub const RELATIONSHIP_PALETTE: [&str; 6] = [
    "#667eea", "#48bb78", "#f56565", "#ed8936", "#9f7aea", "#38b2ac",
];

/// Horizontal and vertical gap units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

/// Named spacing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingProfile {
    Compact,
    #[default]
    Normal,
    Wide,
    ExtraWide,
    Vertical,
}

impl SpacingProfile {
    pub const ALL: [SpacingProfile; 5] = [
        SpacingProfile::Compact,
        SpacingProfile::Normal,
        SpacingProfile::Wide,
        SpacingProfile::ExtraWide,
        SpacingProfile::Vertical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpacingProfile::Compact => "compact",
            SpacingProfile::Normal => "normal",
            SpacingProfile::Wide => "wide",
            SpacingProfile::ExtraWide => "extrawide",
            SpacingProfile::Vertical => "vertical",
        }
    }

    pub fn spacing(&self) -> Spacing {
        let (horizontal, vertical) = match self {
            SpacingProfile::Compact => (180.0, 200.0),
            SpacingProfile::Normal => (250.0, 250.0),
            SpacingProfile::Wide => (350.0, 250.0),
            SpacingProfile::ExtraWide => (500.0, 250.0),
            SpacingProfile::Vertical => (200.0, 350.0),
        };
        Spacing {
            horizontal,
            vertical,
        }
    }

    /// Resolve a stored name, falling back to `Normal` for unknown values.
    pub fn from_name_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown spacing profile {:?}, using normal", name);
            SpacingProfile::Normal
        })
    }
}

impl FromStr for SpacingProfile {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        SpacingProfile::ALL
            .into_iter()
            .find(|profile| profile.as_str() == name)
            .ok_or_else(|| ValidationError::InvalidSpacingProfile(s.to_string()))
    }
}

impl fmt::Display for SpacingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed geometry of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Root x coordinate
    pub anchor_x: f64,
    /// Root y coordinate
    pub anchor_y: f64,
    /// Added to `level * V` for every non-root node
    pub vertical_offset: f64,
    /// Card height used to space generation labels
    pub card_height: f64,
    /// Top offset of the first generation label
    pub label_offset: f64,
    /// Distance from a node's x to the center of its card
    pub connector_x_offset: f64,
    /// Distance from a parent's y to the bottom of its card
    pub parent_bottom_offset: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            anchor_x: 500.0,
            anchor_y: 100.0,
            vertical_offset: 100.0,
            card_height: 280.0,
            label_offset: 50.0,
            connector_x_offset: 75.0,
            parent_bottom_offset: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Computed placement of one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub subtree_width: f64,
    /// Generation, 0 at the root
    pub level: usize,
    /// Index into [`RELATIONSHIP_PALETTE`]
    pub palette_index: usize,
}

impl NodePosition {
    pub fn relationship_color(&self) -> &'static str {
        RELATIONSHIP_PALETTE[self.palette_index % RELATIONSHIP_PALETTE.len()]
    }
}

/// "Gen N" marker on the left edge of the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationLabel {
    pub generation: usize,
    pub text: String,
    pub top: f64,
}

/// Orthogonal polyline from the bottom of a parent card to the top of a child card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub parent_id: String,
    pub child_id: String,
    pub points: [Point; 4],
}

/// Result of one layout pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    /// Positions in depth-first pre-order
    pub nodes: Vec<NodePosition>,
    pub generation_labels: Vec<GenerationLabel>,
    pub connectors: Vec<Connector>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TreeLayout {
    pub fn position(&self, id: &str) -> Option<&NodePosition> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Bounding box of all node anchors as (min, max), `None` when empty.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.nodes.first()?;
        let init = (
            Point {
                x: first.x,
                y: first.y,
            },
            Point {
                x: first.x,
                y: first.y,
            },
        );

        Some(self.nodes.iter().fold(init, |(min, max), node| {
            (
                Point {
                    x: min.x.min(node.x),
                    y: min.y.min(node.y),
                },
                Point {
                    x: max.x.max(node.x),
                    y: max.y.max(node.y),
                },
            )
        }))
    }

    fn push(&mut self, node: NodePosition) {
        // Malformed imports may repeat ids; lookups resolve to the first one.
        self.index.entry(node.id.clone()).or_insert(self.nodes.len());
        self.nodes.push(node);
    }
}

/// Width reserved by a subtree, mirrored onto the person tree
struct Measured {
    width: f64,
    children: Vec<Measured>,
}

/// Where a node goes and what it passes down to its children
#[derive(Debug, Clone, Copy)]
struct Slot {
    at: Point,
    level: usize,
    /// Position among the node's own siblings
    sibling_index: usize,
    palette_index: usize,
}

/// Pure tree layout for one spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    spacing: Spacing,
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(profile: SpacingProfile) -> Self {
        Self::with_config(profile.spacing(), LayoutConfig::default())
    }

    pub fn with_config(spacing: Spacing, config: LayoutConfig) -> Self {
        Self { spacing, config }
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Minimum horizontal footprint of `person` and all descendants.
    pub fn subtree_width(&self, person: &Person) -> f64 {
        self.measure(person).width
    }

    /// Lay out a whole forest.
    ///
    /// Every root is placed at the anchor; a forest is expected to hold a
    /// single root, so additional roots overlap the first.
    pub fn layout(&self, forest: &[Person]) -> TreeLayout {
        let mut layout = TreeLayout::default();

        for (index, root) in forest.iter().enumerate() {
            let measured = self.measure(root);
            let origin = Point {
                x: self.config.anchor_x,
                y: self.config.anchor_y,
            };
            let slot = Slot {
                at: origin,
                level: 0,
                sibling_index: index,
                palette_index: 0,
            };
            self.place(root, &measured, slot, &mut layout);
        }

        layout.generation_labels = self.generation_labels(max_level(forest));

        tracing::debug!(
            "Laid out {} people across {} generations",
            layout.nodes.len(),
            layout.generation_labels.len()
        );
        layout
    }

    /// One label per generation `0..=max_level`.
    pub fn generation_labels(&self, max_level: usize) -> Vec<GenerationLabel> {
        (0..=max_level)
            .map(|generation| GenerationLabel {
                generation,
                text: format!("Gen {}", generation + 1),
                top: generation as f64 * (self.config.card_height + self.spacing.vertical)
                    + self.config.label_offset,
            })
            .collect()
    }

    fn measure(&self, person: &Person) -> Measured {
        let children: Vec<Measured> = person.children.iter().map(|c| self.measure(c)).collect();
        let width = if children.is_empty() {
            self.spacing.horizontal
        } else {
            children
                .iter()
                .map(|c| c.width)
                .sum::<f64>()
                .max(self.spacing.horizontal)
        };

        Measured { width, children }
    }

    fn place(&self, person: &Person, measured: &Measured, slot: Slot, layout: &mut TreeLayout) {
        layout.push(NodePosition {
            id: person.id.clone(),
            x: slot.at.x,
            y: slot.at.y,
            subtree_width: measured.width,
            level: slot.level,
            palette_index: slot.palette_index,
        });

        let child_level = slot.level + 1;
        let child_y = child_level as f64 * self.spacing.vertical + self.config.vertical_offset;
        // A child's label colour depends on where its parent sits among the
        // parent's own siblings.
        let child_palette_index = (child_level + slot.sibling_index) % RELATIONSHIP_PALETTE.len();
        let total_width: f64 = measured.children.iter().map(|c| c.width).sum();
        let mut offset = slot.at.x - total_width / 2.0;

        for (index, (child, child_measured)) in
            person.children.iter().zip(&measured.children).enumerate()
        {
            let child_at = Point {
                x: offset + child_measured.width / 2.0,
                y: child_y,
            };
            offset += child_measured.width;

            layout
                .connectors
                .push(self.connector(person, slot.at, child, child_at));

            let child_slot = Slot {
                at: child_at,
                level: child_level,
                sibling_index: index,
                palette_index: child_palette_index,
            };
            self.place(child, child_measured, child_slot, layout);
        }
    }

    fn connector(
        &self,
        parent: &Person,
        parent_at: Point,
        child: &Person,
        child_at: Point,
    ) -> Connector {
        let px = parent_at.x + self.config.connector_x_offset;
        let py = parent_at.y + self.config.parent_bottom_offset;
        let cx = child_at.x + self.config.connector_x_offset;
        let cy = child_at.y;
        let mid = (py + cy) / 2.0;

        Connector {
            parent_id: parent.id.clone(),
            child_id: child.id.clone(),
            points: [
                Point { x: px, y: py },
                Point { x: px, y: mid },
                Point { x: cx, y: mid },
                Point { x: cx, y: cy },
            ],
        }
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
