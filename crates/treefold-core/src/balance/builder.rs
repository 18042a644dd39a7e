//! Bounded fan-out regrouping of sibling lists.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::tree::{synthetic_id, Node, NodeKind, NodeStyle};

/// Default per-level caps: at most 6 leaves per group, at most 3 groups above.
pub const DEFAULT_MAX_AT_LEVEL: [usize; 2] = [6, 3];

/// Default number of member labels joined into a group label.
pub const DEFAULT_TRUNCATE_AT: usize = 3;

/// Marker appended to truncated group labels.
pub const ELLIPSIS: &str = "…";

/// Per-category regrouping settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSettings {
    /// Whether lists of this category go through the builder at all.
    pub enabled: bool,
    /// Fan-out cap per level, index 0 just above the leaves. The last entry
    /// applies to every higher level. A cap of 0 means unlimited.
    pub max_at_level: Vec<usize>,
    /// Number of member labels joined into a group label.
    pub truncate_at: usize,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_at_level: DEFAULT_MAX_AT_LEVEL.to_vec(),
            truncate_at: DEFAULT_TRUNCATE_AT,
        }
    }
}

impl BalanceSettings {
    /// Settings that leave lists untouched.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Creates enabled settings with the given caps and label threshold.
    #[must_use]
    pub fn new(max_at_level: Vec<usize>, truncate_at: usize) -> Self {
        Self {
            enabled: true,
            max_at_level,
            truncate_at,
        }
    }

    /// Returns false when a cap of 0 or 1, or an empty cap list, stops
    /// grouping before the list fits.
    #[must_use]
    pub fn bounds_fan_out(&self) -> bool {
        !self.max_at_level.is_empty() && self.max_at_level.iter().all(|&cap| cap > 1)
    }
}

/// Regroups a sibling list so no node exceeds its level's fan-out cap.
///
/// # Example
///
/// ```rust
/// use treefold_core::balance::HierarchyBuilder;
/// use treefold_core::tree::{Node, NodeKind};
///
/// let items: Vec<Node> = (0..20)
///     .map(|i| Node::new(format!("n{i}"), NodeKind::Member).with_label(format!("n{i}")))
///     .collect();
///
/// let grouped = HierarchyBuilder::new(vec![6, 3], 3).build(items);
/// assert_eq!(grouped.len(), 2);
/// assert!(grouped.iter().all(|g| g.max_fan_out() <= 6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyBuilder {
    max_at_level: Vec<usize>,
    truncate_at: usize,
    group_style: NodeStyle,
}

impl HierarchyBuilder {
    /// Creates a builder with the given caps and label threshold.
    #[must_use]
    pub fn new(max_at_level: Vec<usize>, truncate_at: usize) -> Self {
        Self {
            max_at_level,
            truncate_at,
            group_style: NodeStyle::default(),
        }
    }

    /// Creates a builder from settings, ignoring the `enabled` flag.
    #[must_use]
    pub fn from_settings(settings: &BalanceSettings) -> Self {
        Self::new(settings.max_at_level.clone(), settings.truncate_at)
    }

    /// Sets the style applied to synthesized group nodes (builder pattern).
    #[must_use]
    pub fn with_group_style(mut self, style: NodeStyle) -> Self {
        self.group_style = style;
        self
    }

    /// Returns the cap for a grouping level; the last entry repeats upward.
    /// Returns 0 (unlimited) for an empty cap list.
    #[must_use]
    pub fn cap_at(&self, level: usize) -> usize {
        self.max_at_level
            .get(level)
            .or_else(|| self.max_at_level.last())
            .copied()
            .unwrap_or(0)
    }

    /// Regroups `items`, returning a list within the cap of the level it
    /// ends at. Order is preserved and no item is dropped or duplicated.
    #[must_use]
    pub fn build(&self, items: Vec<Node>) -> Vec<Node> {
        self.build_counted(items).0
    }

    /// Same as [`HierarchyBuilder::build`], also returning the number of
    /// group nodes synthesized.
    #[must_use]
    pub fn build_counted(&self, items: Vec<Node>) -> (Vec<Node>, usize) {
        let mut current = items;
        let mut groups = 0;
        let mut level = 0;

        loop {
            let cap = self.cap_at(level);
            if cap == 0 || current.len() <= cap {
                return (current, groups);
            }
            if cap == 1 {
                // A cap of one can never shrink the list.
                trace!(level, "Degenerate fan-out cap, grouping stops");
                return (current, groups);
            }

            let group_count = current.len().div_ceil(cap);
            let chunk_size = current.len().div_ceil(group_count);
            trace!(level, items = current.len(), cap, group_count, "Grouping level");

            let mut next = Vec::with_capacity(group_count);
            let mut rest = current.into_iter().peekable();
            while rest.peek().is_some() {
                let chunk: Vec<Node> = rest.by_ref().take(chunk_size).collect();
                next.push(self.make_group(chunk));
            }
            groups += next.len();
            current = next;
            level += 1;
        }
    }

    /// Joins the first `truncate_at` member labels, adding an ellipsis when
    /// members were left out. Unlabeled members contribute their id.
    #[must_use]
    pub fn group_label(&self, members: &[Node]) -> Option<String> {
        if self.truncate_at == 0 {
            return None;
        }
        let mut label = members
            .iter()
            .take(self.truncate_at)
            .map(|n| n.label().unwrap_or_else(|| n.id()))
            .collect::<Vec<_>>()
            .join(", ");
        if members.len() > self.truncate_at {
            label.push_str(ELLIPSIS);
        }
        Some(label)
    }

    fn make_group(&self, chunk: Vec<Node>) -> Node {
        let id = synthetic_id("group", chunk.iter().map(Node::id));
        let mut group = Node::new(id, NodeKind::Group).styled(&self.group_style);
        if let Some(label) = self.group_label(&chunk) {
            group = group.with_label(label);
        }
        group.with_children(chunk)
    }
}

/// Regroups `items` with the given caps; see [`HierarchyBuilder::build`].
#[must_use]
pub fn build_hierarchy(
    items: Vec<Node>,
    max_at_level: &[usize],
    truncate_at: usize,
    group_style: &NodeStyle,
) -> Vec<Node> {
    HierarchyBuilder::new(max_at_level.to_vec(), truncate_at)
        .with_group_style(group_style.clone())
        .build(items)
}

/// Sorts nodes by label, case-insensitively, keeping equal labels in order.
pub fn sort_by_label(nodes: &mut [Node]) {
    nodes.sort_by_cached_key(|n| n.label().unwrap_or_else(|| n.id()).to_lowercase());
}
