//! Produced tree types: nodes, their kinds, and cross-tree edges.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use super::style::{Color, EdgeDecor, NodeStyle};
use crate::lexicon::RelationKind;

/// What a produced node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Synthetic root listing every sense of a queried word.
    Word,
    /// A concept (synset).
    Concept,
    /// Wrapper holding a concept's members.
    Members,
    /// A member (word sense) of a concept.
    Member,
    /// Wrapper holding a concept's relation nodes.
    Relations,
    /// All targets of one relation kind.
    Relation {
        /// Relation kind of the section.
        relation: RelationKind,
    },
    /// Synthetic container inserted to bound fan-out.
    Group,
    /// Summary of relation targets cut by the breadth cap.
    Etc {
        /// Number of targets not expanded.
        remaining: usize,
    },
    /// A directory in the filesystem variant.
    Directory,
    /// A file in the filesystem variant.
    File,
}

impl NodeKind {
    /// Returns true for nodes the walker never expands (groups and etc nodes).
    #[must_use]
    pub fn is_synthetic(self) -> bool {
        matches!(self, NodeKind::Group | NodeKind::Etc { .. })
    }
}

/// A node of the produced tree.
///
/// # Example
///
/// ```rust
/// use treefold_core::tree::{Node, NodeKind};
///
/// let node = Node::new("dog.n.01", NodeKind::Concept)
///     .with_label("dog")
///     .with_content("a member of the genus Canis")
///     .with_children(vec![Node::new("m1", NodeKind::Member).with_label("dog")]);
///
/// assert_eq!(node.id(), "dog.n.01");
/// assert_eq!(node.children().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fore_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    back_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edge: Option<EdgeDecor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    /// Creates a childless node with the given id and kind.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            content: None,
            link: None,
            fore_color: None,
            back_color: None,
            icon: None,
            edge: None,
            children: Vec::new(),
        }
    }

    /// Sets the label (builder pattern).
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the opaque content (builder pattern).
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the outgoing link reference (builder pattern).
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Sets the incoming edge decoration (builder pattern).
    #[must_use]
    pub fn with_edge(mut self, edge: EdgeDecor) -> Self {
        self.edge = Some(edge);
        self
    }

    /// Sets the icon reference (builder pattern).
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Replaces the children (builder pattern).
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Applies colors, icon and incoming edge from a style (builder pattern).
    ///
    /// Only fields set on the style overwrite the node's own.
    #[must_use]
    pub fn styled(mut self, style: &NodeStyle) -> Self {
        if style.fore_color.is_some() {
            self.fore_color = style.fore_color;
        }
        if style.back_color.is_some() {
            self.back_color = style.back_color;
        }
        if let Some(icon) = &style.icon {
            self.icon = Some(icon.clone());
        }
        if let Some(edge) = &style.edge {
            self.edge = Some(edge.clone());
        }
        self
    }

    /// Returns the node id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the label, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the content, if any.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the outgoing link reference, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns the text color, if any.
    #[must_use]
    pub fn fore_color(&self) -> Option<Color> {
        self.fore_color
    }

    /// Returns the background color, if any.
    #[must_use]
    pub fn back_color(&self) -> Option<Color> {
        self.back_color
    }

    /// Returns the icon reference, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the incoming edge decoration, if any.
    #[must_use]
    pub fn edge(&self) -> Option<&EdgeDecor> {
        self.edge.as_ref()
    }

    /// Returns the children in order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Consumes the node, returning its children.
    #[must_use]
    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub(crate) fn set_content(&mut self, content: Option<String>) {
        self.content = content;
    }

    pub(crate) fn set_link(&mut self, link: Option<String>) {
        self.link = link;
    }

    pub(crate) fn set_edge(&mut self, edge: Option<EdgeDecor>) {
        self.edge = edge;
    }

    /// Returns true if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the leaves under this node in depth-first order.
    ///
    /// A childless node is its own single leaf.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.children.is_empty() {
                out.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Returns the largest direct child count anywhere in the subtree.
    #[must_use]
    pub fn max_fan_out(&self) -> usize {
        self.children
            .iter()
            .map(Node::max_fan_out)
            .fold(self.children.len(), usize::max)
    }

    /// Returns the number of levels in the subtree (1 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Returns the number of nodes in the subtree, this one included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Finds a node by id in the subtree.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// A non-tree connection between two produced nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Label, style, color and icon.
    pub decor: EdgeDecor,
}

impl Edge {
    /// Creates a cross edge between two node ids.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, decor: EdgeDecor) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            decor,
        }
    }
}

/// Derives a stable id for a synthetic node from the ids of its members.
///
/// Member ids are sorted first so the id depends on the member set only.
#[must_use]
pub fn synthetic_id<'a>(prefix: &str, member_ids: impl IntoIterator<Item = &'a str>) -> String {
    let mut ids: Vec<&str> = member_ids.into_iter().collect();
    ids.sort_unstable();
    let mut hasher = FxHasher::default();
    for id in ids {
        hasher.write(id.as_bytes());
        hasher.write_u8(0xff);
    }
    format!("{prefix}-{:016x}", hasher.finish())
}
