//! Immutable per-walk configuration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::balance::BalanceSettings;
use crate::error::{Error, Result};
use crate::lexicon::RelationSet;
use crate::tree::{Color, NodeStyle};

/// Default number of targets expanded per relation kind.
pub const DEFAULT_MAX_LINKS: usize = 32;
/// Default recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 4;
/// Largest accepted recursion depth.
pub const MAX_DEPTH_LIMIT: usize = 16;
/// Largest accepted per-relation breadth.
pub const MAX_LINKS_LIMIT: usize = 1024;
/// Largest accepted `max_links ^ max_depth`.
pub const MAX_ESTIMATED_NODES: usize = 1 << 24;

bitflags! {
    /// Structural reshaping policies, combined with `|`.
    ///
    /// When several apply to the same relation section, `RAISE_RECURSION`
    /// wins over `FORGET_RELATION_ON_RECURSION`, which wins over
    /// `MERGE_SINGLE_LINK`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ShapeFlags: u32 {
        /// A concept with one member takes that member's label and content.
        const COLLAPSE_SINGLE_MEMBER = 1 << 0;
        /// Members hang directly under the concept, without a wrapper.
        const FORGET_MEMBERS = 1 << 1;
        /// Relation nodes hang directly under the concept, without a wrapper.
        const FORGET_RELATIONS = 1 << 2;
        /// A relation with one target takes over that target's content.
        const MERGE_SINGLE_LINK = 1 << 3;
        /// Along a chain of one kind, the repeated relation node is omitted.
        const FORGET_RELATION_ON_RECURSION = 1 << 4;
        /// Along a chain of one kind, the next level becomes a sibling linked
        /// by a cross edge.
        const RAISE_RECURSION = 1 << 5;
        /// Edges into linked concepts carry the relation label.
        const EDGE_LABELS = 1 << 6;
        /// Concepts left unexpanded carry a `concept:<id>` link.
        const LINK_LEAVES = 1 << 7;
    }
}

impl ShapeFlags {
    /// Parses the textual form, e.g. `"FORGET_MEMBERS | EDGE_LABELS"`.
    pub fn parse(text: &str) -> Result<Self> {
        bitflags::parser::from_str(text)
            .map_err(|e| Error::InvalidConfig(format!("shape flags '{text}': {e}")))
    }
}

/// Shared cancellation flag, checked before each concept expansion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an untripped token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every walk holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Styles for each produced node category.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Word root listing several senses.
    pub word: NodeStyle,
    /// Concept nodes.
    pub concept: NodeStyle,
    /// Members wrapper.
    pub members: NodeStyle,
    /// Member nodes.
    pub member: NodeStyle,
    /// Relations wrapper.
    pub relations: NodeStyle,
    /// Group nodes from the hierarchy builder.
    pub group: NodeStyle,
    /// Etc nodes.
    pub etc: NodeStyle,
}

impl Default for Palette {
    fn default() -> Self {
        let ink = Color::rgb(0x20, 0x20, 0x20);
        Self {
            word: NodeStyle::colored(ink, Color::rgb(0xff, 0xd7, 0x00)).with_icon("word.png"),
            concept: NodeStyle::colored(ink, Color::rgb(0xff, 0xf5, 0xd0)).with_icon("concept.png"),
            members: NodeStyle::colored(ink, Color::rgb(0xe0, 0xec, 0xf8)).with_icon("members.png"),
            member: NodeStyle::colored(ink, Color::rgb(0xf0, 0xf6, 0xfc)).with_icon("member.png"),
            relations: NodeStyle::colored(ink, Color::rgb(0xe8, 0xe8, 0xe8)).with_icon("relations.png"),
            group: NodeStyle::colored(ink, Color::rgb(0xf4, 0xf4, 0xf4)).with_icon("group.png"),
            etc: NodeStyle::colored(Color::rgb(0x70, 0x70, 0x70), Color::rgb(0xff, 0xff, 0xff))
                .with_icon("etc.png"),
        }
    }
}

/// Configuration threaded, unchanged, through every recursive call.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Relation kinds to follow.
    pub relations: RelationSet,
    /// Targets expanded per relation kind before an etc node.
    pub max_links: usize,
    /// Recursion depth.
    pub max_depth: usize,
    /// Regrouping of member lists.
    pub members_balance: BalanceSettings,
    /// Regrouping of relation target lists.
    pub relations_balance: BalanceSettings,
    /// Structural reshaping policies.
    pub shape: ShapeFlags,
    /// Emit already-expanded concepts as leaves instead of re-expanding.
    pub dedup_visited: bool,
    /// Wall-clock budget for one walk.
    pub deadline: Option<Duration>,
    /// External cancellation.
    pub cancel: Option<CancelToken>,
    /// Node styles.
    pub palette: Palette,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            relations: RelationSet::all(),
            max_links: DEFAULT_MAX_LINKS,
            max_depth: DEFAULT_MAX_DEPTH,
            members_balance: BalanceSettings::default(),
            relations_balance: BalanceSettings::default(),
            shape: ShapeFlags::empty(),
            dedup_visited: false,
            deadline: None,
            cancel: None,
            palette: Palette::default(),
        }
    }
}

impl TraversalConfig {
    /// Creates a config with the given depth and breadth limits.
    #[must_use]
    pub fn new(max_depth: usize, max_links: usize) -> Self {
        Self {
            max_depth,
            max_links,
            ..Self::default()
        }
    }

    /// Sets the relation filter (builder pattern).
    #[must_use]
    pub fn with_relations(mut self, relations: RelationSet) -> Self {
        self.relations = relations;
        self
    }

    /// Sets the shaping flags (builder pattern).
    #[must_use]
    pub fn with_shape(mut self, shape: ShapeFlags) -> Self {
        self.shape = shape;
        self
    }

    /// Sets member regrouping (builder pattern).
    #[must_use]
    pub fn with_members_balance(mut self, settings: BalanceSettings) -> Self {
        self.members_balance = settings;
        self
    }

    /// Sets relation regrouping (builder pattern).
    #[must_use]
    pub fn with_relations_balance(mut self, settings: BalanceSettings) -> Self {
        self.relations_balance = settings;
        self
    }

    /// Enables visited-set deduplication (builder pattern).
    #[must_use]
    pub fn with_dedup_visited(mut self, dedup: bool) -> Self {
        self.dedup_visited = dedup;
        self
    }

    /// Sets a wall-clock budget (builder pattern).
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attaches a cancellation token (builder pattern).
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Sets node styles (builder pattern).
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Returns `max_links ^ max_depth`, saturating.
    #[must_use]
    pub fn estimated_nodes(&self) -> usize {
        let exponent = u32::try_from(self.max_depth).unwrap_or(u32::MAX);
        self.max_links.saturating_pow(exponent)
    }

    /// Checks depth and breadth against the accepted bounds.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` naming the first violated bound.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "max_depth {} exceeds {MAX_DEPTH_LIMIT}",
                self.max_depth
            )));
        }
        if self.max_links == 0 || self.max_links > MAX_LINKS_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "max_links {} outside 1..={MAX_LINKS_LIMIT}",
                self.max_links
            )));
        }
        if self.estimated_nodes() > MAX_ESTIMATED_NODES {
            return Err(Error::InvalidConfig(format!(
                "max_links {} ^ max_depth {} exceeds {MAX_ESTIMATED_NODES} nodes",
                self.max_links, self.max_depth
            )));
        }
        Ok(())
    }
}
