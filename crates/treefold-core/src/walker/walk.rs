//! Depth- and breadth-limited materialization of a concept graph as a tree.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, debug_span, trace, warn};

use super::config::{CancelToken, ShapeFlags, TraversalConfig};
use crate::balance::{sort_by_label, BalanceSettings, HierarchyBuilder, ELLIPSIS};
use crate::error::{Error, Result};
use crate::lexicon::{Concept, Lexicon, Member, PartOfSpeech, RelationKind};
use crate::tree::{synthetic_id, Edge, EdgeDecor, Node, NodeKind};

/// Labels previewed in an etc node's content.
const ETC_PREVIEW: usize = 8;

/// Root of a walk: a concept id, or a word with an optional part of speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Concept id or written form.
    pub text: String,
    /// Restricts word senses to one part of speech.
    pub pos: Option<PartOfSpeech>,
}

impl Query {
    /// Creates a query without part-of-speech restriction.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: None,
        }
    }

    /// Restricts the query to one part of speech (builder pattern).
    #[must_use]
    pub fn with_pos(mut self, pos: PartOfSpeech) -> Self {
        self.pos = Some(pos);
        self
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Counters collected during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// Nodes in the produced tree.
    pub nodes_created: usize,
    /// Concepts expanded (members and relations built).
    pub concepts_expanded: usize,
    /// Concept and member lookups that missed.
    pub lookup_misses: usize,
    /// Etc nodes produced by the breadth cap.
    pub etc_nodes: usize,
    /// Group nodes produced by the hierarchy builder.
    pub groups_created: usize,
    /// Whether cancellation or the deadline cut the walk short.
    pub interrupted: bool,
}

/// Result of a walk, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkOutput {
    /// Root of the produced tree.
    pub root: Node,
    /// Non-tree connections produced by raised recursion.
    pub cross_edges: Vec<Edge>,
    /// Counters.
    pub stats: WalkStats,
}

/// A built concept plus the same-kind expansions it hands up to its parent.
struct Expansion {
    node: Node,
    raised: Vec<Node>,
}

/// Children of one relation kind, before balancing.
#[derive(Default)]
struct Section {
    items: Vec<Node>,
    /// Node ids of concepts built directly from targets.
    linked: Vec<String>,
}

/// Mutable state owned by one walk.
struct WalkState {
    occurrences: HashMap<String, usize>,
    expanded: HashSet<String>,
    cross_edges: Vec<Edge>,
    stats: WalkStats,
    deadline: Option<Instant>,
}

impl WalkState {
    fn new(config: &TraversalConfig) -> Self {
        Self {
            occurrences: HashMap::new(),
            expanded: HashSet::new(),
            cross_edges: Vec::new(),
            stats: WalkStats::default(),
            deadline: config.deadline.and_then(|d| Instant::now().checked_add(d)),
        }
    }

    /// Returns `base` on first use, then `base~2`, `base~3`, ...
    fn node_id(&mut self, base: &str) -> String {
        let seen = self.occurrences.entry(base.to_string()).or_insert(0);
        *seen += 1;
        if *seen == 1 {
            base.to_string()
        } else {
            format!("{base}~{seen}")
        }
    }

    fn interrupted(&mut self, config: &TraversalConfig) -> bool {
        if self.stats.interrupted {
            return true;
        }
        let cancelled = config.cancel.as_ref().is_some_and(CancelToken::is_cancelled);
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        if cancelled || expired {
            self.stats.interrupted = true;
            warn!(
                cancelled,
                expired,
                expanded = self.stats.concepts_expanded,
                "Walk interrupted, remaining concepts left unexpanded"
            );
        }
        self.stats.interrupted
    }
}

/// Walks a [`Lexicon`] from a query, producing a bounded tree.
///
/// The walker holds no state between walks; each call to
/// [`GraphWalker::walk`] owns its allocations until it returns.
///
/// # Example
///
/// ```rust
/// use treefold_core::lexicon::{Concept, InMemoryLexicon, Member, RelationKind};
/// use treefold_core::walker::{GraphWalker, Query, TraversalConfig};
///
/// let mut lexicon = InMemoryLexicon::new();
/// lexicon.add_concept(Concept::new("dog.n.01", "a domesticated canine")).unwrap();
/// lexicon.add_concept(Concept::new("canine.n.02", "a carnivore")).unwrap();
/// lexicon.add_member("dog.n.01", Member::new("dog%1", "dog")).unwrap();
/// lexicon.add_relation("dog.n.01", RelationKind::Hypernym, "canine.n.02").unwrap();
///
/// let config = TraversalConfig::default();
/// let output = GraphWalker::new(&lexicon, &config).walk(&Query::new("dog")).unwrap();
/// assert_eq!(output.root.id(), "dog.n.01");
/// assert!(output.root.find("canine.n.02").is_some());
/// ```
pub struct GraphWalker<'a, L: Lexicon + ?Sized> {
    lexicon: &'a L,
    config: &'a TraversalConfig,
    members: Option<HierarchyBuilder>,
    relations: Option<HierarchyBuilder>,
}

impl<'a, L: Lexicon + ?Sized> GraphWalker<'a, L> {
    /// Creates a walker over `lexicon` with the given configuration.
    #[must_use]
    pub fn new(lexicon: &'a L, config: &'a TraversalConfig) -> Self {
        let builder = |settings: &BalanceSettings| {
            settings.enabled.then(|| {
                HierarchyBuilder::from_settings(settings)
                    .with_group_style(config.palette.group.clone())
            })
        };
        Self {
            lexicon,
            config,
            members: builder(&config.members_balance),
            relations: builder(&config.relations_balance),
        }
    }

    /// Resolves the query and materializes the tree below it.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration is out of bounds
    /// and `Error::UnresolvedQuery` if no concept matches the query. Lookup
    /// misses below the root only prune their branch.
    pub fn walk(&self, query: &Query) -> Result<WalkOutput> {
        self.config.validate()?;

        let span = debug_span!(
            "walk",
            query = %query.text,
            max_depth = self.config.max_depth,
            max_links = self.config.max_links
        );
        let _guard = span.enter();

        let concepts = self.resolve(query)?;
        let mut state = WalkState::new(self.config);

        let root = if let [concept] = concepts.as_slice() {
            self.expand(concept, 0, None, &mut state).node
        } else {
            let senses: Vec<Node> = concepts
                .iter()
                .map(|concept| self.expand(concept, 0, None, &mut state).node)
                .collect();
            let senses = self.balance(self.relations.as_ref(), senses, &mut state);
            let id = state.node_id(&format!("word:{}", query.text.trim()));
            Node::new(id, NodeKind::Word)
                .with_label(query.text.trim())
                .styled(&self.config.palette.word)
                .with_children(senses)
        };

        state.stats.nodes_created = root.count();
        debug!(
            nodes = state.stats.nodes_created,
            concepts = state.stats.concepts_expanded,
            misses = state.stats.lookup_misses,
            etc = state.stats.etc_nodes,
            groups = state.stats.groups_created,
            cross_edges = state.cross_edges.len(),
            "Walk complete"
        );

        Ok(WalkOutput {
            root,
            cross_edges: state.cross_edges,
            stats: state.stats,
        })
    }

    /// Concept id first, then senses of the text, then senses of its stems.
    fn resolve(&self, query: &Query) -> Result<Vec<Concept>> {
        let text = query.text.trim();
        if let Some(concept) = self.lexicon.lookup_concept(text) {
            return Ok(vec![concept]);
        }

        let mut ids = self.lexicon.lookup_senses(text, query.pos);
        if ids.is_empty() {
            ids = self
                .lexicon
                .find_stems(text, query.pos)
                .iter()
                .map(|stem| self.lexicon.lookup_senses(stem, query.pos))
                .find(|senses| !senses.is_empty())
                .unwrap_or_default();
        }

        let concepts: Vec<Concept> = ids
            .iter()
            .filter_map(|id| self.lexicon.lookup_concept(id))
            .collect();
        if concepts.is_empty() {
            return Err(Error::UnresolvedQuery(query.text.clone()));
        }
        debug!(senses = concepts.len(), "Query resolved");
        Ok(concepts)
    }

    fn expand(
        &self,
        concept: &Concept,
        level: usize,
        via: Option<RelationKind>,
        state: &mut WalkState,
    ) -> Expansion {
        state.stats.concepts_expanded += 1;
        state.expanded.insert(concept.id.clone());
        trace!(concept = %concept.id, level, "Expanding concept");

        let shape = self.config.shape;
        let palette = &self.config.palette;
        let id = state.node_id(&concept.id);
        let members = self.lexicon.lookup_members(concept);
        let missing = concept.members.len().saturating_sub(members.len());
        if missing > 0 {
            state.stats.lookup_misses += missing;
            debug!(concept = %concept.id, missing, "Members not found, skipped");
        }

        let mut node = self.concept_node(id.clone(), concept, &members);
        let mut children = Vec::new();

        match members.as_slice() {
            [] => {}
            [member] if shape.contains(ShapeFlags::COLLAPSE_SINGLE_MEMBER) => {
                node.set_label(Some(display_lemma(&member.lemma)));
                if let Some(extra) = &member.content {
                    let merged = merge_content(node.content(), extra);
                    node.set_content(Some(merged));
                }
            }
            _ => {
                let nodes = self.member_list(&members, state);
                if shape.contains(ShapeFlags::FORGET_MEMBERS) {
                    children.extend(nodes);
                } else {
                    children.push(
                        Node::new(format!("{id}:members"), NodeKind::Members)
                            .with_label("members")
                            .styled(&palette.members)
                            .with_children(nodes),
                    );
                }
            }
        }

        let mut relation_nodes = Vec::new();
        let mut chained = Vec::new();
        let mut raised = Vec::new();
        for kind in self.config.relations.kinds() {
            let targets = self.lexicon.lookup_relations(concept, kind);
            if targets.is_empty() {
                continue;
            }
            let section = self.section(kind, &targets, level, state);
            let on_chain = via == Some(kind);

            if on_chain && shape.contains(ShapeFlags::RAISE_RECURSION) {
                let decor = self.link_decor(kind);
                state.cross_edges.extend(
                    section
                        .linked
                        .iter()
                        .map(|to| Edge::new(id.clone(), to.clone(), decor.clone())),
                );
                raised.extend(section.items);
                continue;
            }

            let linked = section.linked.len();
            let items = self.balance(self.relations.as_ref(), section.items, state);
            if on_chain && shape.contains(ShapeFlags::FORGET_RELATION_ON_RECURSION) {
                chained.extend(items);
                continue;
            }
            relation_nodes.push(self.relation_node(&id, kind, items, linked));
        }

        let relation_nodes = self.balance(self.relations.as_ref(), relation_nodes, state);
        if !relation_nodes.is_empty() {
            if shape.contains(ShapeFlags::FORGET_RELATIONS) {
                children.extend(relation_nodes);
            } else {
                children.push(
                    Node::new(format!("{id}:relations"), NodeKind::Relations)
                        .with_label("relations")
                        .styled(&palette.relations)
                        .with_children(relation_nodes),
                );
            }
        }
        children.extend(chained);

        // Forgotten containers and chained targets splice several lists together.
        let builder = self.relations.as_ref().or(self.members.as_ref());
        let children = self.balance(builder, children, state);

        Expansion {
            node: node.with_children(children),
            raised,
        }
    }

    /// Member nodes, sorted and regrouped when member balancing is on.
    fn member_list(&self, members: &[Member], state: &mut WalkState) -> Vec<Node> {
        let mut nodes: Vec<Node> = members
            .iter()
            .map(|member| self.member_node(member, state))
            .collect();
        if self.members.is_some() {
            sort_by_label(&mut nodes);
        }
        self.balance(self.members.as_ref(), nodes, state)
    }

    /// Builds up to `max_links` linked concepts, then one etc node for the rest.
    fn section(
        &self,
        kind: RelationKind,
        targets: &[String],
        level: usize,
        state: &mut WalkState,
    ) -> Section {
        let limit = self.config.max_links;
        let mut section = Section::default();
        for target in targets.iter().take(limit) {
            let Some(linked) = self.linked(target, kind, level, state) else {
                continue;
            };
            section.linked.push(linked.node.id().to_string());
            section.items.push(linked.node);
            section.items.extend(linked.raised);
        }
        if let Some(rest) = targets.get(limit..).filter(|rest| !rest.is_empty()) {
            section.items.push(self.etc_node(kind, rest, state));
        }
        section
    }

    fn linked(
        &self,
        target: &str,
        kind: RelationKind,
        level: usize,
        state: &mut WalkState,
    ) -> Option<Expansion> {
        let Some(concept) = self.lexicon.lookup_concept(target) else {
            state.stats.lookup_misses += 1;
            debug!(
                concept = target,
                relation = kind.symbol(),
                "Relation target not found, branch pruned"
            );
            return None;
        };

        let seen = self.config.dedup_visited && state.expanded.contains(&concept.id);
        let recurse = kind.recurses()
            && level < self.config.max_depth
            && !seen
            && !state.interrupted(self.config);

        let mut expansion = if recurse {
            self.expand(&concept, level + 1, Some(kind), state)
        } else {
            Expansion {
                node: self.leaf(&concept, state),
                raised: Vec::new(),
            }
        };
        expansion.node.set_edge(Some(self.link_decor(kind)));
        Some(expansion)
    }

    fn relation_node(
        &self,
        owner: &str,
        kind: RelationKind,
        mut items: Vec<Node>,
        linked: usize,
    ) -> Node {
        let descriptor = kind.descriptor();
        let node = Node::new(
            format!("{owner}:{}", descriptor.symbol),
            NodeKind::Relation { relation: kind },
        )
        .with_label(descriptor.label)
        .styled(&descriptor.node_style());

        let single = linked == 1 && items.len() == 1 && items[0].kind() == NodeKind::Concept;
        if single && self.config.shape.contains(ShapeFlags::MERGE_SINGLE_LINK) {
            if let Some(target) = items.pop() {
                let label = format!(
                    "{}: {}",
                    descriptor.label,
                    target.label().unwrap_or_else(|| target.id())
                );
                let content = target.content().map(str::to_string);
                let link = target.link().map(str::to_string);
                let mut merged = node.with_label(label).with_children(target.into_children());
                merged.set_content(content);
                merged.set_link(link);
                return merged;
            }
        }
        node.with_children(items)
    }

    fn concept_node(&self, id: String, concept: &Concept, members: &[Member]) -> Node {
        let node = Node::new(id, NodeKind::Concept)
            .with_label(concept_label(concept, members))
            .styled(&self.config.palette.concept);
        if concept.gloss.is_empty() {
            node
        } else {
            node.with_content(concept.gloss.clone())
        }
    }

    fn leaf(&self, concept: &Concept, state: &mut WalkState) -> Node {
        let members = self.lexicon.lookup_members(concept);
        let node = self.concept_node(state.node_id(&concept.id), concept, &members);
        if self.config.shape.contains(ShapeFlags::LINK_LEAVES) {
            node.with_link(format!("concept:{}", concept.id))
        } else {
            node
        }
    }

    fn member_node(&self, member: &Member, state: &mut WalkState) -> Node {
        let lemma = display_lemma(&member.lemma);
        let node = Node::new(state.node_id(&member.id), NodeKind::Member)
            .with_link(format!("word:{lemma}"))
            .with_label(lemma)
            .styled(&self.config.palette.member);
        match &member.content {
            Some(content) => node.with_content(content.clone()),
            None => node,
        }
    }

    fn etc_node(&self, kind: RelationKind, rest: &[String], state: &mut WalkState) -> Node {
        state.stats.etc_nodes += 1;
        trace!(relation = kind.symbol(), remaining = rest.len(), "Breadth cap reached");

        let mut preview = rest
            .iter()
            .take(ETC_PREVIEW)
            .filter_map(|id| self.lexicon.lookup_concept(id))
            .map(|concept| concept_label(&concept, &self.lexicon.lookup_members(&concept)))
            .collect::<Vec<_>>()
            .join(", ");
        if rest.len() > ETC_PREVIEW {
            preview.push_str(ELLIPSIS);
        }

        let id = state.node_id(&synthetic_id("etc", rest.iter().map(String::as_str)));
        let node = Node::new(id, NodeKind::Etc { remaining: rest.len() })
            .with_label(format!("+{}", rest.len()))
            .styled(&self.config.palette.etc)
            .with_edge(kind.descriptor().edge_decor());
        if preview.is_empty() {
            node
        } else {
            node.with_content(preview)
        }
    }

    fn link_decor(&self, kind: RelationKind) -> EdgeDecor {
        let decor = kind.descriptor().edge_decor();
        if self.config.shape.contains(ShapeFlags::EDGE_LABELS) {
            decor.with_label(kind.label())
        } else {
            decor
        }
    }

    fn balance(
        &self,
        builder: Option<&HierarchyBuilder>,
        items: Vec<Node>,
        state: &mut WalkState,
    ) -> Vec<Node> {
        let Some(builder) = builder else {
            return items;
        };
        let (nodes, groups) = builder.build_counted(items);
        state.stats.groups_created += groups;
        nodes
    }
}

/// Walks `lexicon` from `query`; see [`GraphWalker::walk`].
///
/// # Errors
///
/// Same as [`GraphWalker::walk`].
pub fn walk<L: Lexicon + ?Sized>(
    lexicon: &L,
    query: &Query,
    config: &TraversalConfig,
) -> Result<WalkOutput> {
    GraphWalker::new(lexicon, config).walk(query)
}

fn display_lemma(lemma: &str) -> String {
    lemma.replace('_', " ")
}

fn concept_label(concept: &Concept, members: &[Member]) -> String {
    if members.is_empty() {
        return concept.id.clone();
    }
    members
        .iter()
        .map(|m| display_lemma(&m.lemma))
        .collect::<Vec<_>>()
        .join(", ")
}

fn merge_content(base: Option<&str>, extra: &str) -> String {
    match base {
        Some(base) if !base.is_empty() => format!("{base}\n{extra}"),
        _ => extra.to_string(),
    }
}
