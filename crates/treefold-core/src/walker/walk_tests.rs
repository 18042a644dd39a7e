//! Tests for the graph walker.

use std::collections::HashSet;
use std::time::Duration;

use super::config::{CancelToken, ShapeFlags, TraversalConfig};
use super::walk::{walk, GraphWalker, Query, WalkOutput};
use crate::balance::BalanceSettings;
use crate::error::Error;
use crate::lexicon::{Concept, InMemoryLexicon, Member, PartOfSpeech, RelationKind, RelationSet};
use crate::tree::{Node, NodeKind};

fn add(lexicon: &mut InMemoryLexicon, id: &str, lemma: &str) {
    lexicon
        .add_concept(Concept::new(id, format!("gloss of {lemma}")))
        .unwrap();
    lexicon
        .add_member(id, Member::new(format!("{lemma}%1"), lemma))
        .unwrap();
}

fn link(lexicon: &mut InMemoryLexicon, from: &str, kind: RelationKind, to: &str) {
    lexicon.add_relation(from, kind, to).unwrap();
}

fn run(lexicon: &InMemoryLexicon, query: &str, config: &TraversalConfig) -> WalkOutput {
    GraphWalker::new(lexicon, config)
        .walk(&Query::new(query))
        .unwrap()
}

fn child<'a>(node: &'a Node, id: &str) -> &'a Node {
    node.children()
        .iter()
        .find(|c| c.id() == id)
        .unwrap_or_else(|| panic!("no child '{id}' under '{}'", node.id()))
}

fn child_ids(node: &Node) -> Vec<&str> {
    node.children().iter().map(Node::id).collect()
}

/// root → parent → grand along hypernyms.
fn chain_lexicon() -> InMemoryLexicon {
    let mut lexicon = InMemoryLexicon::new();
    add(&mut lexicon, "root.n.01", "root");
    add(&mut lexicon, "parent.n.01", "parent");
    add(&mut lexicon, "grand.n.01", "grand");
    add(&mut lexicon, "great.n.01", "great");
    link(&mut lexicon, "root.n.01", RelationKind::Hypernym, "parent.n.01");
    link(&mut lexicon, "parent.n.01", RelationKind::Hypernym, "grand.n.01");
    link(&mut lexicon, "grand.n.01", RelationKind::Hypernym, "great.n.01");
    lexicon
}

/// root with `n` hyponyms t0..t{n-1}.
fn wide_lexicon(n: usize) -> InMemoryLexicon {
    let mut lexicon = InMemoryLexicon::new();
    add(&mut lexicon, "root.n.01", "root");
    for i in 0..n {
        let id = format!("t{i}.n.01");
        add(&mut lexicon, &id, &format!("t{i}"));
        link(&mut lexicon, "root.n.01", RelationKind::Hyponym, &id);
    }
    lexicon
}

// ── Depth and breadth ──────────────────────────────────────────────

#[test]
fn test_depth_zero_keeps_containers_without_expansion() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(0, 32);
    let output = run(&lexicon, "root.n.01", &config);

    let root = &output.root;
    assert_eq!(child_ids(root), vec!["root.n.01:members", "root.n.01:relations"]);
    let relation = child(child(root, "root.n.01:relations"), "root.n.01:@");
    let parent = child(relation, "parent.n.01");
    assert!(parent.is_leaf());
    assert!(root.find("grand.n.01").is_none());
    assert_eq!(output.stats.concepts_expanded, 1);
}

#[test]
fn test_depth_limits_recursion() {
    let lexicon = chain_lexicon();
    let output = run(&lexicon, "root.n.01", &TraversalConfig::new(1, 32));

    let parent = output.root.find("parent.n.01").unwrap();
    assert!(!parent.is_leaf());
    assert!(output.root.find("grand.n.01").unwrap().is_leaf());
    assert!(output.root.find("great.n.01").is_none());
    assert_eq!(output.stats.concepts_expanded, 2);
}

#[test]
fn test_breadth_cap_adds_one_etc_node() {
    let lexicon = wide_lexicon(10);
    let output = run(&lexicon, "root.n.01", &TraversalConfig::new(4, 3));

    let relation = output.root.find("root.n.01:~").unwrap();
    let kinds: Vec<NodeKind> = relation.children().iter().map(Node::kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Concept,
            NodeKind::Concept,
            NodeKind::Concept,
            NodeKind::Etc { remaining: 7 },
        ]
    );
    let etc = &relation.children()[3];
    assert!(etc.id().starts_with("etc-"));
    assert!(etc.link().is_none());
    assert!(etc.is_leaf());
    assert!(etc.content().unwrap().starts_with("t3, t4"));
    assert_eq!(output.stats.etc_nodes, 1);
}

#[test]
fn test_no_etc_node_within_cap() {
    let lexicon = wide_lexicon(3);
    let output = run(&lexicon, "root.n.01", &TraversalConfig::new(4, 3));
    assert_eq!(output.root.find("root.n.01:~").unwrap().children().len(), 3);
    assert_eq!(output.stats.etc_nodes, 0);
}

#[test]
fn test_non_recursing_kind_stays_leaf() {
    let mut lexicon = InMemoryLexicon::new();
    add(&mut lexicon, "hot.a.01", "hot");
    add(&mut lexicon, "cold.a.01", "cold");
    add(&mut lexicon, "chilly.a.01", "chilly");
    link(&mut lexicon, "hot.a.01", RelationKind::Antonym, "cold.a.01");
    link(&mut lexicon, "cold.a.01", RelationKind::Similar, "chilly.a.01");

    let output = run(&lexicon, "hot.a.01", &TraversalConfig::new(8, 4));
    assert!(output.root.find("cold.a.01").unwrap().is_leaf());
    assert!(output.root.find("chilly.a.01").is_none());
    assert_eq!(output.stats.concepts_expanded, 1);
}

#[test]
fn test_relation_filter() {
    let mut lexicon = chain_lexicon();
    add(&mut lexicon, "kid.n.01", "kid");
    link(&mut lexicon, "root.n.01", RelationKind::Hyponym, "kid.n.01");

    let config = TraversalConfig::default()
        .with_relations(RelationSet::empty().with(RelationKind::Hyponym));
    let output = run(&lexicon, "root.n.01", &config);
    assert!(output.root.find("kid.n.01").is_some());
    assert!(output.root.find("parent.n.01").is_none());
}

// ── Lookup misses and resolution ───────────────────────────────────

#[test]
fn test_failed_target_lookup_prunes_only_its_branch() {
    let mut lexicon = InMemoryLexicon::new();
    add(&mut lexicon, "root.n.01", "root");
    for name in ["a", "b", "c", "d"] {
        add(&mut lexicon, &format!("{name}.n.01"), name);
    }
    for target in ["a.n.01", "b.n.01", "ghost.n.01", "c.n.01", "d.n.01"] {
        link(&mut lexicon, "root.n.01", RelationKind::Hyponym, target);
    }

    let output = run(&lexicon, "root.n.01", &TraversalConfig::default());
    let relation = output.root.find("root.n.01:~").unwrap();
    assert_eq!(
        child_ids(relation),
        vec!["a.n.01", "b.n.01", "c.n.01", "d.n.01"]
    );
    assert_eq!(output.stats.lookup_misses, 1);
}

#[test]
fn test_missing_members_counted() {
    let mut lexicon = chain_lexicon();
    let mut concept = Concept::new("odd.n.01", "odd");
    concept.members.push("nobody%1".to_string());
    lexicon.add_concept(concept).unwrap();

    let output = run(&lexicon, "odd.n.01", &TraversalConfig::default());
    assert!(output.root.is_leaf());
    assert_eq!(output.root.label(), Some("odd.n.01"));
    assert_eq!(output.stats.lookup_misses, 1);
}

#[test]
fn test_unresolved_query() {
    let lexicon = chain_lexicon();
    let result = GraphWalker::new(&lexicon, &TraversalConfig::default()).walk(&Query::new("zebra"));
    assert!(matches!(result, Err(Error::UnresolvedQuery(q)) if q == "zebra"));
}

#[test]
fn test_invalid_config_rejected_at_entry() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(4, 0);
    let result = walk(&lexicon, &Query::new("root.n.01"), &config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_query_by_word_and_stem() {
    let lexicon = chain_lexicon();
    let by_word = run(&lexicon, "parent", &TraversalConfig::default());
    assert_eq!(by_word.root.id(), "parent.n.01");

    let by_stem = run(&lexicon, "parents", &TraversalConfig::default());
    assert_eq!(by_stem.root.id(), "parent.n.01");
}

#[test]
fn test_several_senses_hang_under_word_root() {
    let mut lexicon = InMemoryLexicon::new();
    lexicon
        .add_concept(Concept::new("bark.n.01", "outer covering").with_pos(PartOfSpeech::Noun))
        .unwrap();
    lexicon
        .add_concept(Concept::new("bark.v.01", "make a sound").with_pos(PartOfSpeech::Verb))
        .unwrap();
    lexicon.add_member("bark.n.01", Member::new("bark%1", "bark")).unwrap();
    lexicon.add_member("bark.v.01", Member::new("bark%2", "bark")).unwrap();
    let config = TraversalConfig::default();

    let output = run(&lexicon, "bark", &config);
    assert_eq!(output.root.kind(), NodeKind::Word);
    assert_eq!(output.root.label(), Some("bark"));
    assert_eq!(output.root.children().len(), 2);

    let verb = GraphWalker::new(&lexicon, &config)
        .walk(&Query::new("bark").with_pos(PartOfSpeech::Verb))
        .unwrap();
    assert_eq!(verb.root.id(), "bark.v.01");
}

// ── Balancing ──────────────────────────────────────────────────────

#[test]
fn test_members_balanced_and_sorted() {
    let mut lexicon = InMemoryLexicon::new();
    lexicon.add_concept(Concept::new("big.n.01", "many names")).unwrap();
    for i in (0..40).rev() {
        lexicon
            .add_member("big.n.01", Member::new(format!("m{i:02}%1"), format!("m{i:02}")))
            .unwrap();
    }

    let output = run(&lexicon, "big.n.01", &TraversalConfig::default());
    let members = output.root.find("big.n.01:members").unwrap();
    // 40 → 7 groups of at most 6 → 3 groups of at most 3
    assert_eq!(members.children().len(), 3);
    assert!(output.root.max_fan_out() <= 6);
    assert_eq!(output.stats.groups_created, 10);

    let leaves: Vec<&str> = members.leaves().into_iter().filter_map(Node::label).collect();
    assert_eq!(leaves.first(), Some(&"m00"));
    assert_eq!(leaves.last(), Some(&"m39"));
    assert_eq!(leaves.len(), 40);
}

#[test]
fn test_members_unbalanced_keep_lexicon_order() {
    let mut lexicon = InMemoryLexicon::new();
    lexicon.add_concept(Concept::new("pair.n.01", "two")).unwrap();
    lexicon.add_member("pair.n.01", Member::new("zeta%1", "zeta")).unwrap();
    lexicon.add_member("pair.n.01", Member::new("alpha%1", "alpha")).unwrap();

    let sorted = run(&lexicon, "pair.n.01", &TraversalConfig::default());
    assert_eq!(
        child_ids(sorted.root.find("pair.n.01:members").unwrap()),
        vec!["alpha%1", "zeta%1"]
    );

    let config = TraversalConfig::default().with_members_balance(BalanceSettings::disabled());
    let flat = run(&lexicon, "pair.n.01", &config);
    assert_eq!(
        child_ids(flat.root.find("pair.n.01:members").unwrap()),
        vec!["zeta%1", "alpha%1"]
    );
}

#[test]
fn test_relation_targets_balanced() {
    let lexicon = wide_lexicon(20);
    let output = run(&lexicon, "root.n.01", &TraversalConfig::new(1, 32));
    let relation = output.root.find("root.n.01:~").unwrap();
    assert_eq!(relation.children().len(), 2);
    assert!(relation.children().iter().all(|g| g.kind() == NodeKind::Group));

    let config = TraversalConfig::new(1, 32).with_relations_balance(BalanceSettings::disabled());
    let flat = run(&lexicon, "root.n.01", &config);
    assert_eq!(flat.root.find("root.n.01:~").unwrap().children().len(), 20);
}

// ── Shaping flags ──────────────────────────────────────────────────

#[test]
fn test_collapse_single_member() {
    let mut lexicon = InMemoryLexicon::new();
    lexicon.add_concept(Concept::new("solo.n.01", "alone")).unwrap();
    lexicon
        .add_member("solo.n.01", Member::new("solo%1", "solo_act").with_content("<b>one</b>"))
        .unwrap();

    let config = TraversalConfig::default().with_shape(ShapeFlags::COLLAPSE_SINGLE_MEMBER);
    let output = run(&lexicon, "solo.n.01", &config);
    assert!(output.root.is_leaf());
    assert_eq!(output.root.label(), Some("solo act"));
    assert_eq!(output.root.content(), Some("alone\n<b>one</b>"));

    let plain = run(&lexicon, "solo.n.01", &TraversalConfig::default());
    let members = plain.root.find("solo.n.01:members").unwrap();
    assert_eq!(members.children().len(), 1);
    assert_eq!(members.children()[0].content(), Some("<b>one</b>"));
}

#[test]
fn test_forget_containers() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(0, 32)
        .with_shape(ShapeFlags::FORGET_MEMBERS | ShapeFlags::FORGET_RELATIONS);
    let output = run(&lexicon, "root.n.01", &config);

    assert_eq!(child_ids(&output.root), vec!["root%1", "root.n.01:@"]);
    assert_eq!(output.root.children()[0].kind(), NodeKind::Member);
    assert_eq!(
        output.root.children()[1].kind(),
        NodeKind::Relation {
            relation: RelationKind::Hypernym
        }
    );
}

#[test]
fn test_forget_containers_keeps_fan_out_bounded() {
    let mut lexicon = InMemoryLexicon::new();
    lexicon
        .add_concept(Concept::new("hub.n.01", "a crowded concept"))
        .unwrap();
    for i in 0..6 {
        lexicon
            .add_member("hub.n.01", Member::new(format!("hub{i}%1"), format!("hub{i}")))
            .unwrap();
    }
    let kinds = [
        RelationKind::Attribute,
        RelationKind::Derivation,
        RelationKind::Also,
        RelationKind::Similar,
        RelationKind::Pertainym,
        RelationKind::Antonym,
    ];
    for (i, kind) in kinds.into_iter().enumerate() {
        let id = format!("x{i}.n.01");
        add(&mut lexicon, &id, &format!("x{i}"));
        link(&mut lexicon, "hub.n.01", kind, &id);
    }

    let config = TraversalConfig::new(0, 32)
        .with_shape(ShapeFlags::FORGET_MEMBERS | ShapeFlags::FORGET_RELATIONS);
    let output = run(&lexicon, "hub.n.01", &config);

    assert!(output.root.max_fan_out() <= 6);
    assert_eq!(output.root.children().len(), 2);
    assert!(output
        .root
        .children()
        .iter()
        .all(|c| c.kind() == NodeKind::Group));
    for i in 0..6 {
        assert!(output.root.find(&format!("hub{i}%1")).is_some());
        assert!(output.root.find(&format!("x{i}.n.01")).is_some());
    }
}

#[test]
fn test_chained_targets_keep_fan_out_bounded() {
    let mut lexicon = InMemoryLexicon::new();
    add(&mut lexicon, "root.n.01", "root");
    add(&mut lexicon, "mid.n.01", "mid");
    link(&mut lexicon, "root.n.01", RelationKind::Hyponym, "mid.n.01");
    for i in 0..6 {
        let id = format!("c{i}.n.01");
        add(&mut lexicon, &id, &format!("c{i}"));
        link(&mut lexicon, "mid.n.01", RelationKind::Hyponym, &id);
    }

    let config = TraversalConfig::new(1, 32).with_shape(ShapeFlags::FORGET_RELATION_ON_RECURSION);
    let output = run(&lexicon, "root.n.01", &config);

    assert!(output.root.max_fan_out() <= 6);
    let mid = output.root.find("mid.n.01").unwrap();
    assert_eq!(mid.children().len(), 2);
    assert!(mid.find("mid.n.01:~").is_none());
    for i in 0..6 {
        assert!(mid.find(&format!("c{i}.n.01")).is_some());
    }
}

#[test]
fn test_merge_single_link() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(1, 32).with_shape(ShapeFlags::MERGE_SINGLE_LINK);
    let output = run(&lexicon, "root.n.01", &config);

    let relation = output.root.find("root.n.01:@").unwrap();
    assert_eq!(relation.label(), Some("hypernym: parent"));
    assert_eq!(relation.content(), Some("gloss of parent"));
    assert!(output.root.find("parent.n.01").is_none());
    assert!(relation.find("parent.n.01:members").is_some());
}

#[test]
fn test_forget_relation_on_recursion() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(2, 32).with_shape(ShapeFlags::FORGET_RELATION_ON_RECURSION);
    let output = run(&lexicon, "root.n.01", &config);

    let parent = output.root.find("parent.n.01").unwrap();
    assert_eq!(child_ids(parent), vec!["parent.n.01:members", "grand.n.01"]);
    assert!(output.root.find("parent.n.01:@").is_none());
    assert!(output.root.find("root.n.01:@").is_some());
}

#[test]
fn test_raise_recursion_as_siblings() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(4, 32).with_shape(ShapeFlags::RAISE_RECURSION);
    let output = run(&lexicon, "root.n.01", &config);

    let relation = output.root.find("root.n.01:@").unwrap();
    assert_eq!(
        child_ids(relation),
        vec!["parent.n.01", "grand.n.01", "great.n.01"]
    );
    let edges: Vec<(&str, &str)> = output
        .cross_edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(edges.len(), 2);
    assert!(edges.contains(&("parent.n.01", "grand.n.01")));
    assert!(edges.contains(&("grand.n.01", "great.n.01")));
}

#[test]
fn test_raise_wins_over_forget_relation() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(4, 32)
        .with_shape(ShapeFlags::RAISE_RECURSION | ShapeFlags::FORGET_RELATION_ON_RECURSION);
    let output = run(&lexicon, "root.n.01", &config);
    assert_eq!(output.cross_edges.len(), 2);
    assert!(output.root.find("parent.n.01").unwrap().find("grand.n.01").is_none());
}

#[test]
fn test_edge_labels_and_leaf_links() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::new(0, 32)
        .with_shape(ShapeFlags::EDGE_LABELS | ShapeFlags::LINK_LEAVES);
    let output = run(&lexicon, "root.n.01", &config);

    let parent = output.root.find("parent.n.01").unwrap();
    let edge = parent.edge().unwrap();
    assert_eq!(edge.label.as_deref(), Some("hypernym"));
    assert_eq!(edge.style, RelationKind::Hypernym.descriptor().edge);
    assert_eq!(parent.link(), Some("concept:parent.n.01"));

    let plain = run(&lexicon, "root.n.01", &TraversalConfig::new(0, 32));
    let parent = plain.root.find("parent.n.01").unwrap();
    assert!(parent.edge().unwrap().label.is_none());
    assert!(parent.link().is_none());
}

// ── Cycles, dedup, interruption ────────────────────────────────────

fn cycle_lexicon() -> InMemoryLexicon {
    let mut lexicon = InMemoryLexicon::new();
    add(&mut lexicon, "a.n.01", "alpha");
    add(&mut lexicon, "b.n.01", "beta");
    link(&mut lexicon, "a.n.01", RelationKind::Hypernym, "b.n.01");
    link(&mut lexicon, "b.n.01", RelationKind::Hyponym, "a.n.01");
    lexicon
}

fn all_ids(node: &Node, out: &mut Vec<String>) {
    out.push(node.id().to_string());
    for child in node.children() {
        all_ids(child, out);
    }
}

#[test]
fn test_cycle_reexpanded_with_unique_ids() {
    let lexicon = cycle_lexicon();
    let output = run(&lexicon, "a.n.01", &TraversalConfig::new(2, 32));

    assert_eq!(output.stats.concepts_expanded, 3);
    assert!(output.root.find("a.n.01~2").is_some());
    assert!(output.root.find("b.n.01~2").unwrap().is_leaf());

    let mut ids = Vec::new();
    all_ids(&output.root, &mut ids);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(output.stats.nodes_created, output.root.count());
}

#[test]
fn test_dedup_visited_emits_leaf() {
    let lexicon = cycle_lexicon();
    let config = TraversalConfig::new(2, 32).with_dedup_visited(true);
    let output = run(&lexicon, "a.n.01", &config);

    assert_eq!(output.stats.concepts_expanded, 2);
    assert!(output.root.find("a.n.01~2").unwrap().is_leaf());
}

#[test]
fn test_cancelled_walk_returns_partial_tree() {
    let lexicon = chain_lexicon();
    let token = CancelToken::new();
    token.cancel();
    let config = TraversalConfig::default().with_cancel_token(token);
    let output = run(&lexicon, "root.n.01", &config);

    assert!(output.stats.interrupted);
    assert_eq!(output.stats.concepts_expanded, 1);
    assert!(output.root.find("parent.n.01").unwrap().is_leaf());
}

#[test]
fn test_expired_deadline_interrupts() {
    let lexicon = chain_lexicon();
    let config = TraversalConfig::default().with_deadline(Duration::ZERO);
    let output = run(&lexicon, "root.n.01", &config);
    assert!(output.stats.interrupted);
    assert!(output.root.find("grand.n.01").is_none());
}

#[test]
fn test_uninterrupted_by_default() {
    let lexicon = chain_lexicon();
    let output = run(&lexicon, "root.n.01", &TraversalConfig::default());
    assert!(!output.stats.interrupted);
    assert!(output.root.find("great.n.01").is_some());
}
