//! End-to-end walker scenarios over a small WordNet-like fixture.
//!
//! The fixture mirrors a slice of the noun hierarchy around "dog": a few
//! synonyms, a hypernym chain up to "animal", a wide hyponym fan and a
//! non-recursing antonym pair on the adjective side.

use treefold_core::lexicon::{Concept, InMemoryLexicon, Member, PartOfSpeech, RelationKind};
use treefold_core::tree::{Node, NodeKind};
use treefold_core::walker::{walk, Query, ShapeFlags, TraversalConfig};
use treefold_core::{Error, RelationSet, TreefoldConfig};

fn concept(lexicon: &mut InMemoryLexicon, id: &str, pos: PartOfSpeech, gloss: &str, lemmas: &[&str]) {
    lexicon
        .add_concept(Concept::new(id, gloss).with_pos(pos))
        .unwrap();
    for (i, lemma) in lemmas.iter().enumerate() {
        lexicon
            .add_member(id, Member::new(format!("{lemma}%{id}%{i}"), *lemma))
            .unwrap();
    }
}

fn fixture() -> InMemoryLexicon {
    use PartOfSpeech::{Adjective, Noun};
    use RelationKind::{Antonym, Hypernym, Hyponym, Similar};

    let mut lx = InMemoryLexicon::new();
    concept(&mut lx, "dog.n.01", Noun, "a member of the genus Canis", &["dog", "domestic_dog", "Canis_familiaris"]);
    concept(&mut lx, "canine.n.02", Noun, "any of various fissiped mammals", &["canine", "canid"]);
    concept(&mut lx, "carnivore.n.01", Noun, "a terrestrial or aquatic flesh-eating mammal", &["carnivore"]);
    concept(&mut lx, "mammal.n.01", Noun, "any warm-blooded vertebrate", &["mammal"]);
    concept(&mut lx, "animal.n.01", Noun, "a living organism", &["animal", "beast"]);

    lx.add_relation("dog.n.01", Hypernym, "canine.n.02").unwrap();
    lx.add_relation("canine.n.02", Hypernym, "carnivore.n.01").unwrap();
    lx.add_relation("carnivore.n.01", Hypernym, "mammal.n.01").unwrap();
    lx.add_relation("mammal.n.01", Hypernym, "animal.n.01").unwrap();
    lx.add_relation("canine.n.02", Hyponym, "dog.n.01").unwrap();

    for i in 0..25 {
        let id = format!("breed{i:02}.n.01");
        concept(&mut lx, &id, Noun, "a breed of dog", &[&format!("breed_{i:02}")]);
        lx.add_relation("dog.n.01", Hyponym, &id).unwrap();
    }
    lx.add_relation("dog.n.01", Hyponym, "lost_breed.n.01").unwrap();

    concept(&mut lx, "loyal.a.01", Adjective, "steadfast in allegiance", &["loyal"]);
    concept(&mut lx, "disloyal.a.01", Adjective, "deficient in allegiance", &["disloyal"]);
    concept(&mut lx, "faithless.a.01", Adjective, "not true to duty", &["faithless"]);
    lx.add_relation("loyal.a.01", Antonym, "disloyal.a.01").unwrap();
    lx.add_relation("disloyal.a.01", Similar, "faithless.a.01").unwrap();
    lx
}

fn count_kind(node: &Node, kind: NodeKind) -> usize {
    usize::from(node.kind() == kind)
        + node
            .children()
            .iter()
            .map(|c| count_kind(c, kind))
            .sum::<usize>()
}

#[test]
fn test_default_walk_is_bounded() {
    let lexicon = fixture();
    let output = walk(&lexicon, &Query::new("dog"), &TraversalConfig::default()).unwrap();

    assert_eq!(output.root.id(), "dog.n.01");
    assert_eq!(output.root.label(), Some("dog, domestic dog, Canis familiaris"));
    assert!(output.root.max_fan_out() <= 6);
    assert!(output.root.find("animal.n.01").is_some());
    // dog -> canine -> dog -> canine -> dog, each dog expansion misses once
    assert_eq!(output.stats.lookup_misses, 3);
    assert!(output.cross_edges.is_empty());
    assert_eq!(output.stats.nodes_created, output.root.count());
}

#[test]
fn test_dedup_expands_each_concept_once() {
    let lexicon = fixture();
    let config = TraversalConfig::default().with_dedup_visited(true);
    let output = walk(&lexicon, &Query::new("dog"), &config).unwrap();

    assert_eq!(output.stats.lookup_misses, 1);
    let again = output.root.find("dog.n.01~2").unwrap();
    assert!(again.is_leaf());
}

#[test]
fn test_hyponym_fan_is_grouped() {
    let lexicon = fixture();
    let config = TraversalConfig::new(1, 32);
    let output = walk(&lexicon, &Query::new("dog.n.01"), &config).unwrap();

    let hyponyms = output.root.find("dog.n.01:~").unwrap();
    // 25 resolvable breeds → 5 groups → 2 groups
    assert_eq!(hyponyms.children().len(), 2);
    assert_eq!(count_kind(hyponyms, NodeKind::Concept), 25);
    assert!(output.stats.groups_created >= 7);
}

#[test]
fn test_breadth_cap_with_dangling_target() {
    let lexicon = fixture();
    let config = TraversalConfig::new(1, 10);
    let output = walk(&lexicon, &Query::new("dog.n.01"), &config).unwrap();

    let hyponyms = output.root.find("dog.n.01:~").unwrap();
    assert_eq!(count_kind(hyponyms, NodeKind::Concept), 10);
    assert_eq!(count_kind(hyponyms, NodeKind::Etc { remaining: 16 }), 1);
    assert_eq!(output.stats.lookup_misses, 0);
}

#[test]
fn test_raised_hypernym_chain() {
    let lexicon = fixture();
    let config = TraversalConfig::new(4, 32)
        .with_relations(RelationSet::empty().with(RelationKind::Hypernym))
        .with_shape(ShapeFlags::RAISE_RECURSION | ShapeFlags::EDGE_LABELS);
    let output = walk(&lexicon, &Query::new("dog"), &config).unwrap();

    let chain: Vec<&str> = output
        .root
        .find("dog.n.01:@")
        .unwrap()
        .children()
        .iter()
        .map(Node::id)
        .collect();
    assert_eq!(chain, vec!["canine.n.02", "carnivore.n.01", "mammal.n.01", "animal.n.01"]);
    assert_eq!(output.cross_edges.len(), 3);
    assert!(output
        .cross_edges
        .iter()
        .all(|e| e.decor.label.as_deref() == Some("hypernym")));
}

#[test]
fn test_antonym_not_followed() {
    let lexicon = fixture();
    let output = walk(&lexicon, &Query::new("loyal"), &TraversalConfig::default()).unwrap();
    assert!(output.root.find("disloyal.a.01").unwrap().is_leaf());
    assert!(output.root.find("faithless.a.01").is_none());
}

#[test]
fn test_unknown_word() {
    let lexicon = fixture();
    let result = walk(&lexicon, &Query::new("unicorn"), &TraversalConfig::default());
    assert!(matches!(result, Err(Error::UnresolvedQuery(_))));
}

#[test]
fn test_config_file_drives_walk() {
    let config = TreefoldConfig::from_toml_str(
        r#"
        [traversal]
        max_depth = 0
        shape = "FORGET_MEMBERS | FORGET_RELATIONS | LINK_LEAVES"
        "#,
    )
    .unwrap();
    let traversal = config.traversal_config().unwrap();
    let lexicon = fixture();
    let output = walk(&lexicon, &Query::new("canine"), &traversal).unwrap();

    let kinds: Vec<NodeKind> = output.root.children().iter().map(Node::kind).collect();
    assert_eq!(kinds[0], NodeKind::Member);
    assert!(kinds.contains(&NodeKind::Relation {
        relation: RelationKind::Hypernym
    }));
    let dog = output.root.find("dog.n.01").unwrap();
    assert_eq!(dog.link(), Some("concept:dog.n.01"));
}

#[test]
fn test_output_serializes() {
    let lexicon = fixture();
    let output = walk(&lexicon, &Query::new("mammal"), &TraversalConfig::new(1, 4)).unwrap();
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["root"]["id"], "mammal.n.01");
    assert_eq!(json["root"]["kind"]["type"], "concept");
    assert_eq!(json["stats"]["interrupted"], false);
}
