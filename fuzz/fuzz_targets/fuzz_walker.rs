//! Fuzz target for walks over arbitrary cyclic graphs.
//!
//! Builds a small lexicon from arbitrary adjacency, walks it with arbitrary
//! limits and shaping flags, and checks that the walk never panics and that
//! node ids stay unique.
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_walker
//! ```

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use treefold_core::lexicon::{Concept, InMemoryLexicon, Member, RelationKind};
use treefold_core::tree::Node;
use treefold_core::walker::{walk, Query, ShapeFlags, TraversalConfig};

#[derive(Arbitrary, Debug)]
struct WalkInput {
    concepts: u8,
    links: Vec<(u8, u8, u8)>,
    members: Vec<u8>,
    max_depth: u8,
    max_links: u8,
    shape: u32,
    dedup: bool,
}

fn collect_ids<'a>(node: &'a Node, ids: &mut Vec<&'a str>) {
    ids.push(node.id());
    for child in node.children() {
        collect_ids(child, ids);
    }
}

fuzz_target!(|input: WalkInput| {
    let concepts = usize::from(input.concepts % 24) + 1;
    let mut lexicon = InMemoryLexicon::new();
    for i in 0..concepts {
        let id = format!("c{i}");
        if lexicon.add_concept(Concept::new(&id, "gloss")).is_err() {
            return;
        }
        let member_count = input.members.get(i).map_or(1, |m| usize::from(m % 10));
        for m in 0..member_count {
            let _ = lexicon.add_member(&id, Member::new(format!("{id}%{m}"), format!("w{i}_{m}")));
        }
    }
    for &(from, kind, to) in input.links.iter().take(256) {
        let from = format!("c{}", usize::from(from) % concepts);
        // Targets past the concept range are dangling links
        let to = format!("c{}", usize::from(to) % (concepts + 2));
        let kind = RelationKind::ALL[usize::from(kind) % RelationKind::ALL.len()];
        let _ = lexicon.add_relation(&from, kind, &to);
    }

    let config = TraversalConfig::new(usize::from(input.max_depth % 4), usize::from(input.max_links % 8) + 1)
        .with_shape(ShapeFlags::from_bits_truncate(input.shape))
        .with_dedup_visited(input.dedup);

    let Ok(output) = walk(&lexicon, &Query::new("c0"), &config) else {
        return;
    };

    let mut ids = Vec::new();
    collect_ids(&output.root, &mut ids);
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate node ids");
    assert_eq!(output.stats.nodes_created, ids.len());
});
