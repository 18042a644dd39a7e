//! Fuzz target for sibling-list regrouping.
//!
//! Feeds arbitrary list sizes, cap arrays and label thresholds to
//! `build_hierarchy` and checks that:
//! - leaves come back in input order, none dropped or duplicated
//! - no group holds more children than the widest cap
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_hierarchy
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use treefold_core::balance::build_hierarchy;
use treefold_core::tree::{Node, NodeKind, NodeStyle};

#[derive(Arbitrary, Debug)]
struct HierarchyInput {
    items: u16,
    caps: Vec<u8>,
    truncate_at: u8,
    labels: bool,
}

fuzz_target!(|input: HierarchyInput| {
    // Bound the list so a run stays fast
    let count = usize::from(input.items % 4096);
    let caps: Vec<usize> = input.caps.iter().take(8).map(|&c| usize::from(c)).collect();

    let items: Vec<Node> = (0..count)
        .map(|i| {
            let node = Node::new(format!("n{i}"), NodeKind::Member);
            if input.labels {
                node.with_label(format!("label {i}"))
            } else {
                node
            }
        })
        .collect();

    let output = build_hierarchy(items, &caps, usize::from(input.truncate_at), &NodeStyle::default());

    let leaves: Vec<String> = output
        .iter()
        .flat_map(|n| n.leaves().into_iter().map(|l| l.id().to_string()))
        .collect();
    let expected: Vec<String> = (0..count).map(|i| format!("n{i}")).collect();
    assert_eq!(leaves, expected);

    let widest = caps.iter().copied().max().unwrap_or(0);
    if widest > 1 && caps.iter().all(|&c| c > 1) {
        assert!(output.len() <= widest);
        for node in &output {
            if node.kind() == NodeKind::Group {
                assert!(node.max_fan_out() <= widest);
            }
        }
    }
});
