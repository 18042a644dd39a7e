//! Indented, colored rendering of a produced tree.

use colored::{ColoredString, Colorize};
use treefold_core::tree::{Edge, Node, NodeKind};
use treefold_core::walker::WalkStats;

const INDENT: &str = "  ";

/// Renders `root` one node per line, children indented under their parent.
pub fn render(root: &Node) -> String {
    let mut out = String::new();
    let mut stack = vec![(root, 0_usize)];
    while let Some((node, depth)) = stack.pop() {
        out.push_str(&INDENT.repeat(depth));
        out.push_str(&line(node));
        out.push('\n');
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
    out
}

/// Renders cross edges, one `from -> to` per line.
pub fn render_edges(edges: &[Edge]) -> String {
    let mut out = String::new();
    for edge in edges {
        let line = match &edge.decor.label {
            Some(label) => format!("{} -> {} ({label})\n", edge.from, edge.to),
            None => format!("{} -> {}\n", edge.from, edge.to),
        };
        out.push_str(&line);
    }
    out
}

/// One-line summary of walk counters.
pub fn render_stats(stats: &WalkStats) -> String {
    let mut line = format!(
        "{} nodes, {} concepts expanded, {} lookup misses, {} groups, {} etc",
        stats.nodes_created,
        stats.concepts_expanded,
        stats.lookup_misses,
        stats.groups_created,
        stats.etc_nodes
    );
    if stats.interrupted {
        line.push_str(", interrupted");
    }
    line
}

fn line(node: &Node) -> String {
    let label = painted(node.kind(), node.label().unwrap_or_else(|| node.id()));
    match node.content() {
        Some(content) if matches!(node.kind(), NodeKind::Concept | NodeKind::Etc { .. }) => {
            let first = content.lines().next().unwrap_or_default();
            format!("{label} {}", format!("({first})").dimmed())
        }
        Some(content) if node.kind() == NodeKind::File => {
            format!("{label} {}", content.dimmed())
        }
        _ => label.to_string(),
    }
}

fn painted(kind: NodeKind, text: &str) -> ColoredString {
    match kind {
        NodeKind::Word => text.magenta().bold(),
        NodeKind::Concept => text.bold(),
        NodeKind::Member => text.green(),
        NodeKind::Members | NodeKind::Relations => text.cyan(),
        NodeKind::Relation { .. } => text.blue(),
        NodeKind::Group => text.yellow(),
        NodeKind::Etc { .. } => text.dimmed(),
        NodeKind::Directory => text.blue().bold(),
        NodeKind::File => text.normal(),
    }
}
