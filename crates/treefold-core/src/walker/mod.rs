//! Relational graph walker.
//!
//! Materializes a bounded tree from a typed, possibly cyclic relation graph.
//! Depth is limited by `max_depth` and relation kinds that do not recurse;
//! breadth by `max_links` per relation kind plus one etc node for the rest.
//! Member and relation lists go through the
//! [`HierarchyBuilder`](crate::balance::HierarchyBuilder) when balancing is
//! enabled for their category.

mod config;
mod walk;

#[cfg(test)]
mod walk_tests;

pub use config::{
    CancelToken, Palette, ShapeFlags, TraversalConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LINKS,
    MAX_DEPTH_LIMIT, MAX_ESTIMATED_NODES, MAX_LINKS_LIMIT,
};
pub use walk::{walk, GraphWalker, Query, WalkOutput, WalkStats};
