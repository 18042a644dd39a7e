//! Bounded fan-out hierarchy building.
//!
//! Knows nothing about graphs: it takes an already-built sibling list and
//! inserts synthetic group levels until every node's child count fits the
//! cap configured for its level.

mod builder;


pub use builder::{
    build_hierarchy, sort_by_label, BalanceSettings, HierarchyBuilder, DEFAULT_MAX_AT_LEVEL,
    DEFAULT_TRUNCATE_AT, ELLIPSIS,
};
