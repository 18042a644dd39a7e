//! # Treefold Core
//!
//! Turns a richly, often cyclically, connected concept graph into a finite
//! tree whose fan-out never exceeds a configured cap, ready for hierarchical
//! or radial rendering.
//!
//! ## Pieces
//!
//! - [`balance`]: regroups any sibling list under synthetic group nodes so no
//!   node exceeds its level's fan-out cap.
//! - [`walker`]: depth- and breadth-limited walk over a [`lexicon::Lexicon`],
//!   with relation filters and toggleable reshaping flags.
//! - [`files`]: the same treatment for plain directory listings.
//!
//! ## Quick Start
//!
//! ```rust
//! use treefold_core::lexicon::{Concept, InMemoryLexicon, Member, RelationKind};
//! use treefold_core::walker::{GraphWalker, Query, ShapeFlags, TraversalConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut lexicon = InMemoryLexicon::new();
//!     lexicon.add_concept(Concept::new("dog.n.01", "a domesticated canine"))?;
//!     lexicon.add_concept(Concept::new("canine.n.02", "a carnivore"))?;
//!     lexicon.add_member("dog.n.01", Member::new("dog%1", "dog"))?;
//!     lexicon.add_relation("dog.n.01", RelationKind::Hypernym, "canine.n.02")?;
//!
//!     let config = TraversalConfig::new(2, 16).with_shape(ShapeFlags::EDGE_LABELS);
//!     let output = GraphWalker::new(&lexicon, &config).walk(&Query::new("dog"))?;
//!
//!     assert_eq!(output.root.label(), Some("dog"));
//!     assert!(output.root.max_fan_out() <= 6);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::single_match_else,
        clippy::manual_assert
    )
)]

pub mod balance;
pub mod config;
pub mod error;
pub mod files;
pub mod lexicon;
pub mod tree;
pub mod walker;

pub use balance::{build_hierarchy, BalanceSettings, HierarchyBuilder};
pub use config::{ConfigError, LogFormat, LoggingConfig, TraversalSettings, TreefoldConfig};
pub use error::{Error, Result};
pub use files::{DirEntryInfo, DirectorySource, FileTreeBuilder, FileTreeSettings};
pub use lexicon::{Concept, InMemoryLexicon, Lexicon, Member, PartOfSpeech, RelationKind, RelationSet};
pub use tree::{Edge, EdgeDecor, EdgeStyle, Node, NodeKind};
pub use walker::{walk, CancelToken, GraphWalker, Query, ShapeFlags, TraversalConfig, WalkOutput};
