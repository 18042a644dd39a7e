//! Lexicon capability and reference provider.
//!
//! The walker only sees the [`Lexicon`] trait. [`InMemoryLexicon`] is the
//! bundled provider used by the CLI and the tests; real dictionaries plug in
//! by implementing the trait.
//!
//! # Example
//!
//! ```rust
//! use treefold_core::lexicon::{RelationKind, RelationSet};
//!
//! let kind = RelationKind::from_symbol("@").unwrap();
//! assert_eq!(kind, RelationKind::Hypernym);
//! assert!(kind.recurses());
//!
//! let set = RelationSet::from_symbols(&["@", "~"]).unwrap();
//! assert!(set.includes(RelationKind::Hyponym));
//! assert!(!set.includes(RelationKind::Antonym));
//! ```

mod memory;
pub mod relation;
mod stem;
mod types;


pub use memory::InMemoryLexicon;
pub use relation::{registry, RelationDescriptor, RelationKind, RelationRegistry, RelationSet};
pub use stem::candidate_stems;
pub use types::{Concept, Lexicon, Member, PartOfSpeech};
