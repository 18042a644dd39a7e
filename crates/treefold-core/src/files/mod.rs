//! Filesystem variant.
//!
//! Plain directories and files feed the same hierarchy builder as the
//! lexical walker. Listings come from a [`DirectorySource`]; this crate
//! performs no disk access itself.

mod builder;


pub use builder::{
    DirEntryInfo, DirectorySource, FileTreeBuilder, FileTreeSettings, DEFAULT_FILES_DEPTH,
};
