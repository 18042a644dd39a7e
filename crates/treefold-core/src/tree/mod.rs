//! Tree types handed to the renderer.
//!
//! A walk produces one root [`Node`] plus a list of cross-tree [`Edge`]s.
//! Decoration ([`EdgeStyle`], [`Color`], [`NodeStyle`]) is carried through
//! untouched.
//!
//! # Example
//!
//! ```rust
//! use treefold_core::tree::{EdgeStyle, Stroke, Terminator};
//!
//! let style = EdgeStyle::new(Stroke::Dashed).with_to(Terminator::Triangle, true);
//! assert_eq!(EdgeStyle::from_packed(style.to_packed()), style);
//! ```

mod style;
mod types;


pub use style::{Color, EdgeDecor, EdgeStyle, NodeStyle, Stroke, Terminator};
pub use types::{synthetic_id, Edge, Node, NodeKind};
