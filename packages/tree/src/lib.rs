//! # Pagecraft Tree
//!
//! The document model shared by the editor and the evaluator.
//!
//! A page is a [`Tree`]: an ordered list of root [`Node`]s, each exclusively
//! owning its children. Children are held behind [`std::sync::Arc`] so that
//! edits can replace the path from a touched node to the root while every
//! untouched subtree is shared with the previous version of the tree.
//!
//! ```text
//! Tree ─┬─ Node(hero)
//!       └─ Node(section) ─┬─ Node(heading)
//!                         └─ Node(features)
//! ```
//!
//! Lookup helpers ([`Tree::find`], [`Tree::path`], [`Tree::siblings`]) never
//! fail loudly: an unknown id yields `None` or an empty result.

mod id_generator;
mod node;
mod styles;
mod traverse;

pub use id_generator::{get_document_id, IdGenerator};
pub use node::{Node, Props, Tree};
pub use styles::{Breakpoint, InteractionState, NodeStyles, StyleMap, Variable};

// Re-exported so downstream crates build props without a direct dependency
pub use serde_json::{json, Value};
