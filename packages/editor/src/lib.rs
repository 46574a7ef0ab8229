//! # Pagecraft Editor
//!
//! Core document editing engine for Pagecraft.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ tree: nodes, styles, variables, traversal   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Load/save page JSON                      │
//! │  - Apply mutations (never failing)          │
//! │  - Snapshot undo/redo history               │
//! │  - Selection and clipboards per session     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: Tree → resolved render nodes     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: render output is a derived view
//! 2. **Persistent trees**: a mutation returns a new tree sharing every
//!    untouched subtree with the old one
//! 3. **Edits never fail**: an inapplicable mutation leaves the tree as is
//! 4. **One action, one undo step**: each mutation is preceded by exactly
//!    one history snapshot
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{Document, EditSession, Mutation};
//!
//! let doc = Document::load("home.json")?;
//! let mut session = EditSession::new("client-1", doc);
//!
//! session.apply(Mutation::Remove { node_id: "banner".to_string() });
//! session.undo();
//!
//! session.document.save()?;
//! ```

mod document;
mod errors;
mod history;
mod mutations;
mod pipeline;
mod session;

pub use document::{Document, DocumentStorage, MutationResult};
pub use errors::EditorError;
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use mutations::{
    batch_update_props, batch_update_styles, clone_subtree, duplicate, fresh_copy, insert,
    move_node, remove, reorder_siblings, wrap_in_container, Mutation, MutationError,
    CONTAINER_TYPE,
};
pub use pipeline::{Pipeline, PipelineResult};
pub use session::EditSession;

// Re-export common types for convenience
pub use pagecraft_evaluator::ResolvedNode;
pub use pagecraft_tree::{Node, NodeStyles, Tree};
