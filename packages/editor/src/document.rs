//! # Document Handle
//!
//! Core document abstraction for Pagecraft editing.
//!
//! A Document represents a single page tree and its editing state.
//! Documents can be:
//! - **Memory-backed**: Temporary, for tests or for a host that persists
//!   pages itself
//! - **File-backed**: Loaded from and saved to a JSON file
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Evaluate → Save
//!   ↓      ↓        ↓        ↓
//! JSON  Mutations  Render   JSON
//! ```
//!
//! Each edit snapshots the current tree into the document's [`History`]
//! before the mutation runs, so every edit is one undo step.

use crate::errors::EditorError;
use crate::history::History;
use crate::mutations::{fresh_copy, Mutation};
use pagecraft_tree::{IdGenerator, Node, Tree};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Editable page document
#[derive(Debug)]
pub struct Document {
    /// Stable document key (seeds node id generation)
    pub key: String,

    /// Current version number (increments on every change)
    pub version: u64,

    tree: Tree,
    history: History,
    ids: IdGenerator,
    dirty: bool,
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStorage {
    /// In-memory only
    Memory,

    /// Backed by a JSON file
    File(PathBuf),
}

/// Outcome of [`Document::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,

    /// False when the mutation was a no-op
    pub applied: bool,
}

impl Document {
    /// Create a memory-backed document
    pub fn new(key: &str, tree: Tree) -> Self {
        Self {
            key: key.to_string(),
            version: 0,
            tree,
            history: History::new(),
            ids: IdGenerator::new(key),
            dirty: false,
            storage: DocumentStorage::Memory,
        }
    }

    /// Create a memory-backed document from a serialized tree
    pub fn from_json(key: &str, json: &str) -> Result<Self, EditorError> {
        let tree = parse_tree(json)?;
        Ok(Self::new(key, tree))
    }

    /// Load document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let tree = parse_tree(&source)?;

        info!(path = %path.display(), nodes = tree.node_count(), "Loaded document");

        let mut document = Self::new(&path.to_string_lossy(), tree);
        document.storage = DocumentStorage::File(path.to_path_buf());
        Ok(document)
    }

    /// Replace the history with an empty one keeping `capacity` snapshots
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = History::with_capacity(capacity);
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn storage(&self) -> &DocumentStorage {
        &self.storage
    }

    /// Path of a file-backed document
    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::File(path) => Some(path),
            DocumentStorage::Memory => None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.tree.find(id)
    }

    /// Snapshot the current tree, then apply `mutation`
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        self.history.push_snapshot(&self.tree);

        match mutation.try_apply(&self.tree, &mut self.ids) {
            Ok(tree) => {
                self.tree = tree;
                self.touch();
                debug!(mutation = mutation.name(), version = self.version, "Applied mutation");
                MutationResult {
                    version: self.version,
                    applied: true,
                }
            }
            Err(e) => {
                debug!(mutation = mutation.name(), error = %e, "Mutation skipped");
                MutationResult {
                    version: self.version,
                    applied: false,
                }
            }
        }
    }

    /// Step back one edit; false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.tree) {
            Some(tree) => {
                self.tree = tree;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Reapply the last undone edit; false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.tree) {
            Some(tree) => {
                self.tree = tree;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn reset_history(&mut self) {
        self.history.reset();
    }

    /// Point the document at a different page. History does not carry over.
    pub fn load_tree(&mut self, tree: Tree) {
        self.tree = tree;
        self.history.reset();
        self.dirty = false;
        self.version += 1;
    }

    /// [`Document::load_tree`] from serialized JSON; pages with repeated ids
    /// are rejected and the current tree is kept
    pub fn load_tree_json(&mut self, json: &str) -> Result<(), EditorError> {
        let tree = parse_tree(json)?;
        self.load_tree(tree);
        Ok(())
    }

    /// Deep copy of `node` with ids that are fresh in this document
    pub fn fresh_copy(&mut self, node: &Node) -> Node {
        fresh_copy(node, &self.tree, &mut self.ids)
    }

    /// Has the tree changed since load or the last save
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.tree)?)
    }

    /// Save a file-backed document to disk
    pub fn save(&mut self) -> Result<(), EditorError> {
        let DocumentStorage::File(path) = &self.storage else {
            return Err(EditorError::NotFileBacked);
        };

        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), version = self.version, "Saved document");

        self.mark_saved();
        Ok(())
    }

    fn touch(&mut self) {
        self.version += 1;
        self.dirty = true;
    }
}

fn parse_tree(json: &str) -> Result<Tree, EditorError> {
    let tree: Tree = serde_json::from_str(json)?;
    let duplicates = tree.duplicate_ids();
    if !duplicates.is_empty() {
        return Err(EditorError::DuplicateIds(duplicates));
    }
    Ok(tree)
}
