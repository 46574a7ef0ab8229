//! # Undo/Redo History
//!
//! Snapshot history for one document.
//!
//! ## Design
//!
//! - Every mutation is preceded by a snapshot of the tree it replaces
//! - Snapshots are cheap: a [`Tree`] shares every subtree a later mutation
//!   did not touch
//! - Undo hands back the snapshot under the cursor and parks the current tree
//!   on the redo stack
//! - A new snapshot clears the redo stack
//! - The buffer is bounded; the oldest snapshot is evicted first
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//!
//! history.push_snapshot(&tree);
//! let edited = mutation.apply(&tree, &mut ids);
//!
//! let restored = history.undo(&edited).unwrap();   // == tree
//! let again = history.redo(&restored).unwrap();    // == edited
//! ```

use pagecraft_tree::Tree;

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    /// Snapshots, oldest first
    entries: Vec<Tree>,

    /// Entry restored by the next undo; `None` when there is nothing to undo
    cursor: Option<usize>,

    /// Trees undone from, most recent last
    redo: Vec<Tree>,

    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// History keeping at most `capacity` snapshots (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            redo: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record `tree` as the state to return to on the next undo
    pub fn push_snapshot(&mut self, tree: &Tree) {
        self.truncate_after_cursor();
        self.append_bounded(tree.clone());
        self.redo.clear();
    }

    /// Previous tree, given the tree currently shown
    pub fn undo(&mut self, current: &Tree) -> Option<Tree> {
        let cursor = self.cursor?;
        let restored = self.entries.get(cursor)?.clone();

        self.redo.push(current.clone());
        self.cursor = cursor.checked_sub(1);
        Some(restored)
    }

    /// Most recently undone tree, given the tree currently shown
    pub fn redo(&mut self, current: &Tree) -> Option<Tree> {
        let next = self.redo.pop()?;

        self.truncate_after_cursor();
        self.append_bounded(current.clone());
        Some(next)
    }

    /// Forget all snapshots
    pub fn reset(&mut self) {
        self.entries.clear();
        self.redo.clear();
        self.cursor = None;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps available
    pub fn undo_levels(&self) -> usize {
        self.cursor.map_or(0, |cursor| cursor + 1)
    }

    /// Number of redo steps available
    pub fn redo_levels(&self) -> usize {
        self.redo.len()
    }

    /// Position of the cursor in the snapshot buffer
    pub fn history_index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn truncate_after_cursor(&mut self) {
        self.entries.truncate(self.undo_levels());
    }

    fn append_bounded(&mut self, tree: Tree) {
        self.entries.push(tree);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len().checked_sub(1);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
