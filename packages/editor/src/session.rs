//! # Edit Session Management
//!
//! One user's view of a document: the operations the editor chrome calls,
//! the current selection, and the node and style clipboards.
//!
//! Every structural operation funnels through [`EditSession::apply`], which
//! snapshots history once and applies exactly one [`Mutation`].

use crate::document::{Document, MutationResult};
use crate::mutations::Mutation;
use pagecraft_tree::{Node, NodeStyles, Props, Tree};
use tracing::debug;

/// Single edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: Document,

    /// Current selection (node ids)
    pub selected_nodes: Vec<String>,

    clipboard: Option<Node>,
    style_clipboard: Option<NodeStyles>,
}

impl EditSession {
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            document,
            selected_nodes: Vec::new(),
            clipboard: None,
            style_clipboard: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        self.document.tree()
    }

    /// Apply one mutation; selected ids that no longer exist are dropped
    pub fn apply(&mut self, mutation: Mutation) -> MutationResult {
        let result = self.document.apply(mutation);
        if result.applied {
            self.prune_selection();
        }
        result
    }

    pub fn insert(&mut self, parent_id: Option<&str>, node: Node, index: usize) -> MutationResult {
        self.apply(Mutation::Insert {
            parent_id: parent_id.map(str::to_string),
            index,
            node,
        })
    }

    pub fn remove(&mut self, node_id: &str) -> MutationResult {
        self.apply(Mutation::Remove {
            node_id: node_id.to_string(),
        })
    }

    pub fn move_node(
        &mut self,
        node_id: &str,
        new_parent_id: Option<&str>,
        index: usize,
    ) -> MutationResult {
        self.apply(Mutation::Move {
            node_id: node_id.to_string(),
            new_parent_id: new_parent_id.map(str::to_string),
            index,
        })
    }

    pub fn reorder(
        &mut self,
        parent_id: Option<&str>,
        from_index: usize,
        to_index: usize,
    ) -> MutationResult {
        self.apply(Mutation::ReorderSiblings {
            parent_id: parent_id.map(str::to_string),
            from_index,
            to_index,
        })
    }

    /// Duplicate a node; returns the id of the copy
    pub fn clone_node(&mut self, node_id: &str) -> Option<String> {
        let result = self.apply(Mutation::Duplicate {
            node_id: node_id.to_string(),
        });
        if !result.applied {
            return None;
        }

        let index = self.tree().index_of(node_id)?;
        let siblings = self.tree().siblings(node_id)?;
        siblings.get(index + 1).map(|copy| copy.id.clone())
    }

    pub fn batch_update_props(&mut self, node_ids: &[String], props: Props) -> MutationResult {
        self.apply(Mutation::BatchUpdateProps {
            node_ids: node_ids.to_vec(),
            props,
        })
    }

    pub fn batch_update_styles(&mut self, node_ids: &[String], styles: NodeStyles) -> MutationResult {
        self.apply(Mutation::BatchUpdateStyles {
            node_ids: node_ids.to_vec(),
            styles,
        })
    }

    pub fn set_hidden(&mut self, node_ids: &[String], hidden: bool) -> MutationResult {
        self.apply(Mutation::SetHidden {
            node_ids: node_ids.to_vec(),
            hidden,
        })
    }

    /// Wrap sibling nodes in a container; returns the container id
    pub fn wrap_in_container(&mut self, node_ids: &[String]) -> Option<String> {
        let result = self.apply(Mutation::WrapInContainer {
            node_ids: node_ids.to_vec(),
        });
        if !result.applied {
            return None;
        }

        let first = node_ids.first()?;
        self.tree()
            .parent_of(first)
            .flatten()
            .map(|container| container.id.clone())
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.document.undo();
        if undone {
            self.prune_selection();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.document.redo();
        if redone {
            self.prune_selection();
        }
        redone
    }

    pub fn reset_history(&mut self) {
        self.document.reset_history();
    }

    /// Copy a node (with its subtree) to the clipboard
    pub fn copy(&mut self, node_id: &str) -> bool {
        match self.document.find(node_id) {
            Some(node) => {
                self.clipboard = Some(node.clone());
                true
            }
            None => false,
        }
    }

    /// Insert a fresh-id copy of the clipboard; returns the new node's id
    pub fn paste(&mut self, parent_id: Option<&str>, index: usize) -> Option<String> {
        let Some(node) = self.clipboard.as_ref() else {
            debug!(session = %self.id, "Paste with empty clipboard");
            return None;
        };

        let copy = self.document.fresh_copy(node);
        let id = copy.id.clone();
        self.insert(parent_id, copy, index).applied.then_some(id)
    }

    /// Copy a node's styles to the style clipboard
    pub fn copy_styles(&mut self, node_id: &str) -> bool {
        match self.document.find(node_id) {
            Some(node) => {
                self.style_clipboard = Some(node.styles.clone().unwrap_or_default());
                true
            }
            None => false,
        }
    }

    /// Replace the styles of `node_ids` with the style clipboard
    pub fn paste_styles(&mut self, node_ids: &[String]) -> Option<MutationResult> {
        let styles = self.style_clipboard.clone()?;
        Some(self.apply(Mutation::ReplaceStyles {
            node_ids: node_ids.to_vec(),
            styles,
        }))
    }

    pub fn has_clipboard(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Update selection
    pub fn select(&mut self, node_ids: Vec<String>) {
        self.selected_nodes = node_ids;
        self.prune_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selected_nodes.clear();
    }

    fn prune_selection(&mut self) {
        let tree = self.document.tree();
        self.selected_nodes.retain(|id| tree.contains(id));
    }
}
