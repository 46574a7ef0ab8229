//! # Tree Mutations
//!
//! Structural edit operations on a page [`Tree`].
//!
//! ## Design Principles
//!
//! 1. **Tree in, tree out**: nothing is edited in place. The touched node and
//!    every ancestor up to the root are replaced by shallow copies; all other
//!    subtrees are shared with the input tree.
//! 2. **Never raise**: an operation whose preconditions do not hold returns
//!    the input tree. [`Mutation::try_apply`] reports why, as a
//!    [`MutationError`]; [`Mutation::apply`] logs the reason and moves on.
//! 3. **Fresh ids**: every node produced by duplication, paste or wrapping
//!    gets an id not present anywhere in the tree.
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Index is clamped into `[0, len]`
//! - Unknown parent inserts at root level
//!
//! ### Move
//! - Remove then re-insert the same subtree, never duplicating it
//! - Moving a node into its own subtree is rejected
//!
//! ### WrapInContainer
//! - All selected nodes must share one parent (root level counts)
//! - The container takes the place of the earliest selected sibling

use pagecraft_tree::{IdGenerator, Node, NodeStyles, Props, Tree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Node type of containers created by [`Mutation::WrapInContainer`]
pub const CONTAINER_TYPE: &str = "container";

/// Structural operations the editor chrome may perform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Insert a node under a parent (root level when absent)
    Insert {
        #[serde(default)]
        parent_id: Option<String>,
        index: usize,
        node: Node,
    },

    /// Remove a node and its subtree
    Remove { node_id: String },

    /// Relocate a node and its subtree
    Move {
        node_id: String,
        #[serde(default)]
        new_parent_id: Option<String>,
        index: usize,
    },

    /// Reposition a child within one sibling list
    ReorderSiblings {
        #[serde(default)]
        parent_id: Option<String>,
        from_index: usize,
        to_index: usize,
    },

    /// Deep copy a node with fresh ids, placed right after the original
    Duplicate { node_id: String },

    /// Shallow-merge props into every listed node
    BatchUpdateProps { node_ids: Vec<String>, props: Props },

    /// Merge style overrides per breakpoint/state into every listed node
    BatchUpdateStyles {
        node_ids: Vec<String>,
        styles: NodeStyles,
    },

    /// Replace the styles of every listed node
    ReplaceStyles {
        node_ids: Vec<String>,
        styles: NodeStyles,
    },

    /// Show or hide every listed node
    SetHidden { node_ids: Vec<String>, hidden: bool },

    /// Move sibling nodes into a new container
    WrapInContainer { node_ids: Vec<String> },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Index {index} out of bounds for {len} siblings")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Selected nodes do not share a parent")]
    ParentMismatch,

    #[error("No nodes selected")]
    EmptySelection,
}

impl Mutation {
    /// Apply to `tree`, returning the input tree unchanged if the mutation
    /// cannot be applied
    pub fn apply(&self, tree: &Tree, ids: &mut IdGenerator) -> Tree {
        match self.try_apply(tree, ids) {
            Ok(tree) => tree,
            Err(e) => {
                debug!(mutation = self.name(), error = %e, "Mutation skipped");
                tree.clone()
            }
        }
    }

    /// Apply to `tree`, reporting why the mutation was not applicable
    pub fn try_apply(&self, tree: &Tree, ids: &mut IdGenerator) -> Result<Tree, MutationError> {
        match self {
            Mutation::Insert {
                parent_id,
                index,
                node,
            } => {
                let node = if subtree_collides(tree, node) {
                    debug!(node_id = %node.id, "Inserted subtree reuses existing ids, re-identifying");
                    fresh_copy(node, tree, ids)
                } else {
                    node.clone()
                };
                Ok(insert(tree, parent_id.as_deref(), node, *index))
            }

            Mutation::Remove { node_id } => remove(tree, node_id),

            Mutation::Move {
                node_id,
                new_parent_id,
                index,
            } => move_node(tree, node_id, new_parent_id.as_deref(), *index),

            Mutation::ReorderSiblings {
                parent_id,
                from_index,
                to_index,
            } => reorder_siblings(tree, parent_id.as_deref(), *from_index, *to_index),

            Mutation::Duplicate { node_id } => duplicate(tree, node_id, ids),

            Mutation::BatchUpdateProps { node_ids, props } => {
                batch_update_props(tree, node_ids, props)
            }

            Mutation::BatchUpdateStyles { node_ids, styles } => {
                batch_update_styles(tree, node_ids, styles)
            }

            Mutation::ReplaceStyles { node_ids, styles } => {
                update_matching(tree, node_ids, |node| {
                    node.styles = (!styles.is_empty()).then(|| styles.clone());
                })
            }

            Mutation::SetHidden { node_ids, hidden } => {
                update_matching(tree, node_ids, |node| node.hidden = *hidden)
            }

            Mutation::WrapInContainer { node_ids } => wrap_in_container(tree, node_ids, ids),
        }
    }

    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Insert { .. } => "insert",
            Mutation::Remove { .. } => "remove",
            Mutation::Move { .. } => "move",
            Mutation::ReorderSiblings { .. } => "reorderSiblings",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::BatchUpdateProps { .. } => "batchUpdateProps",
            Mutation::BatchUpdateStyles { .. } => "batchUpdateStyles",
            Mutation::ReplaceStyles { .. } => "replaceStyles",
            Mutation::SetHidden { .. } => "setHidden",
            Mutation::WrapInContainer { .. } => "wrapInContainer",
        }
    }
}

/// Insert `node` at `index` under `parent_id`.
///
/// The index is clamped; an unknown parent falls back to the root list.
pub fn insert(tree: &Tree, parent_id: Option<&str>, node: Node, index: usize) -> Tree {
    let parent_path = match parent_id {
        Some(id) => index_path(tree.roots(), id).unwrap_or_else(|| {
            debug!(parent_id = id, "Insert parent not found, inserting at root");
            Vec::new()
        }),
        None => Vec::new(),
    };
    insert_at(tree, &parent_path, Arc::new(node), index)
}

/// Remove the node `id` and its subtree
pub fn remove(tree: &Tree, id: &str) -> Result<Tree, MutationError> {
    detach(tree, id).map(|(tree, _)| tree)
}

/// Move `id` (with its subtree) to `index` under `new_parent_id`.
///
/// `index` refers to the target list after the node has been removed from its
/// old position.
pub fn move_node(
    tree: &Tree,
    id: &str,
    new_parent_id: Option<&str>,
    index: usize,
) -> Result<Tree, MutationError> {
    let node = tree
        .find(id)
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))?;

    if let Some(parent_id) = new_parent_id {
        if node.contains_id(parent_id) {
            return Err(MutationError::CycleDetected);
        }
    }

    let (detached, moved) = detach(tree, id)?;
    let parent_path = match new_parent_id {
        Some(parent_id) => index_path(detached.roots(), parent_id).unwrap_or_else(|| {
            debug!(parent_id, "Move target not found, moving to root");
            Vec::new()
        }),
        None => Vec::new(),
    };

    Ok(insert_at(&detached, &parent_path, moved, index))
}

/// Move the child at `from` to `to` within one sibling list
pub fn reorder_siblings(
    tree: &Tree,
    parent_id: Option<&str>,
    from: usize,
    to: usize,
) -> Result<Tree, MutationError> {
    let (parent_path, len) = match parent_id {
        None => (Vec::new(), tree.roots().len()),
        Some(id) => {
            let path = index_path(tree.roots(), id)
                .ok_or_else(|| MutationError::ParentNotFound(id.to_string()))?;
            let len = tree.find(id).map_or(0, |parent| parent.children.len());
            (path, len)
        }
    };

    for index in [from, to] {
        if index >= len {
            return Err(MutationError::IndexOutOfBounds { index, len });
        }
    }
    if from == to {
        return Ok(tree.clone());
    }

    Ok(Tree::from_shared(edit_list(tree.roots(), &parent_path, |list| {
        let node = list.remove(from);
        list.insert(to, node);
    })))
}

/// Deep copy of the subtree at `id` with a fresh id on every node.
///
/// `componentNodeId`, props, styles and variables are copied as they are.
pub fn clone_subtree(tree: &Tree, id: &str, ids: &mut IdGenerator) -> Option<Node> {
    let source = tree.find(id)?;
    Some(fresh_copy(source, tree, ids))
}

/// Deep copy of `node` whose ids are all absent from `tree`
pub fn fresh_copy(node: &Node, tree: &Tree, ids: &mut IdGenerator) -> Node {
    let mut taken = tree.collect_ids();
    fresh_copy_with(node, ids, &mut taken)
}

fn fresh_copy_with(node: &Node, ids: &mut IdGenerator, taken: &mut HashSet<String>) -> Node {
    let id = ids.fresh_id(|candidate| taken.contains(candidate));
    taken.insert(id.clone());

    let children = node
        .children
        .iter()
        .map(|child| Arc::new(fresh_copy_with(child, ids, taken)))
        .collect();

    let mut copy = node.with_replaced_children(children);
    copy.id = id;
    copy
}

/// Insert a fresh copy of `id` right after it
pub fn duplicate(tree: &Tree, id: &str, ids: &mut IdGenerator) -> Result<Tree, MutationError> {
    let copy =
        clone_subtree(tree, id, ids).ok_or_else(|| MutationError::NodeNotFound(id.to_string()))?;
    let (index, parent_path) = split_path(tree, id)?;
    Ok(insert_at(tree, &parent_path, Arc::new(copy), index + 1))
}

/// Shallow-merge `props` into every node in `node_ids`; unknown ids are skipped
pub fn batch_update_props(
    tree: &Tree,
    node_ids: &[String],
    props: &Props,
) -> Result<Tree, MutationError> {
    update_matching(tree, node_ids, |node| {
        for (key, value) in props {
            node.props.insert(key.clone(), value.clone());
        }
    })
}

/// Merge `styles` into every node in `node_ids`, per breakpoint/state map
pub fn batch_update_styles(
    tree: &Tree,
    node_ids: &[String],
    styles: &NodeStyles,
) -> Result<Tree, MutationError> {
    update_matching(tree, node_ids, |node| {
        node.styles
            .get_or_insert_with(NodeStyles::default)
            .merge(styles);
    })
}

/// Wrap sibling nodes in a new container placed where the first of them was
pub fn wrap_in_container(
    tree: &Tree,
    node_ids: &[String],
    ids: &mut IdGenerator,
) -> Result<Tree, MutationError> {
    if node_ids.is_empty() {
        return Err(MutationError::EmptySelection);
    }

    let mut shared_parent: Option<Option<String>> = None;
    for id in node_ids {
        let parent = tree
            .parent_of(id)
            .ok_or_else(|| MutationError::NodeNotFound(id.clone()))?
            .map(|parent| parent.id.clone());

        match &shared_parent {
            None => shared_parent = Some(parent),
            Some(existing) if *existing != parent => return Err(MutationError::ParentMismatch),
            Some(_) => {}
        }
    }

    let parent_path = match shared_parent.flatten() {
        Some(parent_id) => index_path(tree.roots(), &parent_id)
            .ok_or(MutationError::ParentNotFound(parent_id))?,
        None => Vec::new(),
    };

    let selected: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
    let taken = tree.collect_ids();
    let container_id = ids.fresh_id(|candidate| taken.contains(candidate));

    Ok(Tree::from_shared(edit_list(tree.roots(), &parent_path, |list| {
        let first = list
            .iter()
            .position(|node| selected.contains(node.id.as_str()))
            .unwrap_or(0);
        let (wrapped, kept): (Vec<_>, Vec<_>) = list
            .drain(..)
            .partition(|node| selected.contains(node.id.as_str()));

        let mut container = Node::new(container_id, CONTAINER_TYPE);
        container.children = wrapped;

        *list = kept;
        list.insert(first, Arc::new(container));
    })))
}

/// Index path from the root list down to `id`
fn index_path(nodes: &[Arc<Node>], id: &str) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = index_path(&node.children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

/// Position of `id` in its sibling list, and the index path of that list
fn split_path(tree: &Tree, id: &str) -> Result<(usize, Vec<usize>), MutationError> {
    let mut path =
        index_path(tree.roots(), id).ok_or_else(|| MutationError::NodeNotFound(id.to_string()))?;
    let index = path
        .pop()
        .ok_or_else(|| MutationError::NodeNotFound(id.to_string()))?;
    Ok((index, path))
}

/// Copy the list at `parent_path` (roots when empty), edit it, and rebuild
/// every ancestor on the way back up. Siblings off the path stay shared.
fn edit_list<F>(nodes: &[Arc<Node>], parent_path: &[usize], edit: F) -> Vec<Arc<Node>>
where
    F: FnOnce(&mut Vec<Arc<Node>>),
{
    let mut list = nodes.to_vec();
    match parent_path.split_first() {
        None => edit(&mut list),
        Some((&index, rest)) => {
            let parent = &nodes[index];
            let children = edit_list(&parent.children, rest, edit);
            list[index] = Arc::new(parent.with_replaced_children(children));
        }
    }
    list
}

fn insert_at(tree: &Tree, parent_path: &[usize], node: Arc<Node>, index: usize) -> Tree {
    Tree::from_shared(edit_list(tree.roots(), parent_path, |list| {
        let at = index.min(list.len());
        list.insert(at, node);
    }))
}

fn detach(tree: &Tree, id: &str) -> Result<(Tree, Arc<Node>), MutationError> {
    let (index, parent_path) = split_path(tree, id)?;

    let mut removed = None;
    let roots = edit_list(tree.roots(), &parent_path, |list| {
        removed = Some(list.remove(index));
    });

    let removed = removed.ok_or_else(|| MutationError::NodeNotFound(id.to_string()))?;
    Ok((Tree::from_shared(roots), removed))
}

fn update_matching<F>(tree: &Tree, node_ids: &[String], update: F) -> Result<Tree, MutationError>
where
    F: Fn(&mut Node),
{
    if node_ids.is_empty() {
        return Err(MutationError::EmptySelection);
    }

    let targets: HashSet<&str> = node_ids.iter().map(String::as_str).collect();
    update_nodes(tree.roots(), &targets, &update)
        .map(Tree::from_shared)
        .ok_or_else(|| MutationError::NodeNotFound(node_ids.join(", ")))
}

/// Rebuilt list if any node in it (or below it) was a target
fn update_nodes(
    nodes: &[Arc<Node>],
    targets: &HashSet<&str>,
    update: &dyn Fn(&mut Node),
) -> Option<Vec<Arc<Node>>> {
    let mut changed = false;
    let mut updated = Vec::with_capacity(nodes.len());

    for node in nodes {
        let children = update_nodes(&node.children, targets, update);
        let is_target = targets.contains(node.id.as_str());

        if children.is_none() && !is_target {
            updated.push(Arc::clone(node));
            continue;
        }

        changed = true;
        let mut copy = match children {
            Some(children) => node.with_replaced_children(children),
            None => Node::clone(node),
        };
        if is_target {
            update(&mut copy);
        }
        updated.push(Arc::new(copy));
    }

    changed.then_some(updated)
}

/// True if `node` reuses an id of `tree` or repeats an id within itself
fn subtree_collides(tree: &Tree, node: &Node) -> bool {
    fn visit<'a>(tree: &Tree, node: &'a Node, seen: &mut HashSet<&'a str>) -> bool {
        if tree.contains(&node.id) || !seen.insert(node.id.as_str()) {
            return true;
        }
        node.children.iter().any(|child| visit(tree, child, seen))
    }

    visit(tree, node, &mut HashSet::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_tree::json;

    fn page() -> Tree {
        Tree::from_nodes(vec![
            Node::new("nav", "nav"),
            Node::new("main", "section")
                .with_child(Node::new("h1", "heading").with_props(json!({ "text": "Hi" })))
                .with_child(Node::new("p1", "text"))
                .with_child(Node::new("p2", "text")),
            Node::new("footer", "footer"),
        ])
    }

    fn child_ids(tree: &Tree, parent: &str) -> Vec<String> {
        tree.find(parent)
            .map(|node| node.children.iter().map(|c| c.id.clone()).collect())
            .unwrap_or_default()
    }

    fn root_ids(tree: &Tree) -> Vec<String> {
        tree.roots().iter().map(|n| n.id.clone()).collect()
    }

    fn ids() -> IdGenerator {
        IdGenerator::from_seed("t")
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::Move {
            node_id: "p1".to_string(),
            new_parent_id: None,
            index: 0,
        };

        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(json["type"], json!("move"));
        assert_eq!(json["nodeId"], json!("p1"));

        let back: Mutation = serde_json::from_value(json).unwrap();
        assert_eq!(mutation, back);
    }

    #[test]
    fn test_parse_mutation_from_chrome_payload() {
        let mutation: Mutation = serde_json::from_value(json!({
            "type": "batchUpdateProps",
            "nodeIds": ["h1"],
            "props": { "text": "Hello" }
        }))
        .unwrap();

        let tree = mutation.apply(&page(), &mut ids());
        assert_eq!(tree.find("h1").unwrap().props["text"], json!("Hello"));
    }

    #[test]
    fn test_insert_clamps_index() {
        let tree = insert(&page(), Some("main"), Node::new("p3", "text"), 99);
        assert_eq!(child_ids(&tree, "main"), vec!["h1", "p1", "p2", "p3"]);
    }

    #[test]
    fn test_insert_unknown_parent_falls_back_to_root() {
        let tree = insert(&page(), Some("ghost"), Node::new("banner", "banner"), 0);
        assert_eq!(root_ids(&tree)[0], "banner");
    }

    #[test]
    fn test_insert_shares_untouched_subtrees() {
        let before = page();
        let after = insert(&before, Some("main"), Node::new("p3", "text"), 0);

        assert!(Arc::ptr_eq(&before.roots()[0], &after.roots()[0]));
        assert!(Arc::ptr_eq(&before.roots()[2], &after.roots()[2]));
        assert!(!Arc::ptr_eq(&before.roots()[1], &after.roots()[1]));
        assert!(Arc::ptr_eq(
            &before.roots()[1].children[0],
            &after.roots()[1].children[1]
        ));
        // input untouched
        assert_eq!(child_ids(&before, "main"), vec!["h1", "p1", "p2"]);
    }

    #[test]
    fn test_insert_with_colliding_ids_is_reidentified() {
        let tree = Mutation::Insert {
            parent_id: None,
            index: 0,
            node: Node::new("nav", "nav"),
        }
        .apply(&page(), &mut ids());

        assert!(tree.has_unique_ids());
        assert_eq!(tree.roots().len(), 4);
    }

    #[test]
    fn test_insert_with_repeated_ids_inside_subtree_is_reidentified() {
        let node = Node::new("box", "box")
            .with_child(Node::new("x", "text"))
            .with_child(Node::new("x", "text"));

        let tree = Mutation::Insert {
            parent_id: Some("main".to_string()),
            index: 0,
            node,
        }
        .apply(&page(), &mut ids());

        assert!(tree.has_unique_ids());
        assert_eq!(tree.duplicate_ids(), Vec::<String>::new());
        assert_eq!(child_ids(&tree, "main").len(), 4);
    }

    #[test]
    fn test_remove() {
        let tree = remove(&page(), "main").unwrap();
        assert_eq!(root_ids(&tree), vec!["nav", "footer"]);
        assert!(tree.find("h1").is_none());

        assert_eq!(
            remove(&page(), "ghost"),
            Err(MutationError::NodeNotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_move_between_parents() {
        let tree = move_node(&page(), "nav", Some("main"), 1).unwrap();
        assert_eq!(root_ids(&tree), vec!["main", "footer"]);
        assert_eq!(child_ids(&tree, "main"), vec!["h1", "nav", "p1", "p2"]);
        assert_eq!(tree.node_count(), page().node_count());
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        assert_eq!(
            move_node(&page(), "main", Some("p1"), 0),
            Err(MutationError::CycleDetected)
        );
        assert_eq!(
            move_node(&page(), "main", Some("main"), 0),
            Err(MutationError::CycleDetected)
        );
    }

    #[test]
    fn test_move_to_root() {
        let tree = move_node(&page(), "p2", None, 0).unwrap();
        assert_eq!(root_ids(&tree), vec!["p2", "nav", "main", "footer"]);
    }

    #[test]
    fn test_reorder_siblings() {
        let tree = reorder_siblings(&page(), Some("main"), 0, 2).unwrap();
        assert_eq!(child_ids(&tree, "main"), vec!["p1", "p2", "h1"]);

        let tree = reorder_siblings(&page(), None, 2, 0).unwrap();
        assert_eq!(root_ids(&tree), vec!["footer", "nav", "main"]);
    }

    #[test]
    fn test_reorder_invalid_indices_is_rejected() {
        assert_eq!(
            reorder_siblings(&page(), Some("main"), 0, 3),
            Err(MutationError::IndexOutOfBounds { index: 3, len: 3 })
        );
        assert!(reorder_siblings(&page(), Some("ghost"), 0, 1).is_err());

        let mutation = Mutation::ReorderSiblings {
            parent_id: Some("main".to_string()),
            from_index: 7,
            to_index: 0,
        };
        assert_eq!(mutation.apply(&page(), &mut ids()), page());
    }

    #[test]
    fn test_clone_subtree_assigns_fresh_ids() {
        let tree = Tree::from_nodes(vec![Node::new("card", "card")
            .with_component_node_id("cn-card")
            .with_child(Node::new("title", "heading").with_component_node_id("cn-title"))]);

        let copy = clone_subtree(&tree, "card", &mut ids()).unwrap();
        assert_ne!(copy.id, "card");
        assert_ne!(copy.children[0].id, "title");
        assert_ne!(copy.id, copy.children[0].id);
        assert_eq!(copy.component_node_id.as_deref(), Some("cn-card"));
        assert_eq!(copy.children[0].component_node_id.as_deref(), Some("cn-title"));

        assert!(clone_subtree(&tree, "ghost", &mut ids()).is_none());
    }

    #[test]
    fn test_clone_skips_ids_already_in_tree() {
        // a generator with the same seed would mint "t-1" first
        let tree = Tree::from_nodes(vec![Node::new("t-1", "box").with_child(Node::new("t-2", "text"))]);

        let copy = clone_subtree(&tree, "t-1", &mut ids()).unwrap();
        assert_eq!(copy.id, "t-3");
        assert_eq!(copy.children[0].id, "t-4");
    }

    #[test]
    fn test_duplicate_places_copy_after_original() {
        let tree = duplicate(&page(), "p1", &mut ids()).unwrap();
        let children = child_ids(&tree, "main");
        assert_eq!(children.len(), 4);
        assert_eq!(children[1], "p1");
        assert_ne!(children[2], "p1");
        assert_eq!(children[3], "p2");
        assert!(tree.has_unique_ids());
    }

    #[test]
    fn test_batch_update_props_skips_unknown_ids() {
        let props = json!({ "align": "center" }).as_object().cloned().unwrap();
        let tree = batch_update_props(
            &page(),
            &["h1".to_string(), "ghost".to_string(), "footer".to_string()],
            &props,
        )
        .unwrap();

        let h1 = tree.find("h1").unwrap();
        assert_eq!(h1.props["align"], json!("center"));
        assert_eq!(h1.props["text"], json!("Hi"));
        assert_eq!(tree.find("footer").unwrap().props["align"], json!("center"));
        assert!(tree.find("p1").unwrap().props.is_empty());
    }

    #[test]
    fn test_batch_update_styles_merges_leaf_maps() {
        let styles: NodeStyles = serde_json::from_value(json!({
            "base": { "color": "red", "padding": 8 }
        }))
        .unwrap();
        let tree = batch_update_styles(&page(), &["h1".to_string()], &styles).unwrap();

        let patch: NodeStyles = serde_json::from_value(json!({
            "base": { "color": "blue" },
            "mobile": { "padding": 4 }
        }))
        .unwrap();
        let tree = batch_update_styles(&tree, &["h1".to_string()], &patch).unwrap();

        let styles = tree.find("h1").unwrap().styles.clone().unwrap();
        assert_eq!(styles.base.as_ref().unwrap()["color"], json!("blue"));
        assert_eq!(styles.base.as_ref().unwrap()["padding"], json!(8));
        assert_eq!(styles.mobile.as_ref().unwrap()["padding"], json!(4));
    }

    #[test]
    fn test_wrap_in_container() {
        let tree = wrap_in_container(
            &page(),
            &["p2".to_string(), "h1".to_string()],
            &mut ids(),
        )
        .unwrap();

        let main_children = child_ids(&tree, "main");
        assert_eq!(main_children.len(), 2);
        assert_eq!(main_children[1], "p1");

        let container = tree.find(&main_children[0]).unwrap();
        assert_eq!(container.node_type, CONTAINER_TYPE);
        // original relative order, not selection order
        assert_eq!(child_ids(&tree, &container.id), vec!["h1", "p2"]);
    }

    #[test]
    fn test_wrap_at_root_level() {
        let tree =
            wrap_in_container(&page(), &["main".to_string(), "footer".to_string()], &mut ids())
                .unwrap();
        let roots = root_ids(&tree);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0], "nav");
        assert_eq!(child_ids(&tree, &roots[1]), vec!["main", "footer"]);
    }

    #[test]
    fn test_wrap_preconditions() {
        assert_eq!(
            wrap_in_container(&page(), &["nav".to_string(), "h1".to_string()], &mut ids()),
            Err(MutationError::ParentMismatch)
        );
        assert_eq!(
            wrap_in_container(&page(), &["nav".to_string(), "ghost".to_string()], &mut ids()),
            Err(MutationError::NodeNotFound("ghost".to_string()))
        );
        assert_eq!(
            wrap_in_container(&page(), &[], &mut ids()),
            Err(MutationError::EmptySelection)
        );
    }

    #[test]
    fn test_set_hidden_and_replace_styles() {
        let styles: NodeStyles =
            serde_json::from_value(json!({ "hover": { "opacity": 0.5 } })).unwrap();
        let mut generator = ids();

        let tree = Mutation::SetHidden {
            node_ids: vec!["p1".to_string()],
            hidden: true,
        }
        .apply(&page(), &mut generator);
        let tree = Mutation::ReplaceStyles {
            node_ids: vec!["p1".to_string()],
            styles: styles.clone(),
        }
        .apply(&tree, &mut generator);

        let p1 = tree.find("p1").unwrap();
        assert!(p1.hidden);
        assert_eq!(p1.styles.as_ref(), Some(&styles));

        let cleared = Mutation::ReplaceStyles {
            node_ids: vec!["p1".to_string()],
            styles: NodeStyles::default(),
        }
        .apply(&tree, &mut generator);
        assert!(cleared.find("p1").unwrap().styles.is_none());
    }

    #[test]
    fn test_no_op_safety() {
        let original = page();
        let mut generator = ids();

        for mutation in [
            Mutation::Remove {
                node_id: "ghost".to_string(),
            },
            Mutation::Move {
                node_id: "ghost".to_string(),
                new_parent_id: Some("main".to_string()),
                index: 0,
            },
            Mutation::BatchUpdateProps {
                node_ids: vec!["ghost".to_string()],
                props: Props::new(),
            },
            Mutation::Duplicate {
                node_id: "ghost".to_string(),
            },
        ] {
            assert!(mutation.try_apply(&original, &mut generator).is_err());
            assert_eq!(mutation.apply(&original, &mut generator), original);
        }
    }
}
