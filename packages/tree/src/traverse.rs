//! Read-only traversal over a [`Tree`].
//!
//! All lookups are recursive linear scans. A stale id (for example a
//! selection whose node was just removed) is an expected input and yields an
//! empty result.

use crate::node::{Node, Tree};
use std::collections::HashSet;
use std::sync::Arc;

impl Tree {
    /// Find a node anywhere in the tree
    pub fn find(&self, id: &str) -> Option<&Node> {
        find_in(self.roots(), id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Ancestors of `id` from the root down, ending with the node itself.
    /// Empty if `id` is not in the tree.
    pub fn path(&self, id: &str) -> Vec<&Node> {
        let mut path = Vec::new();
        if path_in(self.roots(), id, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    /// The child list containing `id` (the root list for root nodes)
    pub fn siblings(&self, id: &str) -> Option<&[Arc<Node>]> {
        match self.parent_of(id)? {
            Some(parent) => Some(parent.children.as_slice()),
            None => Some(self.roots()),
        }
    }

    /// Parent lookup.
    ///
    /// Outer `None`: `id` not found. `Some(None)`: `id` is a root node.
    pub fn parent_of(&self, id: &str) -> Option<Option<&Node>> {
        if self.roots().iter().any(|root| root.id == id) {
            return Some(None);
        }
        parent_in(self.roots(), id).map(Some)
    }

    /// Position of `id` within its sibling list
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.siblings(id)?.iter().position(|node| node.id == id)
    }

    /// Pre-order walk with depth (roots are depth 0)
    pub fn walk<F: FnMut(&Node, usize)>(&self, mut visit: F) {
        fn walk_nodes<F: FnMut(&Node, usize)>(nodes: &[Arc<Node>], depth: usize, visit: &mut F) {
            for node in nodes {
                visit(node, depth);
                walk_nodes(&node.children, depth + 1, visit);
            }
        }

        walk_nodes(self.roots(), 0, &mut visit);
    }

    /// Every id in the tree
    pub fn collect_ids(&self) -> HashSet<String> {
        let mut ids = HashSet::new();
        self.walk(|node, _| {
            ids.insert(node.id.clone());
        });
        ids
    }

    /// Ids appearing more than once, in first-seen order
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        self.walk(|node, _| {
            if !seen.insert(node.id.clone()) && !duplicates.contains(&node.id) {
                duplicates.push(node.id.clone());
            }
        });
        duplicates
    }

    pub fn has_unique_ids(&self) -> bool {
        self.duplicate_ids().is_empty()
    }
}

fn find_in<'a>(nodes: &'a [Arc<Node>], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn path_in<'a>(nodes: &'a [Arc<Node>], id: &str, path: &mut Vec<&'a Node>) -> bool {
    for node in nodes {
        path.push(node);
        if node.id == id || path_in(&node.children, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn parent_in<'a>(nodes: &'a [Arc<Node>], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.children.iter().any(|child| child.id == id) {
            return Some(node);
        }
        if let Some(parent) = parent_in(&node.children, id) {
            return Some(parent);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use crate::{Node, Tree};

    fn sample() -> Tree {
        Tree::from_nodes(vec![
            Node::new("nav", "nav"),
            Node::new("main", "section")
                .with_child(
                    Node::new("grid", "features")
                        .with_child(Node::new("card-1", "card"))
                        .with_child(Node::new("card-2", "card")),
                )
                .with_child(Node::new("cta", "cta")),
        ])
    }

    #[test]
    fn test_find() {
        let tree = sample();
        assert_eq!(tree.find("card-2").map(|n| n.node_type.as_str()), Some("card"));
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_path_ends_at_target() {
        let tree = sample();
        let ids: Vec<&str> = tree.path("card-1").into_iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["main", "grid", "card-1"]);
        assert!(tree.path("missing").is_empty());
    }

    #[test]
    fn test_siblings() {
        let tree = sample();

        let ids: Vec<&str> = tree
            .siblings("card-1")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["card-1", "card-2"]);

        assert_eq!(tree.siblings("nav").unwrap().len(), 2);
        assert!(tree.siblings("missing").is_none());
    }

    #[test]
    fn test_parent_of_and_index_of() {
        let tree = sample();
        assert_eq!(tree.parent_of("cta").unwrap().unwrap().id, "main");
        assert!(tree.parent_of("nav").unwrap().is_none());
        assert!(tree.parent_of("missing").is_none());
        assert_eq!(tree.index_of("cta"), Some(1));
    }

    #[test]
    fn test_duplicate_ids() {
        let tree = Tree::from_nodes(vec![
            Node::new("a", "text"),
            Node::new("b", "box").with_child(Node::new("a", "text")),
        ]);
        assert_eq!(tree.duplicate_ids(), vec!["a".to_string()]);
        assert!(sample().has_unique_ids());
    }
}
