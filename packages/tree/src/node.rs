use crate::styles::{NodeStyles, Variable};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Open prop bag. Its shape is defined per node type by the block catalog.
pub type Props = serde_json::Map<String, Value>;

/// A single block in the page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default)]
    pub props: Props,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<Node>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<NodeStyles>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    /// Identity inside a component source subtree, kept across clones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_node_id: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            props: Props::new(),
            children: Vec::new(),
            styles: None,
            variables: Vec::new(),
            hidden: false,
            component_node_id: None,
        }
    }

    /// Builder: replace props with the entries of a JSON object.
    /// Non-object values leave props empty.
    pub fn with_props(mut self, props: Value) -> Self {
        self.props = match props {
            Value::Object(map) => map,
            _ => Props::new(),
        };
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children.into_iter().map(Arc::new));
        self
    }

    pub fn with_styles(mut self, styles: NodeStyles) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_component_node_id(mut self, component_node_id: impl Into<String>) -> Self {
        self.component_node_id = Some(component_node_id.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Shallow copy with a different child list; props and styles are copied,
    /// grandchildren stay shared.
    pub fn with_replaced_children(&self, children: Vec<Arc<Node>>) -> Node {
        Node {
            id: self.id.clone(),
            node_type: self.node_type.clone(),
            props: self.props.clone(),
            children,
            styles: self.styles.clone(),
            variables: self.variables.clone(),
            hidden: self.hidden,
            component_node_id: self.component_node_id.clone(),
        }
    }

    /// True if this node or any descendant has `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|child| child.contains_id(id))
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.subtree_len())
            .sum::<usize>()
    }
}

/// A page: the ordered list of root nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    roots: Vec<Arc<Node>>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            roots: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build from an already shared root list
    pub fn from_shared(roots: Vec<Arc<Node>>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Arc<Node>] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<Arc<Node>> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|root| root.subtree_len()).sum()
    }

    /// True when both trees share the same root allocations
    pub fn ptr_eq(&self, other: &Tree) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(other.roots.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Tree {
        Tree::from_nodes(vec![
            Node::new("hero", "hero").with_props(json!({ "title": "Welcome" })),
            Node::new("section", "section")
                .with_child(Node::new("heading", "heading"))
                .with_child(Node::new("features", "features").hidden(true)),
        ])
    }

    #[test]
    fn test_tree_roundtrips_through_json() {
        let tree = sample();
        let json = serde_json::to_string(&tree).unwrap();
        let back: Tree = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }

    #[test]
    fn test_serialized_shape_is_plain_records() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["type"], json!("hero"));
        assert_eq!(value[0]["props"]["title"], json!("Welcome"));
        assert!(value[0].get("children").is_none());
        assert_eq!(value[1]["children"][1]["hidden"], json!(true));
        assert!(value[1]["children"][0].get("hidden").is_none());
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let tree: Tree = serde_json::from_value(json!([
            { "id": "a", "type": "text", "componentNodeId": "cn-1" }
        ]))
        .unwrap();

        let node = &tree.roots()[0];
        assert!(node.props.is_empty());
        assert!(node.children.is_empty());
        assert_eq!(node.component_node_id.as_deref(), Some("cn-1"));
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample().node_count(), 4);
    }
}
