//! # Page Evaluation
//!
//! Turns a page [`Tree`] into the resolved node tree handed to a renderer:
//!
//! 1. hidden nodes are dropped
//! 2. component instances are expanded ([`InstanceResolver`])
//! 3. bound nodes get their props from the CMS ([`bind_props`])
//! 4. styles are resolved for the target breakpoint ([`resolve_all_states`])
//!
//! Nodes expanded from an instance are re-identified as
//! `"<instance id>/<source id>"` so two instances of one component never
//! produce colliding ids. The expanded root takes the instance's own id, so
//! a click on the canvas still selects the instance node. Instances left
//! unexpanded by the resolver (unknown component, nesting limit) render as
//! plain nodes.

use crate::binding::{bind_props, BindingSpec, BlockCatalog, DefaultCatalog};
use crate::cascade::{resolve_all_states, ResolvedStyles};
use crate::collection::CollectionSet;
use crate::instancing::{is_instance, ComponentLibrary, InstanceResolver, COMPONENT_ID_KEY};
use pagecraft_tree::{Breakpoint, Node, Props, Tree};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A node ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNode {
    pub id: String,
    /// Id of the node in the page or component source it came from
    pub source_id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub props: Props,
    pub styles: ResolvedStyles,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedNode>,
    /// Props were produced by a CMS binding
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bound: bool,
    /// Component id when this node is the root of an expanded instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_of: Option<String>,
}

/// Resolves pages against collections and components
pub struct Evaluator {
    collections: CollectionSet,
    components: ComponentLibrary,
    catalog: Box<dyn BlockCatalog>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            collections: CollectionSet::new(),
            components: ComponentLibrary::new(),
            catalog: Box::new(DefaultCatalog),
        }
    }

    pub fn with_collections(mut self, collections: CollectionSet) -> Self {
        self.collections = collections;
        self
    }

    pub fn with_components(mut self, components: ComponentLibrary) -> Self {
        self.components = components;
        self
    }

    pub fn with_catalog(mut self, catalog: impl BlockCatalog + 'static) -> Self {
        self.catalog = Box::new(catalog);
        self
    }

    pub fn collections(&self) -> &CollectionSet {
        &self.collections
    }

    pub fn components(&self) -> &ComponentLibrary {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentLibrary {
        &mut self.components
    }

    /// Evaluate every visible node of `tree` at `breakpoint`
    #[instrument(skip(self, tree), fields(roots = tree.roots().len()))]
    pub fn evaluate(&self, tree: &Tree, breakpoint: Breakpoint) -> Vec<ResolvedNode> {
        info!(%breakpoint, "Starting page evaluation");

        let nodes: Vec<ResolvedNode> = tree
            .roots()
            .iter()
            .filter_map(|node| self.evaluate_node(node, breakpoint, None))
            .collect();

        info!(nodes = nodes.len(), "Page evaluation complete");
        nodes
    }

    /// Props of a single node after binding, or its authored props
    pub fn resolve_props(&self, node: &Node) -> (Props, bool) {
        let Some(spec) = BindingSpec::from_props(&node.props) else {
            return (node.props.clone(), false);
        };

        let list_prop = self.catalog.list_prop(&node.node_type);
        match bind_props(&node.props, &self.collections, &spec, list_prop) {
            Some(props) => (props, true),
            None => {
                debug!(node_id = %node.id, "Binding produced nothing, keeping authored props");
                (node.props.clone(), false)
            }
        }
    }

    fn evaluate_node(
        &self,
        node: &Node,
        breakpoint: Breakpoint,
        scope: Option<&str>,
    ) -> Option<ResolvedNode> {
        if node.hidden {
            return None;
        }

        let id = scoped_id(scope, &node.id);

        // Inside an expansion the resolver has already expanded every
        // instance it could; what is left stays a plain node.
        if scope.is_none() && is_instance(node) {
            if let Some(expanded) = InstanceResolver::new(&self.components).resolve(node) {
                if expanded.hidden {
                    return None;
                }
                let mut resolved = self.resolve_single(&expanded, breakpoint, &id, Some(id.as_str()));
                resolved.instance_of = node.prop_str(COMPONENT_ID_KEY).map(str::to_string);
                return Some(resolved);
            }
        }

        Some(self.resolve_single(node, breakpoint, &id, scope))
    }

    fn resolve_single(
        &self,
        node: &Node,
        breakpoint: Breakpoint,
        id: &str,
        child_scope: Option<&str>,
    ) -> ResolvedNode {
        let (props, bound) = self.resolve_props(node);

        let children = node
            .children
            .iter()
            .filter_map(|child| self.evaluate_node(child, breakpoint, child_scope))
            .collect();

        ResolvedNode {
            id: id.to_string(),
            source_id: node.id.clone(),
            node_type: node.node_type.clone(),
            props,
            styles: resolve_all_states(node, breakpoint),
            children,
            bound,
            instance_of: None,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn scoped_id(scope: Option<&str>, id: &str) -> String {
    match scope {
        Some(scope) => format!("{}/{}", scope, id),
        None => id.to_string(),
    }
}
