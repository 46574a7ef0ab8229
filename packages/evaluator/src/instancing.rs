//! Component Instancing
//!
//! Expands a component-instance node into the component's source subtree,
//! applying the instance's overrides.
//!
//! Overrides are a flat map keyed `"<componentNodeId>:<prop>"`. The
//! `componentNodeId` survives cloning, so an override keeps addressing the
//! same source node in every copy of the component.

use crate::errors::EvalResult;
use pagecraft_tree::{IdGenerator, Node, Props, Value};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Node type marking a component instance
pub const COMPONENT_INSTANCE_TYPE: &str = "component-instance";
pub const COMPONENT_ID_KEY: &str = "componentId";
pub const OVERRIDES_KEY: &str = "overrides";
pub const VARIANT_ID_KEY: &str = "_variantId";

/// Nesting limit for instances inside component sources
pub const MAX_INSTANCE_DEPTH: usize = 16;

/// Alternate source subtree of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentVariant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub root: Node,
}

/// Reusable component definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub id: String,
    pub name: String,
    pub root: Node,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ComponentVariant>,
}

impl ComponentDef {
    /// Source root for `variant_id`, falling back to the default root
    pub fn source(&self, variant_id: Option<&str>) -> &Node {
        variant_id
            .and_then(|id| self.variants.iter().find(|variant| variant.id == id))
            .map(|variant| &variant.root)
            .unwrap_or(&self.root)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentLibrary {
    components: Vec<ComponentDef>,
}

impl ComponentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> EvalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> EvalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Add a component, replacing any with the same id
    pub fn insert(&mut self, component: ComponentDef) {
        match self.components.iter_mut().find(|c| c.id == component.id) {
            Some(existing) => *existing = component,
            None => self.components.push(component),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ComponentDef> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Register `source` as a new component and return its id.
    ///
    /// Every node of the stored copy gets a `componentNodeId` if it does not
    /// already carry one; existing ones are kept so overrides stay valid.
    pub fn create_component(
        &mut self,
        name: impl Into<String>,
        source: &Node,
        ids: &mut IdGenerator,
    ) -> String {
        let id = ids.fresh_id(|candidate| self.get(candidate).is_some());
        let root = assign_component_node_ids(source, ids);

        self.insert(ComponentDef {
            id: id.clone(),
            name: name.into(),
            root,
            variants: Vec::new(),
        });
        id
    }
}

fn assign_component_node_ids(node: &Node, ids: &mut IdGenerator) -> Node {
    let children = node
        .children
        .iter()
        .map(|child| Arc::new(assign_component_node_ids(child, ids)))
        .collect();

    let mut copy = node.with_replaced_children(children);
    if copy.component_node_id.is_none() {
        copy.component_node_id = Some(ids.new_id());
    }
    copy
}

/// True for nodes the instance resolver expands
pub fn is_instance(node: &Node) -> bool {
    node.node_type == COMPONENT_INSTANCE_TYPE && node.prop_str(COMPONENT_ID_KEY).is_some()
}

/// New instance node of `component_id` with no overrides
pub fn instance_node(id: impl Into<String>, component_id: &str) -> Node {
    Node::new(id, COMPONENT_INSTANCE_TYPE)
        .with_prop(COMPONENT_ID_KEY, Value::String(component_id.to_string()))
        .with_prop(OVERRIDES_KEY, Value::Object(Props::new()))
}

/// Expands instances against a component library
pub struct InstanceResolver<'a> {
    library: &'a ComponentLibrary,
}

impl<'a> InstanceResolver<'a> {
    pub fn new(library: &'a ComponentLibrary) -> Self {
        Self { library }
    }

    /// Resolved subtree for `instance`, or `None` if it is not an instance or
    /// names an unknown component
    pub fn resolve(&self, instance: &Node) -> Option<Node> {
        self.resolve_at(instance, 0)
    }

    fn resolve_at(&self, instance: &Node, depth: usize) -> Option<Node> {
        if depth >= MAX_INSTANCE_DEPTH {
            warn!(node_id = %instance.id, depth, "Instance nesting too deep, not expanding");
            return None;
        }

        let component_id = instance.prop_str(COMPONENT_ID_KEY)?;
        let Some(component) = self.library.get(component_id) else {
            debug!(node_id = %instance.id, component_id, "Instance of unknown component");
            return None;
        };

        let variant_id = instance.prop_str(VARIANT_ID_KEY);
        let overrides = instance.prop(OVERRIDES_KEY).and_then(Value::as_object);

        debug!(
            node_id = %instance.id,
            component_id,
            variant_id = ?variant_id,
            "Resolving component instance"
        );

        Some(self.apply_overrides(component.source(variant_id), overrides, depth))
    }

    fn apply_overrides(&self, node: &Node, overrides: Option<&Props>, depth: usize) -> Node {
        let mut resolved = node.clone();

        if let (Some(component_node_id), Some(overrides)) = (&node.component_node_id, overrides) {
            let prefix = format!("{}:", component_node_id);
            for (key, value) in overrides {
                if let Some(prop) = key.strip_prefix(&prefix).filter(|p| !p.is_empty()) {
                    resolved.props.insert(prop.to_string(), value.clone());
                }
            }
        }

        if is_instance(&resolved) {
            if let Some(expanded) = self.resolve_at(&resolved, depth + 1) {
                return expanded;
            }
        }

        resolved.children = node
            .children
            .iter()
            .map(|child| Arc::new(self.apply_overrides(child, overrides, depth)))
            .collect();
        resolved
    }
}
