//! # Style Cascade
//!
//! Resolves a node's `styles` into one flat property map for a device tier
//! and, optionally, an interaction state.
//!
//! ```text
//! base ──▶ tablet ──▶ mobile ──▶ state (hover/press/focus) ──▶ variables
//! ```
//!
//! Each layer is merged key by key over the previous one. Breakpoint layers
//! stop at the requested tier: `tablet` applies base + tablet, `mobile`
//! applies base + tablet + mobile. The state layer is only merged when a
//! state is requested. Variables with a `bindTo` target are written last and
//! win over everything the cascade produced for that key.

use pagecraft_tree::{Breakpoint, InteractionState, Node, StyleMap, Value};
use serde::Serialize;
use std::collections::BTreeMap;

/// Resolve the styles of `node` at `breakpoint`, optionally under `state`
pub fn resolve_styles(
    node: &Node,
    breakpoint: Breakpoint,
    state: Option<InteractionState>,
) -> StyleMap {
    let mut resolved = StyleMap::new();

    if let Some(styles) = &node.styles {
        merge_into(&mut resolved, styles.base.as_ref());

        if matches!(breakpoint, Breakpoint::Tablet | Breakpoint::Mobile) {
            merge_into(&mut resolved, styles.tablet.as_ref());
        }
        if breakpoint == Breakpoint::Mobile {
            merge_into(&mut resolved, styles.mobile.as_ref());
        }

        if let Some(state) = state {
            merge_into(&mut resolved, styles.state(state));
        }
    }

    apply_variables(&mut resolved, node, breakpoint);
    resolved
}

/// Resting styles plus one fully-resolved map per state the node defines
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedStyles {
    pub resting: StyleMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub states: BTreeMap<InteractionState, StyleMap>,
}

/// Resolve the resting map and every interaction state present on the node
pub fn resolve_all_states(node: &Node, breakpoint: Breakpoint) -> ResolvedStyles {
    let mut states = BTreeMap::new();

    if let Some(styles) = &node.styles {
        for state in InteractionState::ALL {
            if styles.state(state).is_some_and(|map| !map.is_empty()) {
                states.insert(state, resolve_styles(node, breakpoint, Some(state)));
            }
        }
    }

    ResolvedStyles {
        resting: resolve_styles(node, breakpoint, None),
        states,
    }
}

fn merge_into(target: &mut StyleMap, layer: Option<&StyleMap>) {
    if let Some(layer) = layer {
        for (key, value) in layer {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn apply_variables(target: &mut StyleMap, node: &Node, breakpoint: Breakpoint) {
    for variable in &node.variables {
        let Some(property) = variable.target() else {
            continue;
        };

        let value = variable.value_at(breakpoint);
        if !is_empty_value(value) {
            target.insert(property.to_string(), value.clone());
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
