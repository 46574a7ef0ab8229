//! Per-breakpoint and per-state style maps, and node variables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Flat visual-property map (`"color" -> "red"`, `"padding" -> 16`)
pub type StyleMap = serde_json::Map<String, Value>;

/// Device-width tier. `Base` is the desktop/default tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Base,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Base => "base",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" | "desktop" => Ok(Breakpoint::Base),
            "tablet" => Ok(Breakpoint::Tablet),
            "mobile" => Ok(Breakpoint::Mobile),
            other => Err(format!(
                "Invalid breakpoint: {}. Use: base, tablet, or mobile",
                other
            )),
        }
    }
}

/// Interaction state whose styles apply only while the state is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    Hover,
    Press,
    Focus,
}

impl InteractionState {
    pub const ALL: [InteractionState; 3] = [
        InteractionState::Hover,
        InteractionState::Press,
        InteractionState::Focus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionState::Hover => "hover",
            InteractionState::Press => "press",
            InteractionState::Focus => "focus",
        }
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hover" => Ok(InteractionState::Hover),
            "press" | "active" => Ok(InteractionState::Press),
            "focus" => Ok(InteractionState::Focus),
            other => Err(format!(
                "Invalid state: {}. Use: hover, press, or focus",
                other
            )),
        }
    }
}

/// Style overrides of a node, keyed by breakpoint and interaction state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub press: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<StyleMap>,
}

impl NodeStyles {
    pub fn breakpoint(&self, breakpoint: Breakpoint) -> Option<&StyleMap> {
        match breakpoint {
            Breakpoint::Base => self.base.as_ref(),
            Breakpoint::Tablet => self.tablet.as_ref(),
            Breakpoint::Mobile => self.mobile.as_ref(),
        }
    }

    pub fn state(&self, state: InteractionState) -> Option<&StyleMap> {
        match state {
            InteractionState::Hover => self.hover.as_ref(),
            InteractionState::Press => self.press.as_ref(),
            InteractionState::Focus => self.focus.as_ref(),
        }
    }

    /// Mutable map for a breakpoint, created empty if missing
    pub fn breakpoint_mut(&mut self, breakpoint: Breakpoint) -> &mut StyleMap {
        match breakpoint {
            Breakpoint::Base => self.base.get_or_insert_with(StyleMap::new),
            Breakpoint::Tablet => self.tablet.get_or_insert_with(StyleMap::new),
            Breakpoint::Mobile => self.mobile.get_or_insert_with(StyleMap::new),
        }
    }

    /// Mutable map for an interaction state, created empty if missing
    pub fn state_mut(&mut self, state: InteractionState) -> &mut StyleMap {
        match state {
            InteractionState::Hover => self.hover.get_or_insert_with(StyleMap::new),
            InteractionState::Press => self.press.get_or_insert_with(StyleMap::new),
            InteractionState::Focus => self.focus.get_or_insert_with(StyleMap::new),
        }
    }

    /// Merge `patch` into these styles.
    ///
    /// Only the breakpoint/state keys present in the patch are touched, and
    /// within each the patch properties are merged over the existing ones
    /// rather than replacing the whole map.
    pub fn merge(&mut self, patch: &NodeStyles) {
        merge_slot(&mut self.base, &patch.base);
        merge_slot(&mut self.tablet, &patch.tablet);
        merge_slot(&mut self.mobile, &patch.mobile);
        merge_slot(&mut self.hover, &patch.hover);
        merge_slot(&mut self.press, &patch.press);
        merge_slot(&mut self.focus, &patch.focus);
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.base,
            &self.tablet,
            &self.mobile,
            &self.hover,
            &self.press,
            &self.focus,
        ]
        .iter()
        .all(|slot| slot.as_ref().map_or(true, |map| map.is_empty()))
    }
}

fn merge_slot(target: &mut Option<StyleMap>, patch: &Option<StyleMap>) {
    if let Some(patch) = patch {
        let target = target.get_or_insert_with(StyleMap::new);
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Named value bound onto a style property, with optional per-breakpoint values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub var_type: String,
    #[serde(default)]
    pub default_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoint_values: Option<BTreeMap<Breakpoint, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_to: Option<String>,
}

impl Variable {
    pub fn new(id: impl Into<String>, var_type: impl Into<String>, default_value: Value) -> Self {
        Self {
            id: id.into(),
            name: None,
            var_type: var_type.into(),
            default_value,
            breakpoint_values: None,
            bind_to: None,
        }
    }

    pub fn bound_to(mut self, property: impl Into<String>) -> Self {
        self.bind_to = Some(property.into());
        self
    }

    pub fn with_breakpoint_value(mut self, breakpoint: Breakpoint, value: Value) -> Self {
        self.breakpoint_values
            .get_or_insert_with(BTreeMap::new)
            .insert(breakpoint, value);
        self
    }

    /// Effective value at `breakpoint`.
    ///
    /// Non-desktop breakpoints use their own override when one exists; there
    /// is no tablet-to-mobile inheritance for variables.
    pub fn value_at(&self, breakpoint: Breakpoint) -> &Value {
        if breakpoint != Breakpoint::Base {
            if let Some(value) = self
                .breakpoint_values
                .as_ref()
                .and_then(|values| values.get(&breakpoint))
            {
                return value;
            }
        }
        &self.default_value
    }

    /// Target property, if one is set and non-empty
    pub fn target(&self) -> Option<&str> {
        self.bind_to.as_deref().filter(|target| !target.is_empty())
    }
}
