use anyhow::Context;
use pagecraft_editor::DEFAULT_HISTORY_CAPACITY;
use pagecraft_evaluator::{CollectionSet, ComponentLibrary, Evaluator, MappedCatalog};
use pagecraft_tree::Breakpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Pagecraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Undo steps kept per document
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Breakpoint used when a command is not given one
    #[serde(default)]
    pub default_breakpoint: Breakpoint,

    /// CMS collections file (JSON array of collections)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<String>,

    /// Component library file (JSON array of components)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<String>,

    /// Block type → prop receiving bound list records
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub list_props: BTreeMap<String, String>,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Evaluator with the configured collections, components and list props
    pub fn evaluator(&self, cwd: &str) -> anyhow::Result<Evaluator> {
        let mut evaluator = Evaluator::new().with_catalog(MappedCatalog::new(self.list_props.clone()));

        if let Some(path) = &self.collections {
            let path = PathBuf::from(cwd).join(path);
            let collections = CollectionSet::load(&path)
                .with_context(|| format!("Cannot load collections from {}", path.display()))?;
            evaluator = evaluator.with_collections(collections);
        }

        if let Some(path) = &self.components {
            let path = PathBuf::from(cwd).join(path);
            let components = ComponentLibrary::load(&path)
                .with_context(|| format!("Cannot load components from {}", path.display()))?;
            evaluator = evaluator.with_components(components);
        }

        Ok(evaluator)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            default_breakpoint: Breakpoint::Base,
            collections: None,
            components: None,
            list_props: BTreeMap::new(),
        }
    }
}
