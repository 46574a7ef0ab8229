//! External content collections consumed by the binding resolver.

use crate::errors::EvalResult;
use pagecraft_tree::Value;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One collection record: a flat field map
pub type Item = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub key: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Collection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            key: key.into(),
            label: label.into(),
        });
        self
    }

    /// Builder: append an item. Non-object values are ignored.
    pub fn with_item(mut self, item: Value) -> Self {
        if let Value::Object(map) = item {
            self.items.push(map);
        }
        self
    }
}

/// Stable identifier of an item: its `id` field, else `_id`
pub fn item_id(item: &Item) -> Option<String> {
    item.get("id")
        .or_else(|| item.get("_id"))
        .filter(|value| !value.is_null())
        .map(stringify)
}

/// Text form used for sorting, filtering and search
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// All collections available to a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionSet {
    collections: Vec<Collection>,
}

impl CollectionSet {
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

    /// Add a collection, replacing any with the same id
    pub fn insert(&mut self, collection: Collection) {
        match self.collections.iter_mut().find(|c| c.id == collection.id) {
            Some(existing) => *existing = collection,
            None => self.collections.push(collection),
        }
    }

    pub fn with(mut self, collection: Collection) -> Self {
        self.insert(collection);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_tree::json;

    #[test]
    fn test_parse_collection_surface() {
        let set = CollectionSet::from_json(
            r#"[{
                "id": "posts",
                "fields": [{ "key": "h", "label": "Heading" }],
                "items": [{ "id": "1", "h": "A" }, { "_id": 7, "h": "B" }]
            }]"#,
        )
        .unwrap();

        let posts = set.get("posts").unwrap();
        assert_eq!(posts.fields[0].label, "Heading");
        assert_eq!(item_id(&posts.items[0]).as_deref(), Some("1"));
        assert_eq!(item_id(&posts.items[1]).as_deref(), Some("7"));
        assert!(set.get("pages").is_none());
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut set = CollectionSet::new();
        set.insert(Collection::new("posts").with_item(json!({ "id": "1" })));
        set.insert(Collection::new("posts"));
        assert_eq!(set.len(), 1);
        assert!(set.get("posts").unwrap().items.is_empty());
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("Hi")), "Hi");
        assert_eq!(stringify(&json!(12)), "12");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&Value::Null), "");
    }
}
