//! # CMS Binding
//!
//! Projects collection items into block-shaped props.
//!
//! A binding spec lives in a node's props under [`BINDING_KEY`] and is plain
//! data, so it can be resolved without any editor state:
//!
//! ```json
//! {
//!   "collectionId": "posts",
//!   "mode": "list",
//!   "query": { "sort": { "field": "h", "direction": "desc" }, "limit": 2 },
//!   "map": { "title": "h", "desc": "b" }
//! }
//! ```
//!
//! Resolution order is fixed: sort, filter, search, offset, limit, map.
//! An empty result is reported as `None` so the node keeps its authored
//! content instead of rendering nothing.

use crate::collection::{item_id, stringify, CollectionSet, Item};
use pagecraft_tree::{Props, Value};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Reserved prop key holding a node's binding spec
pub const BINDING_KEY: &str = "cmsBinding";

/// Prop receiving the bound list when the catalog has no entry for a type
pub const DEFAULT_LIST_PROP: &str = "items";

/// Prop key carrying an item's stable identifier in list mode
pub const ITEM_ID_KEY: &str = "_itemId";

/// Prop key carrying page information when pagination is active
pub const PAGINATION_KEY: &str = "_pagination";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    #[default]
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// field → substring that must appear in the field (case-insensitive)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filter: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaginationMode {
    #[default]
    None,
    Pages,
    LoadMore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub mode: PaginationMode,
    #[serde(default)]
    pub page_size: usize,
}

impl Pagination {
    /// Number of pages needed for `total` records (at least 1)
    pub fn page_count(&self, total: usize) -> usize {
        match self.mode {
            PaginationMode::None => 1,
            _ if self.page_size == 0 => 1,
            _ => total.div_ceil(self.page_size).max(1),
        }
    }

    /// Records visible on 1-based `page`.
    ///
    /// `pages` shows one page-sized window, `loadMore` shows everything up to
    /// and including that page, `none` shows all records.
    pub fn page<'a, T>(&self, records: &'a [T], page: usize) -> &'a [T] {
        if self.page_size == 0 {
            return records;
        }
        let page = page.max(1);
        let end = page.saturating_mul(self.page_size).min(records.len());

        match self.mode {
            PaginationMode::None => records,
            PaginationMode::Pages => {
                let start = (page - 1).saturating_mul(self.page_size).min(records.len());
                &records[start..end]
            }
            PaginationMode::LoadMore => &records[..end],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSpec {
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub mode: BindingMode,
    #[serde(default)]
    pub query: Query,
    /// block field → collection field
    #[serde(default)]
    pub map: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl BindingSpec {
    /// Read the spec stored under [`BINDING_KEY`]; malformed specs read as absent
    pub fn from_props(props: &Props) -> Option<BindingSpec> {
        let raw = props.get(BINDING_KEY)?;
        match serde_json::from_value(raw.clone()) {
            Ok(spec) => Some(spec),
            Err(e) => {
                debug!(error = %e, "Ignoring malformed binding spec");
                None
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.collection_id.is_empty() && !self.map.is_empty()
    }
}

/// One projected item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundRecord {
    /// Stable identifier of the source item, if it has one
    pub item_id: Option<String>,
    /// Exactly the keys of the binding map
    pub fields: Props,
}

impl BoundRecord {
    /// Fields plus the item identifier, as stored in list props
    pub fn to_value(&self) -> Value {
        let mut fields = self.fields.clone();
        if let Some(id) = &self.item_id {
            fields.insert(ITEM_ID_KEY.to_string(), Value::String(id.clone()));
        }
        Value::Object(fields)
    }
}

/// Which prop of a block type receives the bound list
pub trait BlockCatalog: Send + Sync {
    fn list_prop<'a>(&'a self, node_type: &str) -> &'a str;
}

/// Catalog answering [`DEFAULT_LIST_PROP`] for every block type
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCatalog;

impl BlockCatalog for DefaultCatalog {
    fn list_prop<'a>(&'a self, _node_type: &str) -> &'a str {
        DEFAULT_LIST_PROP
    }
}

/// Catalog backed by an explicit block type → list prop table
#[derive(Debug, Default, Clone)]
pub struct MappedCatalog {
    list_props: BTreeMap<String, String>,
}

impl MappedCatalog {
    pub fn new(list_props: BTreeMap<String, String>) -> Self {
        Self { list_props }
    }
}

impl BlockCatalog for MappedCatalog {
    fn list_prop<'a>(&'a self, node_type: &str) -> &'a str {
        self.list_props
            .get(node_type)
            .map(String::as_str)
            .unwrap_or(DEFAULT_LIST_PROP)
    }
}

/// Resolve `spec` against `collections` into ordered mapped records.
///
/// Returns `None` when the spec is incomplete, the collection is unknown, or
/// no item survives the query.
pub fn resolve_binding(collections: &CollectionSet, spec: &BindingSpec) -> Option<Vec<BoundRecord>> {
    if !spec.is_complete() {
        return None;
    }
    let Some(collection) = collections.get(&spec.collection_id) else {
        debug!(collection_id = %spec.collection_id, "Binding targets unknown collection");
        return None;
    };

    let query = &spec.query;
    let mut items: Vec<&Item> = collection.items.iter().collect();

    if let Some(sort) = &query.sort {
        items.sort_by(|a, b| {
            let ordering = compare_field(a, b, &sort.field);
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    for (field, needle) in &query.filter {
        let needle = stringify(needle).to_lowercase();
        items.retain(|item| field_text(item, field).to_lowercase().contains(&needle));
    }

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        items.retain(|item| {
            item.values()
                .any(|value| stringify(value).to_lowercase().contains(&needle))
        });
    }

    if let Some(offset) = query.offset.filter(|n| *n > 0) {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX).min(items.len());
        items.drain(..offset);
    }
    if let Some(limit) = query.limit.filter(|n| *n > 0) {
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    let records: Vec<BoundRecord> = items
        .into_iter()
        .map(|item| map_item(item, &spec.map))
        .collect();

    debug!(
        collection_id = %spec.collection_id,
        records = records.len(),
        "Resolved binding"
    );

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

/// Apply `spec` to a node's props, showing the first page when paginated.
///
/// See [`bind_page`].
pub fn bind_props(
    props: &Props,
    collections: &CollectionSet,
    spec: &BindingSpec,
    list_prop: &str,
) -> Option<Props> {
    bind_page(props, collections, spec, list_prop, 1)
}

/// Apply `spec` to a node's props.
///
/// Detail mode merges the first record over the existing props (bound fields
/// win). List mode stores the records under `list_prop`, restricted to
/// `page` when the spec is paginated. `None` means the caller keeps the
/// authored props.
pub fn bind_page(
    props: &Props,
    collections: &CollectionSet,
    spec: &BindingSpec,
    list_prop: &str,
    page: usize,
) -> Option<Props> {
    let records = resolve_binding(collections, spec)?;
    let mut bound = props.clone();

    match spec.mode {
        BindingMode::Detail => {
            let first = records.first()?;
            for (key, value) in &first.fields {
                bound.insert(key.clone(), value.clone());
            }
        }
        BindingMode::List => {
            let pagination = spec.pagination.unwrap_or_default();
            let visible = pagination.page(&records, page);

            bound.insert(
                list_prop.to_string(),
                Value::Array(visible.iter().map(BoundRecord::to_value).collect()),
            );

            if pagination.mode != PaginationMode::None {
                bound.insert(
                    PAGINATION_KEY.to_string(),
                    serde_json::json!({
                        "page": page.max(1),
                        "pageCount": pagination.page_count(records.len()),
                        "total": records.len(),
                    }),
                );
            }
        }
    }

    Some(bound)
}

fn field_text(item: &Item, field: &str) -> String {
    item.get(field).map(stringify).unwrap_or_default()
}

fn compare_field(a: &Item, b: &Item, field: &str) -> Ordering {
    field_text(a, field).cmp(&field_text(b, field))
}

fn map_item(item: &Item, map: &BTreeMap<String, String>) -> BoundRecord {
    let fields = map
        .iter()
        .map(|(block_field, source_field)| {
            let value = item
                .get(source_field)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
            (block_field.clone(), value)
        })
        .collect();

    BoundRecord {
        item_id: item_id(item),
        fields,
    }
}
