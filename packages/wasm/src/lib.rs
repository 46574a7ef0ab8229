use pagecraft_editor::{Document, EditSession, Mutation};
use pagecraft_evaluator::{
    resolve_binding, resolve_styles, BindingSpec, CollectionSet, ComponentLibrary, Evaluator,
};
use pagecraft_tree::{Breakpoint, IdGenerator, InteractionState, Node, NodeStyles, Props, Tree};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, e: impl Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, e))
}

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error(&format!("Invalid {}", what), e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error("Serialization error", e))
}

fn parse_breakpoint(breakpoint: &str) -> Result<Breakpoint, JsValue> {
    breakpoint.parse().map_err(|e: String| JsValue::from_str(&e))
}

/// Editing surface for one open page
#[wasm_bindgen]
pub struct EditorHandle {
    session: EditSession,
    evaluator: Evaluator,
    component_ids: IdGenerator,
}

#[wasm_bindgen]
impl EditorHandle {
    /// Open a page from its serialized tree
    #[wasm_bindgen(constructor)]
    pub fn new(key: &str, tree_json: &str) -> Result<EditorHandle, JsValue> {
        let document =
            Document::from_json(key, tree_json).map_err(|e| js_error("Invalid page", e))?;
        Ok(Self::from_document(key, document))
    }

    /// Empty page
    #[wasm_bindgen(js_name = empty)]
    pub fn empty(key: &str) -> EditorHandle {
        Self::from_document(key, Document::new(key, Tree::new()))
    }

    #[wasm_bindgen(js_name = loadCollections)]
    pub fn load_collections(&mut self, json: &str) -> Result<(), JsValue> {
        let collections: CollectionSet = from_json(json, "collections")?;
        self.evaluator = std::mem::take(&mut self.evaluator).with_collections(collections);
        Ok(())
    }

    #[wasm_bindgen(js_name = loadComponents)]
    pub fn load_components(&mut self, json: &str) -> Result<(), JsValue> {
        let components: ComponentLibrary = from_json(json, "components")?;
        self.evaluator = std::mem::take(&mut self.evaluator).with_components(components);
        Ok(())
    }

    /// Replace the page; history is discarded
    #[wasm_bindgen(js_name = loadTree)]
    pub fn load_tree(&mut self, tree_json: &str) -> Result<(), JsValue> {
        self.session
            .document
            .load_tree_json(tree_json)
            .map_err(|e| js_error("Invalid page", e))?;
        self.session.clear_selection();
        Ok(())
    }

    #[wasm_bindgen(js_name = treeJson)]
    pub fn tree_json(&self) -> Result<String, JsValue> {
        to_json(self.session.tree())
    }

    #[wasm_bindgen(getter)]
    pub fn version(&self) -> u64 {
        self.session.document.version
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.session.document.is_dirty()
    }

    #[wasm_bindgen(js_name = markSaved)]
    pub fn mark_saved(&mut self) {
        self.session.document.mark_saved();
    }

    /// Apply a serialized mutation; false when it was a no-op
    pub fn apply(&mut self, mutation_json: &str) -> Result<bool, JsValue> {
        let mutation: Mutation = from_json(mutation_json, "mutation")?;
        Ok(self.session.apply(mutation).applied)
    }

    pub fn insert(
        &mut self,
        parent_id: Option<String>,
        node_json: &str,
        index: usize,
    ) -> Result<bool, JsValue> {
        let node: Node = from_json(node_json, "node")?;
        Ok(self.session.insert(parent_id.as_deref(), node, index).applied)
    }

    pub fn remove(&mut self, node_id: &str) -> bool {
        self.session.remove(node_id).applied
    }

    #[wasm_bindgen(js_name = moveNode)]
    pub fn move_node(&mut self, node_id: &str, new_parent_id: Option<String>, index: usize) -> bool {
        self.session
            .move_node(node_id, new_parent_id.as_deref(), index)
            .applied
    }

    pub fn reorder(&mut self, parent_id: Option<String>, from_index: usize, to_index: usize) -> bool {
        self.session
            .reorder(parent_id.as_deref(), from_index, to_index)
            .applied
    }

    /// Duplicate a node; returns the copy's id
    #[wasm_bindgen(js_name = cloneNode)]
    pub fn clone_node(&mut self, node_id: &str) -> Option<String> {
        self.session.clone_node(node_id)
    }

    #[wasm_bindgen(js_name = batchUpdateProps)]
    pub fn batch_update_props(&mut self, ids_json: &str, props_json: &str) -> Result<bool, JsValue> {
        let ids: Vec<String> = from_json(ids_json, "node ids")?;
        let props: Props = from_json(props_json, "props")?;
        Ok(self.session.batch_update_props(&ids, props).applied)
    }

    #[wasm_bindgen(js_name = batchUpdateStyles)]
    pub fn batch_update_styles(
        &mut self,
        ids_json: &str,
        styles_json: &str,
    ) -> Result<bool, JsValue> {
        let ids: Vec<String> = from_json(ids_json, "node ids")?;
        let styles: NodeStyles = from_json(styles_json, "styles")?;
        Ok(self.session.batch_update_styles(&ids, styles).applied)
    }

    #[wasm_bindgen(js_name = setHidden)]
    pub fn set_hidden(&mut self, ids_json: &str, hidden: bool) -> Result<bool, JsValue> {
        let ids: Vec<String> = from_json(ids_json, "node ids")?;
        Ok(self.session.set_hidden(&ids, hidden).applied)
    }

    /// Wrap sibling nodes; returns the container id
    #[wasm_bindgen(js_name = wrapInContainer)]
    pub fn wrap_in_container(&mut self, ids_json: &str) -> Result<Option<String>, JsValue> {
        let ids: Vec<String> = from_json(ids_json, "node ids")?;
        Ok(self.session.wrap_in_container(&ids))
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.document.history().can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.document.history().can_redo()
    }

    #[wasm_bindgen(js_name = resetHistory)]
    pub fn reset_history(&mut self) {
        self.session.reset_history();
    }

    pub fn copy(&mut self, node_id: &str) -> bool {
        self.session.copy(node_id)
    }

    /// Paste the clipboard with fresh ids; returns the new node's id
    pub fn paste(&mut self, parent_id: Option<String>, index: usize) -> Option<String> {
        self.session.paste(parent_id.as_deref(), index)
    }

    #[wasm_bindgen(js_name = copyStyles)]
    pub fn copy_styles(&mut self, node_id: &str) -> bool {
        self.session.copy_styles(node_id)
    }

    #[wasm_bindgen(js_name = pasteStyles)]
    pub fn paste_styles(&mut self, ids_json: &str) -> Result<bool, JsValue> {
        let ids: Vec<String> = from_json(ids_json, "node ids")?;
        Ok(self
            .session
            .paste_styles(&ids)
            .is_some_and(|result| result.applied))
    }

    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&mut self, ids_json: &str) -> Result<(), JsValue> {
        let ids: Vec<String> = from_json(ids_json, "node ids")?;
        self.session.select(ids);
        Ok(())
    }

    pub fn selection(&self) -> Result<String, JsValue> {
        to_json(&self.session.selected_nodes)
    }

    /// Register a node's subtree as a component; returns the component id
    #[wasm_bindgen(js_name = createComponent)]
    pub fn create_component(&mut self, name: &str, node_id: &str) -> Option<String> {
        let source = self.session.tree().find(node_id)?.clone();
        Some(self.evaluator.components_mut().create_component(
            name,
            &source,
            &mut self.component_ids,
        ))
    }

    /// Render projection of the page at `breakpoint`
    pub fn render(&self, breakpoint: &str) -> Result<String, JsValue> {
        let breakpoint = parse_breakpoint(breakpoint)?;
        to_json(&self.evaluator.evaluate(self.session.tree(), breakpoint))
    }

    /// Effective styles of one node
    #[wasm_bindgen(js_name = resolveStyles)]
    pub fn resolve_styles(
        &self,
        node_id: &str,
        breakpoint: &str,
        state: Option<String>,
    ) -> Result<Option<String>, JsValue> {
        let breakpoint = parse_breakpoint(breakpoint)?;
        let state = state
            .map(|s| s.parse::<InteractionState>())
            .transpose()
            .map_err(|e| JsValue::from_str(&e))?;

        match self.session.tree().find(node_id) {
            Some(node) => to_json(&resolve_styles(node, breakpoint, state)).map(Some),
            None => Ok(None),
        }
    }
}

impl EditorHandle {
    fn from_document(key: &str, document: Document) -> Self {
        Self {
            session: EditSession::new(key, document),
            evaluator: Evaluator::new(),
            component_ids: IdGenerator::new(&format!("{}#components", key)),
        }
    }
}

/// Resolve a binding spec against collections; `null` when nothing matches
#[wasm_bindgen(js_name = resolveBinding)]
pub fn resolve_binding_js(collections_json: &str, binding_json: &str) -> Result<String, JsValue> {
    let collections: CollectionSet = from_json(collections_json, "collections")?;
    let spec: BindingSpec = from_json(binding_json, "binding")?;
    to_json(&resolve_binding(&collections, &spec))
}

/// Get document ID for a page key
#[wasm_bindgen(js_name = getDocumentId)]
pub fn get_document_id_js(key: &str) -> String {
    pagecraft_tree::get_document_id(key)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn test_invalid_page_is_an_error() {
        assert!(EditorHandle::new("broken", "{").is_err());
    }

    #[wasm_bindgen_test]
    fn test_load_tree_with_repeated_ids_is_an_error() {
        let mut handle = EditorHandle::empty("blank");
        let page = r#"[{ "id": "a", "type": "text" }, { "id": "a", "type": "text" }]"#;
        assert!(handle.load_tree(page).is_err());
        assert_eq!(handle.tree_json().unwrap(), "[]");
    }

    #[wasm_bindgen_test]
    fn test_invalid_breakpoint_is_an_error() {
        let handle = EditorHandle::empty("blank");
        assert!(handle.render("watch").is_err());
    }
}
