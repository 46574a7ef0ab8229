//! Mutations as sent by the editor chrome (JSON payloads)

use pagecraft_editor::{Document, Mutation, CONTAINER_TYPE};
use pagecraft_tree::{json, IdGenerator, Node, Tree, Value};

fn parse(payload: Value) -> Mutation {
    serde_json::from_value(payload).expect("valid mutation payload")
}

fn document() -> Document {
    Document::new(
        "about",
        Tree::from_nodes(vec![Node::new("section", "section")
            .with_child(Node::new("a", "text"))
            .with_child(Node::new("b", "text"))
            .with_child(Node::new("c", "text"))]),
    )
}

fn children(doc: &Document, id: &str) -> Vec<String> {
    doc.find(id)
        .map(|node| node.children.iter().map(|c| c.id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn test_insert_payload() {
    let mut doc = document();
    let result = doc.apply(parse(json!({
        "type": "insert",
        "parentId": "section",
        "index": 1,
        "node": { "id": "img", "type": "image", "props": { "src": "/cat.png" } }
    })));

    assert!(result.applied);
    assert_eq!(children(&doc, "section"), vec!["a", "img", "b", "c"]);
    assert_eq!(doc.find("img").unwrap().props["src"], json!("/cat.png"));
}

#[test]
fn test_insert_without_parent_goes_to_root() {
    let mut doc = document();
    doc.apply(parse(json!({
        "type": "insert",
        "index": 0,
        "node": { "id": "top", "type": "banner" }
    })));

    assert_eq!(doc.tree().roots()[0].id, "top");
}

#[test]
fn test_move_payload_interprets_index_after_removal() {
    let mut doc = document();
    doc.apply(parse(json!({
        "type": "move",
        "nodeId": "a",
        "newParentId": "section",
        "index": 2
    })));

    assert_eq!(children(&doc, "section"), vec!["b", "c", "a"]);
}

#[test]
fn test_reorder_payload() {
    let mut doc = document();
    doc.apply(parse(json!({
        "type": "reorderSiblings",
        "parentId": "section",
        "fromIndex": 2,
        "toIndex": 0
    })));

    assert_eq!(children(&doc, "section"), vec!["c", "a", "b"]);
}

#[test]
fn test_batch_update_styles_payload() {
    let mut doc = document();
    doc.apply(parse(json!({
        "type": "batchUpdateStyles",
        "nodeIds": ["a", "b"],
        "styles": {
            "base": { "color": "navy" },
            "hover": { "color": "blue" }
        }
    })));

    for id in ["a", "b"] {
        let styles = doc.find(id).unwrap().styles.clone().unwrap();
        assert_eq!(styles.base.unwrap()["color"], json!("navy"));
        assert_eq!(styles.hover.unwrap()["color"], json!("blue"));
    }
    assert!(doc.find("c").unwrap().styles.is_none());
}

#[test]
fn test_wrap_payload() {
    let mut doc = document();
    doc.apply(parse(json!({
        "type": "wrapInContainer",
        "nodeIds": ["c", "b"]
    })));

    let ids = children(&doc, "section");
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], "a");

    let container = doc.find(&ids[1]).unwrap();
    assert_eq!(container.node_type, CONTAINER_TYPE);
    assert!(container.props.is_empty());
    assert_eq!(children(&doc, &ids[1]), vec!["b", "c"]);
}

#[test]
fn test_unknown_ids_are_no_ops() {
    let mut doc = document();
    let original = doc.tree().clone();

    for payload in [
        json!({ "type": "remove", "nodeId": "zzz" }),
        json!({ "type": "move", "nodeId": "zzz", "newParentId": "section", "index": 0 }),
        json!({ "type": "batchUpdateProps", "nodeIds": ["zzz"], "props": { "x": 1 } }),
        json!({ "type": "duplicate", "nodeId": "zzz" }),
        json!({ "type": "setHidden", "nodeIds": [], "hidden": true }),
    ] {
        let result = doc.apply(parse(payload));
        assert!(!result.applied);
        assert_eq!(doc.tree(), &original);
    }
    assert_eq!(doc.version, 0);
}

#[test]
fn test_move_into_descendant_is_a_no_op() {
    let mut doc = document();
    let original = doc.tree().clone();

    let result = doc.apply(parse(json!({
        "type": "move",
        "nodeId": "section",
        "newParentId": "b",
        "index": 0
    })));

    assert!(!result.applied);
    assert_eq!(doc.tree(), &original);
}

#[test]
fn test_apply_is_total_outside_a_document() {
    let tree = document().tree().clone();
    let mut ids = IdGenerator::new("about");

    let mutation = parse(json!({ "type": "remove", "nodeId": "zzz" }));
    assert_eq!(mutation.apply(&tree, &mut ids), tree);
    assert!(mutation.try_apply(&tree, &mut ids).is_err());
}
