//! Integration tests for editor crate

use pagecraft_editor::{Document, EditSession, EditorError, Mutation, Pipeline};
use pagecraft_evaluator::{Collection, CollectionSet, Evaluator};
use pagecraft_tree::{json, Breakpoint, Node, Tree};

const PAGE: &str = r#"[
    {
        "id": "hero",
        "type": "hero",
        "props": { "title": "Ship faster" },
        "styles": { "base": { "padding": 64 }, "mobile": { "padding": 24 } }
    },
    {
        "id": "blog",
        "type": "features",
        "props": {
            "cmsBinding": {
                "collectionId": "posts",
                "map": { "title": "headline" },
                "query": { "limit": 2 }
            }
        }
    }
]"#;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("pagecraft-{}-{}", std::process::id(), name))
}

#[test]
fn test_document_lifecycle() -> anyhow::Result<()> {
    let path = temp_path("lifecycle.json");
    std::fs::write(&path, PAGE)?;

    let mut doc = Document::load(&path)?;
    assert_eq!(doc.version, 0);
    assert!(!doc.is_dirty());
    assert_eq!(doc.path(), Some(path.as_path()));

    doc.apply(Mutation::BatchUpdateProps {
        node_ids: vec!["hero".to_string()],
        props: json!({ "title": "Ship today" }).as_object().cloned().unwrap(),
    });
    assert!(doc.is_dirty());

    doc.save()?;
    assert!(!doc.is_dirty());

    let reloaded = Document::load(&path)?;
    assert_eq!(reloaded.tree(), doc.tree());
    assert_eq!(
        reloaded.find("hero").unwrap().props["title"],
        json!("Ship today")
    );

    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_load_missing_file() {
    let result = Document::load(temp_path("does-not-exist.json"));
    assert!(matches!(result, Err(EditorError::Io(_))));
}

#[test]
fn test_edit_session_workflow() {
    let doc = Document::from_json("page", PAGE).unwrap();
    let mut session = EditSession::new("client-1", doc);

    session.select(vec!["hero".to_string()]);
    let copy = session.clone_node("hero").unwrap();
    assert_eq!(session.tree().roots()[1].id, copy);

    session.remove("hero");
    assert!(session.selected_nodes.is_empty());

    assert!(session.undo());
    assert!(session.tree().contains("hero"));
    assert!(session.redo());
    assert!(!session.tree().contains("hero"));
}

#[test]
fn test_pipeline_execution() {
    let collections = CollectionSet::new().with(
        Collection::new("posts")
            .with_item(json!({ "id": "1", "headline": "First" }))
            .with_item(json!({ "id": "2", "headline": "Second" }))
            .with_item(json!({ "id": "3", "headline": "Third" })),
    );

    let doc = Document::from_json("page", PAGE).unwrap();
    let mut pipeline = Pipeline::new(
        EditSession::new("client-1", doc),
        Evaluator::new().with_collections(collections),
    )
    .with_breakpoint(Breakpoint::Mobile);

    let nodes = pipeline.full_evaluate();
    assert_eq!(nodes[0].styles.resting["padding"], json!(24));
    assert!(nodes[1].bound);
    assert_eq!(
        nodes[1].props["items"],
        json!([
            { "title": "First", "_itemId": "1" },
            { "title": "Second", "_itemId": "2" },
        ])
    );

    let result = pipeline.apply_mutation(Mutation::Insert {
        parent_id: None,
        index: 0,
        node: Node::new("banner", "banner"),
    });
    assert_eq!(result.version, 1);
    assert_eq!(result.nodes.len(), 3);
    assert_eq!(result.nodes[0].id, "banner");
}

#[test]
fn test_trees_are_shareable_across_threads() {
    let doc = Document::new("page", Tree::from_nodes(vec![Node::new("a", "text")]));
    let tree = doc.tree().clone();

    let count = std::thread::spawn(move || tree.node_count()).join().unwrap();
    assert_eq!(count, 1);
}
