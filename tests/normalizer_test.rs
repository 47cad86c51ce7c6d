//! Tests for taxonomy normalization against JSON fixtures

use std::path::PathBuf;
use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use skillsweb::application::services::DocumentService;
use skillsweb::application::ApplicationError;
use skillsweb::domain::{normalize, DataSource, DomainError, TreeNode};
use skillsweb::infrastructure::traits::RealFileSystem;
use skillsweb::tree_traits::TreeNodeConvert;
use skillsweb::util::testing;

fn documents() -> DocumentService {
    testing::init_test_setup();
    DocumentService::new(Arc::new(RealFileSystem))
}

fn fixture(name: &str) -> DataSource {
    DataSource::Path(PathBuf::from("tests/resources/taxonomy").join(name))
}

// ============================================================
// Shapes
// ============================================================

#[test]
fn given_explicit_children_wrapper_when_normalizing_then_children_under_category() {
    let raw = json!({"Engineering": {"children": {"Backend": {}, "Frontend": {}}}});

    let tree = normalize(&raw, "root").unwrap();

    assert_eq!(
        tree,
        TreeNode::leaf("root").with_children(vec![TreeNode::leaf("Engineering")
            .with_children(vec![TreeNode::leaf("Backend"), TreeNode::leaf("Frontend")])])
    );
}

#[test]
fn given_record_with_only_reserved_keys_when_normalizing_then_leaf_keeps_details() {
    let raw = json!({"x": {"name": "x", "id": "1", "details": "d"}});

    let tree = normalize(&raw, "root").unwrap();

    let leaf = &tree.children[0];
    assert_eq!(leaf, &TreeNode::leaf("x").with_details("d"));
    assert!(leaf.children.is_empty());
}

#[rstest]
#[case(json!([1, 2]), "<document>", "array")]
#[case(json!({"A": "text"}), "A", "string")]
#[case(json!({"A": {"B": null}}), "A/B", "null")]
#[case(json!({"A": {"children": [1]}}), "A/children", "array")]
fn given_non_object_entries_when_normalizing_then_malformed_with_path(
    #[case] raw: serde_json::Value,
    #[case] path: &str,
    #[case] found: &str,
) {
    let err = normalize(&raw, "root").unwrap_err();

    assert_eq!(
        err,
        DomainError::Malformed {
            path: path.to_string(),
            found: found.to_string(),
        }
    );
}

#[test]
fn given_empty_document_when_normalizing_then_hub_only() {
    let tree = normalize(&json!({}), "Waal Bridge").unwrap();

    assert_eq!(tree, TreeNode::leaf("Waal Bridge"));
    assert_eq!(tree.levels(), 1);
}

#[test]
fn given_normalized_tree_when_normalizing_its_shape_again_then_equal() {
    let raw = json!({
        "A": {"details": "a", "A1": {}, "A2": {"children": {"A2x": {"details": "deep"}}}},
        "B": {}
    });
    let first = normalize(&raw, "root").unwrap();

    // re-encode the tree in the explicit-children form and normalize again
    fn encode(node: &TreeNode) -> serde_json::Value {
        let children: serde_json::Map<_, _> = node
            .children
            .iter()
            .map(|c| (c.name.clone(), encode(c)))
            .collect();
        let mut record = serde_json::Map::new();
        if let Some(d) = &node.details {
            record.insert("details".into(), json!(d));
        }
        if !children.is_empty() {
            record.insert("children".into(), serde_json::Value::Object(children));
        }
        serde_json::Value::Object(record)
    }
    let top: serde_json::Map<_, _> = first
        .children
        .iter()
        .map(|c| (c.name.clone(), encode(c)))
        .collect();
    let second = normalize(&serde_json::Value::Object(top), "root").unwrap();

    assert_eq!(first, second);
}

// ============================================================
// Fixtures
// ============================================================

#[test]
fn given_skills_fixture_when_loading_then_mixed_shapes_normalized() {
    let taxonomy = documents()
        .load_taxonomy(&fixture("skills.json"), "Waal Bridge")
        .unwrap();
    let tree = &taxonomy.tree;

    assert_eq!(tree.name, "Waal Bridge");
    assert_eq!(
        tree.children.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec![
            "Bridge Asset Management",
            "Structural Engineering",
            "Traffic Operations"
        ]
    );
    assert_eq!(tree.leaf_count(), 7);
    assert_eq!(tree.levels(), 4);

    let bam = tree.find(&["Bridge Asset Management"]).unwrap();
    assert_eq!(bam.details.as_deref(), Some("Lifecycle planning for the crossing"));
    assert!(tree
        .find(&["Bridge Asset Management", "Inspection", "Underwater Survey"])
        .is_some_and(TreeNode::is_leaf));
    // a record's own name wins over its key
    assert!(tree
        .find(&["Structural Engineering", "Stay Cable Monitoring"])
        .is_some());
    assert!(tree.find(&["Traffic Operations"]).is_some_and(TreeNode::is_leaf));
}

#[test]
fn given_skills_fixture_when_rendering_then_tree_lists_every_node() {
    let taxonomy = documents()
        .load_taxonomy(&fixture("skills.json"), "Waal Bridge")
        .unwrap();

    let rendered = taxonomy.tree.to_tree_string().to_string();

    assert!(rendered.starts_with("Waal Bridge\n"));
    assert_eq!(rendered.lines().count(), taxonomy.hierarchy.len());
}

#[test]
fn given_truncated_json_when_loading_then_data_corrupt() {
    let err = documents()
        .load_taxonomy(&fixture("corrupt.json"), "Waal Bridge")
        .unwrap_err();

    assert!(matches!(err, ApplicationError::DataCorrupt { .. }));
    assert!(err.is_corrupt_data());
}

#[test]
fn given_scalar_leaf_when_loading_then_malformed_names_path() {
    let err = documents()
        .load_taxonomy(&fixture("malformed.json"), "Waal Bridge")
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Malformed { ref path, .. })
            if path == "Structural Engineering/Load Rating"
    ));
}

#[test]
fn given_missing_file_when_loading_then_data_load_error() {
    let err = documents()
        .load_taxonomy(&fixture("does-not-exist.json"), "Waal Bridge")
        .unwrap_err();

    assert!(matches!(err, ApplicationError::DataLoad { .. }));
    assert!(!err.is_corrupt_data());
}
