//! Tests for TreeTransformer: shape normalization, root resolution, linking

use rstest::rstest;
use serde_json::{json, Value};

use qtree::domain::{DomainError, DropReason, NodeKind, TreeNode, TreeTransformer};
use qtree::util::testing;

fn transform(value: Value) -> qtree::TreeDocument {
    testing::init_test_setup();
    TreeTransformer::new().transform(&value).expect("transform")
}

fn child_ids(node: &TreeNode) -> Vec<&str> {
    node.children.iter().map(|c| c.id.as_str()).collect()
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_questions_without_root_field_when_transforming_then_q1_is_root() {
    let doc = transform(json!({
        "questions": [
            {"id": "q1", "q": "Why useCallback?"},
            {"id": "q2", "q": "When does it help?", "parent": "q1"}
        ]
    }));

    assert_eq!(doc.root.id, "q1");
    assert_eq!(doc.root.kind, NodeKind::Root);
    assert_eq!(doc.root.question, "Why useCallback?");
    assert_eq!(child_ids(&doc.root), vec!["q2"]);
    assert_eq!(doc.root.children[0].kind, NodeKind::Leaf);
    assert_eq!(doc.root.children[0].question, "When does it help?");
}

#[test]
fn given_dangling_parent_when_transforming_then_item_is_absent_without_error() {
    let value = json!({
        "branches": [
            {"id": "root", "q": "Start"},
            {"id": "q2", "q": "Child", "parent": "root"},
            {"id": "q9", "q": "Orphan", "parent": "missing"}
        ]
    });
    let (doc, report) = TreeTransformer::new()
        .transform_with_report(&value)
        .expect("transform");

    assert!(doc.root.find("q9").is_none());
    assert_eq!(doc.root.ids(), vec!["root", "q2"]);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].id.as_deref(), Some("q9"));
    assert_eq!(
        report.dropped[0].reason,
        DropReason::DanglingParent {
            parent_id: "missing".into()
        }
    );
}

// ============================================================
// Root resolution
// ============================================================

#[test]
fn given_item_named_root_when_no_root_field_then_it_becomes_root() {
    let doc = transform(json!({
        "branches": [
            {"id": "intro", "q": "Intro"},
            {"id": "q1", "q": "First question"},
            {"id": "root", "q": "The root"}
        ]
    }));
    assert_eq!(doc.root.id, "root");
}

#[rstest]
#[case(json!({"root": "b", "branches": [{"id": "a"}, {"id": "b"}]}), "b")]
#[case(json!({"root": "zz", "branches": [{"id": "a"}, {"id": "root"}]}), "root")]
#[case(json!({"branches": [{"id": "a"}, {"id": "q1"}]}), "q1")]
#[case(json!({"branches": [{"id": "a"}, {"id": "b"}]}), "a")]
fn given_root_candidates_when_transforming_then_fallback_order_applies(
    #[case] value: Value,
    #[case] expected_root: &str,
) {
    assert_eq!(transform(value).root.id, expected_root);
}

#[test]
fn given_only_items_without_ids_when_transforming_then_root_not_found() {
    let err = TreeTransformer::new()
        .transform(&json!({"questions": [{"q": "no id"}, {"q": "none either"}]}))
        .unwrap_err();
    assert!(matches!(err, DomainError::RootNotFound { .. }));
}

// ============================================================
// Content shape
// ============================================================

#[rstest]
#[case(json!({"branches": []}))]
#[case(json!({"title": "nothing here"}))]
#[case(json!({"branches": [], "questions": []}))]
#[case(json!({"branches": null}))]
#[case(json!("just a string"))]
fn given_no_item_collection_when_transforming_then_content_shape_error(#[case] value: Value) {
    let err = TreeTransformer::new().transform(&value).unwrap_err();
    assert!(
        matches!(err, DomainError::ContentShape { .. }),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn given_badly_typed_item_fields_when_transforming_then_tree_still_renders() {
    let value = json!({
        "questions": [
            {"id": "q1", "q": "Root", "followUpIds": ["q3", 7]},
            {"id": "q2", "q": "Child", "parent": "q1", "intent": 5},
            {"id": 7, "q": "Numeric id", "signal": ["not", "text"]},
            {"id": "q3", "q": "Follow-up", "metadata": "free-form"}
        ]
    });
    let (doc, report) = TreeTransformer::new()
        .transform_with_report(&value)
        .expect("transform");

    assert_eq!(doc.root.ids(), vec!["q1", "q3", "7", "q2"]);
    assert_eq!(doc.root.find("q2").and_then(|n| n.intent.as_deref()), Some("5"));
    assert_eq!(doc.root.find("7").and_then(|n| n.expected_signal.as_deref()), None);
    assert!(report.dropped.is_empty());
}

#[test]
fn given_non_object_item_when_transforming_then_it_is_dropped_as_malformed() {
    let value = json!({
        "branches": [
            {"id": "root", "q": "Start"},
            "stray string",
            {"id": "a", "q": "A", "parent": "root"},
            null
        ]
    });
    let (doc, report) = TreeTransformer::new()
        .transform_with_report(&value)
        .expect("transform");

    assert_eq!(doc.root.ids(), vec!["root", "a"]);
    let reasons: Vec<_> = report.dropped.iter().map(|d| d.reason.clone()).collect();
    assert_eq!(
        reasons,
        vec![
            DropReason::Malformed { position: 1 },
            DropReason::Malformed { position: 3 }
        ]
    );
}

#[test]
fn given_empty_branches_and_filled_questions_when_transforming_then_uses_questions() {
    let doc = transform(json!({"branches": [], "questions": [{"id": "q1", "q": "Hi"}]}));
    assert_eq!(doc.root.id, "q1");
}

// ============================================================
// Follow-up linkage
// ============================================================

#[test]
fn given_root_follow_up_ids_when_transforming_then_children_in_list_order() {
    let doc = transform(json!({
        "questions": [
            {"id": "q1", "q": "Root", "followUpIds": ["q4", "missing", "q2", "q3"]},
            {"id": "q2", "q": "Two"},
            {"id": "q3", "q": "Three"},
            {"id": "q4", "q": "Four"}
        ]
    }));

    assert_eq!(child_ids(&doc.root), vec!["q4", "q2", "q3"]);
    assert!(doc.root.children.iter().all(|c| c.kind == NodeKind::Leaf));
}

#[test]
fn given_follow_up_ids_on_non_root_when_transforming_then_they_do_not_link() {
    let value = json!({
        "questions": [
            {"id": "q1", "q": "Root"},
            {"id": "q2", "q": "Two", "followUpIds": ["q3"]},
            {"id": "q3", "q": "Three"}
        ]
    });
    let (doc, report) = TreeTransformer::new().transform_with_report(&value).unwrap();

    assert_eq!(doc.root.ids(), vec!["q1"]);
    assert_eq!(report.dropped.len(), 2);
    assert!(report
        .dropped
        .iter()
        .all(|d| d.reason == DropReason::Unlinked));
}

// ============================================================
// Kinds and reachability
// ============================================================

#[test]
fn given_single_item_when_transforming_then_root_kind_without_children() {
    let doc = transform(json!({"branches": [{"id": "only", "q": "Alone"}]}));
    assert_eq!(doc.root.kind, NodeKind::Root);
    assert!(doc.root.children.is_empty());
}

#[test]
fn given_nested_parents_when_transforming_then_kinds_follow_child_count() {
    let doc = transform(json!({
        "branches": [
            {"id": "root", "q": "r"},
            {"id": "a", "q": "a", "parent": "root"},
            {"id": "a1", "q": "a1", "parent": "a"},
            {"id": "b", "q": "b", "parent": "root"}
        ]
    }));

    for node in doc.root.iter() {
        let expected = match node.id.as_str() {
            "root" => NodeKind::Root,
            _ if node.children.is_empty() => NodeKind::Leaf,
            _ => NodeKind::Branch,
        };
        assert_eq!(node.kind, expected, "node {}", node.id);
    }
    assert_eq!(doc.root.find("a").map(|n| n.kind), Some(NodeKind::Branch));
}

#[test]
fn given_mixed_links_when_transforming_then_every_reachable_item_appears_once() {
    let doc = transform(json!({
        "questions": [
            {"id": "q1", "q": "root", "followUpIds": ["q2", "q3", "q2"]},
            {"id": "q2", "q": "two"},
            {"id": "q3", "q": "three", "parent": "q2"},
            {"id": "q4", "q": "four", "parent": "q3"},
            {"id": "q5", "q": "five", "parent": "q1"}
        ]
    }));

    let mut ids = doc.root.ids();
    assert_eq!(ids.len(), 5);
    ids.sort();
    ids.dedup();
    assert_eq!(ids, vec!["q1", "q2", "q3", "q4", "q5"]);
}

// ============================================================
// Field aliases and document fields
// ============================================================

#[test]
fn given_both_item_shapes_when_transforming_then_fields_are_normalized() {
    let old = transform(json!({
        "questions": [{"id": "q1", "q": "Q", "signal": "S", "intent": "I"}]
    }));
    let new = transform(json!({
        "branches": [{"id": "q1", "question": "Q", "expectedSignal": "S", "intent": "I"}]
    }));

    assert_eq!(old.root, new.root);
    assert_eq!(old.root.expected_signal.as_deref(), Some("S"));
}

#[test]
fn given_metadata_when_transforming_then_passed_through_unchanged() {
    let metadata = json!({"difficulty": "hard", "timing": "5 min", "extra": [1, 2]});
    let doc = transform(json!({
        "branches": [
            {"id": "root", "q": "r"},
            {"id": "c", "q": "c", "parent": "root", "metadata": metadata.clone()}
        ]
    }));
    assert_eq!(doc.root.children[0].metadata.as_ref(), Some(&metadata));
    assert!(doc.root.metadata.is_none());
}

#[rstest]
#[case(json!({"id": "hooks", "title": "Hooks Deep Dive"}), "Hooks Deep Dive")]
#[case(json!({"id": "hooks"}), "hooks Question Tree")]
#[case(json!({}), "Question Tree")]
fn given_title_fields_when_transforming_then_title_resolved(
    #[case] value: Value,
    #[case] expected: &str,
) {
    let mut value = value;
    value["branches"] = json!([{"id": "root", "q": "r"}]);
    assert_eq!(transform(value).title, expected);
}

#[test]
fn given_summary_and_description_when_transforming_then_summary_wins() {
    let doc = transform(json!({
        "summary": "from summary",
        "description": "from description",
        "branches": [{"id": "root"}]
    }));
    assert_eq!(doc.description.as_deref(), Some("from summary"));

    let doc = transform(json!({"branches": [{"id": "root"}]}));
    assert_eq!(doc.description, None);
}

#[test]
fn given_empty_summary_when_transforming_then_description_is_used() {
    let doc = transform(json!({
        "summary": "",
        "description": "from description",
        "branches": [{"id": "root"}]
    }));
    assert_eq!(doc.description.as_deref(), Some("from description"));

    let doc = transform(json!({"summary": "", "description": "", "branches": [{"id": "root"}]}));
    assert_eq!(doc.description, None);
}

#[test]
fn given_configured_defaults_when_transforming_then_used_for_missing_fields() {
    let transformer = TreeTransformer::new()
        .with_title_suffix("Interview Tree")
        .with_default_description(Some("Interactive interview question tree".into()));
    let doc = transformer
        .transform(&json!({"id": "memo", "branches": [{"id": "root"}]}))
        .unwrap();

    assert_eq!(doc.title, "memo Interview Tree");
    assert_eq!(
        doc.description.as_deref(),
        Some("Interactive interview question tree")
    );
}

// ============================================================
// Determinism
// ============================================================

#[test]
fn given_same_input_when_transforming_twice_then_trees_are_equal() {
    let value = json!({
        "root": "r",
        "branches": [
            {"id": "r", "q": "root"},
            {"id": "x", "q": "x", "parent": "r"},
            {"id": "y", "q": "y", "parent": "x"},
            {"id": "z", "q": "z", "parent": "r"}
        ]
    });
    let transformer = TreeTransformer::new();
    let first = transformer.transform(&value).unwrap();
    let second = transformer.transform(&value).unwrap();
    assert_eq!(first, second);
}

#[test]
fn given_deep_parent_chain_when_transforming_then_tree_is_built() {
    let depth = 3000;
    let mut items = vec![json!({"id": "n0", "q": "start"})];
    for i in 1..depth {
        items.push(json!({"id": format!("n{}", i), "q": "next", "parent": format!("n{}", i - 1)}));
    }
    let doc = transform(json!({"root": "n0", "branches": items}));

    assert_eq!(doc.root.node_count(), depth);
    assert_eq!(doc.root.depth(), depth);
    assert_eq!(doc.root.leaf_ids(), vec![format!("n{}", depth - 1).as_str()]);
    assert_eq!(
        doc.root.find("n1500").map(|n| n.kind),
        Some(NodeKind::Branch)
    );
}

#[test]
fn given_document_when_serialized_then_kind_key_is_type() {
    let doc = transform(json!({
        "title": "T",
        "branches": [{"id": "root", "q": "r"}, {"id": "c", "q": "c", "parent": "root"}]
    }));
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["root"]["type"], "root");
    assert_eq!(value["root"]["children"][0]["type"], "leaf");
    assert!(value.get("description").is_none());
}
