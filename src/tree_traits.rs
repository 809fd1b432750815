/*
Terminal rendering of transformed trees.

termtree::Tree is a foreign type, so the conversion lives in a local trait
implemented for our own node and document types.
 */
use itertools::Itertools;
use serde_json::Value;
use termtree::Tree;

use crate::domain::{NodeKind, TreeDocument, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_with(false)
    }

    /// With `details`, labels also carry intent, expected signal and metadata.
    fn to_tree_with(&self, details: bool) -> Tree<String>;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_with(&self, details: bool) -> Tree<String> {
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_with(details))
            .collect();

        Tree::new(node_label(self, details)).with_leaves(leaves)
    }
}

impl TreeNodeConvert for TreeDocument {
    fn to_tree_with(&self, details: bool) -> Tree<String> {
        let title = match (&self.description, details) {
            (Some(description), true) => format!("{}: {}", self.title, description),
            _ => self.title.clone(),
        };
        Tree::new(title).with_leaves([self.root.to_tree_with(details)])
    }
}

fn kind_marker(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Root => "◆",
        NodeKind::Branch => "▸",
        NodeKind::Leaf => "•",
    }
}

fn node_label(node: &TreeNode, details: bool) -> String {
    let mut label = format!("{} {} [{}]", kind_marker(node.kind), node.question, node.id);
    if !details {
        return label;
    }
    if let Some(intent) = &node.intent {
        label.push_str(&format!(" | intent: {}", intent));
    }
    if let Some(signal) = &node.expected_signal {
        label.push_str(&format!(" | signal: {}", signal));
    }
    if let Some(meta) = node.metadata.as_ref().and_then(metadata_summary) {
        label.push_str(&format!(" | {}", meta));
    }
    label
}

/// `key=value` pairs of scalar metadata entries, in key order.
fn metadata_summary(metadata: &Value) -> Option<String> {
    let object = metadata.as_object()?;
    let pairs = object
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some(format!("{}={}", key, s)),
            Value::Number(n) => Some(format!("{}={}", key, n)),
            Value::Bool(b) => Some(format!("{}={}", key, b)),
            _ => None,
        })
        .sorted()
        .join(", ");
    (!pairs.is_empty()).then_some(pairs)
}
