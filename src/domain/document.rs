//! Output model: the fully resolved, immutable question tree.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Position of a node in the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Branch,
    Leaf,
}

impl NodeKind {
    /// Kind of a non-root node with `child_count` children.
    pub fn for_child_count(child_count: usize) -> Self {
        if child_count > 0 {
            NodeKind::Branch
        } else {
            NodeKind::Leaf
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Root => "root",
            NodeKind::Branch => "branch",
            NodeKind::Leaf => "leaf",
        };
        f.write_str(s)
    }
}

/// Node of the output tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_signal: Option<String>,
    /// Serialized as `type`, the key renderers read
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Transformed document handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root: TreeNode,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Levels in this subtree; a single node has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Pre-order iteration over this subtree.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// All ids in pre-order. This is the set an "expand all" toggle needs.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|n| n.id.as_str()).collect()
    }

    /// Ids of nodes without children.
    pub fn leaf_ids(&self) -> Vec<&str> {
        self.iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.iter().find(|n| n.id == id)
    }
}

pub struct NodeIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, kind: NodeKind, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            id: id.into(),
            question: format!("{}?", id),
            intent: None,
            expected_signal: None,
            kind,
            children,
            metadata: None,
        }
    }

    fn sample() -> TreeNode {
        node(
            "r",
            NodeKind::Root,
            vec![
                node("a", NodeKind::Branch, vec![node("a1", NodeKind::Leaf, vec![])]),
                node("b", NodeKind::Leaf, vec![]),
            ],
        )
    }

    #[test]
    fn test_queries() {
        let root = sample();
        assert_eq!(root.node_count(), 4);
        assert_eq!(root.depth(), 3);
        assert_eq!(root.ids(), vec!["r", "a", "a1", "b"]);
        assert_eq!(root.leaf_ids(), vec!["a1", "b"]);
        assert_eq!(root.find("a1").map(|n| n.kind), Some(NodeKind::Leaf));
        assert!(root.find("zz").is_none());
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let mut leaf = node("b", NodeKind::Leaf, vec![]);
        leaf.expected_signal = Some("knows it".into());
        let value = serde_json::to_value(&leaf).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "b",
                "question": "b?",
                "expectedSignal": "knows it",
                "type": "leaf",
                "children": []
            })
        );
    }
}
