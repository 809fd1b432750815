//! Flat item collection -> hierarchical `TreeDocument`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::Index;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::arena::ItemArena;
use crate::domain::document::{NodeKind, TreeDocument, TreeNode};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::item::{FlatItem, RawContent, RawItem};
use crate::domain::resolver::{resolve_root, RootResolver, DEFAULT_RESOLVERS};

pub const DEFAULT_TITLE_SUFFIX: &str = "Question Tree";

/// Why an item is missing from the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Raw item at this position is not a JSON object
    Malformed { position: usize },
    /// Raw item at this position had no id
    MissingId { position: usize },
    /// `parentId` names an item that does not exist
    DanglingParent { parent_id: String },
    /// `parentId` names the item itself
    SelfParent,
    /// Linked to other items, but the chain never reaches the root
    Unreachable,
    /// No `parentId` and not listed in the root's `followUpIds`
    Unlinked,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Malformed { position } => write!(f, "item #{} is not an object", position),
            DropReason::MissingId { position } => write!(f, "item #{} has no id", position),
            DropReason::DanglingParent { parent_id } => {
                write!(f, "parent '{}' does not exist", parent_id)
            }
            DropReason::SelfParent => f.write_str("item is its own parent"),
            DropReason::Unreachable => f.write_str("not connected to the root"),
            DropReason::Unlinked => f.write_str("no parent and not a root follow-up"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedItem {
    pub id: Option<String>,
    pub reason: DropReason,
}

/// Diagnostics collected while transforming one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub root_id: String,
    /// Items left out of the tree, in input order
    pub dropped: Vec<DroppedItem>,
    /// Ids that occurred more than once (last occurrence kept)
    pub collisions: Vec<String>,
}

impl TransformReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.collisions.is_empty()
    }
}

/// Converts question-tree content into a `TreeDocument`.
///
/// Holds only configuration; every call builds its own working arena, so one
/// transformer can be shared freely across threads.
#[derive(Clone)]
pub struct TreeTransformer {
    title_suffix: String,
    default_description: Option<String>,
    resolvers: Vec<RootResolver>,
}

impl fmt::Debug for TreeTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeTransformer")
            .field("title_suffix", &self.title_suffix)
            .field("default_description", &self.default_description)
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl Default for TreeTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeTransformer {
    pub fn new() -> Self {
        Self {
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
            default_description: None,
            resolvers: DEFAULT_RESOLVERS.to_vec(),
        }
    }

    /// Suffix of generated titles (`"<content id> <suffix>"`).
    pub fn with_title_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.title_suffix = suffix.into();
        self
    }

    /// Description used when content has neither `summary` nor `description`.
    pub fn with_default_description(mut self, description: Option<String>) -> Self {
        self.default_description = description;
        self
    }

    pub fn with_resolvers(mut self, resolvers: Vec<RootResolver>) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn transform(&self, value: &Value) -> DomainResult<TreeDocument> {
        self.transform_with_report(value).map(|(doc, _)| doc)
    }

    pub fn transform_with_report(&self, value: &Value) -> DomainResult<(TreeDocument, TransformReport)> {
        let content = RawContent::from_value(value)?;
        self.transform_content(&content)
    }

    #[instrument(level = "debug", skip_all, fields(content = content.id.as_deref().unwrap_or("-")))]
    pub fn transform_content(
        &self,
        content: &RawContent,
    ) -> DomainResult<(TreeDocument, TransformReport)> {
        let raw_items = content.items()?;
        debug!("transform_content: {} raw items", raw_items.len());

        let mut skipped = Vec::new();
        let mut items = Vec::with_capacity(raw_items.len());
        for (position, value) in raw_items.iter().enumerate() {
            let Some(raw) = RawItem::from_value(value) else {
                warn!("transform_content: item #{} is not an object, skipped", position);
                skipped.push(DroppedItem {
                    id: None,
                    reason: DropReason::Malformed { position },
                });
                continue;
            };
            match raw.normalize() {
                Some(item) => items.push(item),
                None => {
                    warn!("transform_content: item #{} has no id, skipped", position);
                    skipped.push(DroppedItem {
                        id: None,
                        reason: DropReason::MissingId { position },
                    });
                }
            }
        }

        let (root, mut report) = self.build_tree(items, content.root.as_deref())?;
        skipped.append(&mut report.dropped);
        report.dropped = skipped;

        let document = TreeDocument {
            title: self.title_for(content),
            description: self.description_for(content),
            root,
        };
        Ok((document, report))
    }

    /// Link normalized items and materialize the tree under the resolved root.
    pub fn build_tree(
        &self,
        items: Vec<FlatItem>,
        explicit_root: Option<&str>,
    ) -> DomainResult<(TreeNode, TransformReport)> {
        let mut report = TransformReport::default();

        let mut arena = ItemArena::new();
        for item in items {
            let id = item.id.clone();
            if arena.insert(item).1.is_some() {
                warn!("build_tree: duplicate id '{}', last occurrence wins", id);
                report.collisions.push(id);
            }
        }

        let root = resolve_root(&self.resolvers, explicit_root, &arena)?;
        report.root_id = arena
            .get(root)
            .map(|n| n.item.id.clone())
            .unwrap_or_default();
        debug!("build_tree: root={}", report.root_id);

        link(&mut arena, root);

        let reachable: HashSet<Index> = arena.walk(root).map(|(idx, _)| idx).collect();
        for (idx, node) in arena.iter() {
            if reachable.contains(&idx) {
                continue;
            }
            let reason = drop_reason(&arena, node.item.parent_id.as_deref(), &node.item.id, node.parent);
            warn!("build_tree: dropping '{}': {}", node.item.id, reason);
            report.dropped.push(DroppedItem {
                id: Some(node.item.id.clone()),
                reason,
            });
        }

        let tree = materialize(&arena, root).ok_or_else(|| DomainError::RootNotFound {
            tried: vec![report.root_id.clone()],
        })?;
        Ok((tree, report))
    }

    fn title_for(&self, content: &RawContent) -> String {
        if let Some(title) = content.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        match content.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => format!("{} {}", id, self.title_suffix),
            None => self.title_suffix.clone(),
        }
    }

    fn description_for(&self, content: &RawContent) -> Option<String> {
        [&content.summary, &content.description]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .cloned()
            .or_else(|| self.default_description.clone())
    }
}

/// Attach items in input order.
///
/// `parentId` takes priority per item; the root's `followUpIds` only pick up
/// items without a `parentId` of their own.
fn link(arena: &mut ItemArena, root: Index) {
    let links: Vec<(Index, Option<String>, Vec<String>)> = arena
        .iter()
        .map(|(idx, node)| {
            (
                idx,
                node.item.parent_id.clone(),
                node.item.follow_up_ids.clone(),
            )
        })
        .collect();

    for (idx, parent_id, follow_ups) in links {
        if idx == root {
            for follow_up in &follow_ups {
                let Some(child) = arena.index_of(follow_up) else {
                    debug!("link: unknown follow-up id '{}' skipped", follow_up);
                    continue;
                };
                let has_own_parent = arena
                    .get(child)
                    .is_some_and(|n| n.item.parent_id.is_some());
                if !has_own_parent {
                    arena.attach(root, child);
                }
            }
            continue;
        }

        if let Some(parent) = parent_id.as_deref().and_then(|p| arena.index_of(p)) {
            arena.attach(parent, idx);
        }
    }
}

fn drop_reason(
    arena: &ItemArena,
    parent_id: Option<&str>,
    id: &str,
    attached_to: Option<Index>,
) -> DropReason {
    match parent_id {
        Some(p) if p == id => DropReason::SelfParent,
        Some(p) if !arena.contains(p) => DropReason::DanglingParent {
            parent_id: p.to_string(),
        },
        Some(_) => DropReason::Unreachable,
        None if attached_to.is_some() => DropReason::Unreachable,
        None => DropReason::Unlinked,
    }
}

/// Build owned nodes bottom-up over the pre-order walk from `root`.
///
/// In reverse pre-order every child is built before its parent, so no
/// recursion is needed however deep the parent chains go.
fn materialize(arena: &ItemArena, root: Index) -> Option<TreeNode> {
    let order: Vec<Index> = arena.walk(root).map(|(idx, _)| idx).collect();
    let mut built: HashMap<Index, TreeNode> = HashMap::with_capacity(order.len());

    for &idx in order.iter().rev() {
        let node = arena.get(idx)?;
        let children: Vec<TreeNode> = node
            .children
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();
        let kind = if idx == root {
            NodeKind::Root
        } else {
            NodeKind::for_child_count(children.len())
        };

        built.insert(
            idx,
            TreeNode {
                id: node.item.id.clone(),
                question: node.item.text.clone(),
                intent: node.item.intent.clone(),
                expected_signal: node.item.expected_signal.clone(),
                kind,
                children,
                metadata: node.item.metadata.clone(),
            },
        );
    }
    built.remove(&root)
}
