use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::item::FlatItem;

/// Working copy of one item while links are being resolved.
#[derive(Debug)]
pub struct WorkNode {
    /// Normalized item data
    pub item: FlatItem,
    /// Index of the node this item was attached under, None until attached
    pub parent: Option<Index>,
    /// Attached children, in attachment order
    pub children: Vec<Index>,
}

/// Arena of working nodes addressed by item id.
///
/// Links are plain arena indices, so parent/child references never form
/// owning cycles. Input order is kept separately for the linking pass.
#[derive(Debug, Default)]
pub struct ItemArena {
    arena: Arena<WorkNode>,
    lookup: HashMap<String, Index>,
    order: Vec<Index>,
}

impl ItemArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, keyed by its id.
    ///
    /// A repeated id overwrites the earlier item in place (last write wins,
    /// position of the first occurrence) and hands the replaced item back.
    #[instrument(level = "trace", skip(self, item), fields(id = %item.id))]
    pub fn insert(&mut self, item: FlatItem) -> (Index, Option<FlatItem>) {
        if let Some(&idx) = self.lookup.get(&item.id) {
            if let Some(node) = self.arena.get_mut(idx) {
                let replaced = std::mem::replace(&mut node.item, item);
                return (idx, Some(replaced));
            }
        }

        let id = item.id.clone();
        let idx = self.arena.insert(WorkNode {
            item,
            parent: None,
            children: Vec::new(),
        });
        self.lookup.insert(id, idx);
        self.order.push(idx);
        (idx, None)
    }

    pub fn index_of(&self, id: &str) -> Option<Index> {
        self.lookup.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    pub fn get(&self, idx: Index) -> Option<&WorkNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// First item by input order.
    pub fn first(&self) -> Option<Index> {
        self.order.first().copied()
    }

    /// Nodes in input order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &WorkNode)> {
        self.order
            .iter()
            .filter_map(|&idx| self.arena.get(idx).map(|node| (idx, node)))
    }

    pub fn is_attached(&self, idx: Index) -> bool {
        self.arena.get(idx).is_some_and(|node| node.parent.is_some())
    }

    /// Attach `child` under `parent`.
    ///
    /// Refused (returns false) for self links and for children that already
    /// have a parent, so every node ends up with at most one parent.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, parent: Index, child: Index) -> bool {
        if parent == child || self.is_attached(child) || !self.arena.contains(parent) {
            return false;
        }
        match self.arena.get_mut(child) {
            Some(node) => node.parent = Some(parent),
            None => return false,
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Pre-order walk starting at `start`.
    pub fn walk(&self, start: Index) -> PreOrder<'_> {
        PreOrder::new(self, start)
    }
}

pub struct PreOrder<'a> {
    arena: &'a ItemArena,
    stack: Vec<Index>,
}

impl<'a> PreOrder<'a> {
    fn new(arena: &'a ItemArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (Index, &'a WorkNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
