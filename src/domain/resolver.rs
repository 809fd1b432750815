//! Root resolution policy.
//!
//! Each resolver proposes one candidate id; the first candidate present in
//! the arena becomes the root. The order is the policy:
//! explicit `root` field, literal `"root"`, literal `"q1"`, first item.

use generational_arena::Index;

use crate::domain::arena::ItemArena;
use crate::domain::error::{DomainError, DomainResult};

/// Proposes a root candidate id, given the explicit `root` field and the arena.
pub type RootResolver = fn(Option<&str>, &ItemArena) -> Option<String>;

pub fn explicit_field(explicit: Option<&str>, _arena: &ItemArena) -> Option<String> {
    explicit.map(str::to_string)
}

pub fn literal_root(_explicit: Option<&str>, _arena: &ItemArena) -> Option<String> {
    Some("root".to_string())
}

pub fn literal_q1(_explicit: Option<&str>, _arena: &ItemArena) -> Option<String> {
    Some("q1".to_string())
}

pub fn first_item(_explicit: Option<&str>, arena: &ItemArena) -> Option<String> {
    arena
        .first()
        .and_then(|idx| arena.get(idx))
        .map(|node| node.item.id.clone())
}

/// Resolvers in the order they are tried.
pub const DEFAULT_RESOLVERS: [RootResolver; 4] =
    [explicit_field, literal_root, literal_q1, first_item];

/// Try `resolvers` in order and return the first candidate that exists.
pub fn resolve_root(
    resolvers: &[RootResolver],
    explicit: Option<&str>,
    arena: &ItemArena,
) -> DomainResult<Index> {
    let mut tried = Vec::new();
    for resolver in resolvers {
        if let Some(candidate) = resolver(explicit, arena) {
            if let Some(idx) = arena.index_of(&candidate) {
                return Ok(idx);
            }
            tried.push(candidate);
        }
    }
    Err(DomainError::RootNotFound { tried })
}
