//! Domain layer: question-tree model and the flat-to-hierarchical transform
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod document;
pub mod error;
pub mod item;
pub mod resolver;
pub mod transformer;

pub use arena::{ItemArena, WorkNode};
pub use document::{NodeKind, TreeDocument, TreeNode};
pub use error::{DomainError, DomainResult};
pub use item::{FlatItem, RawContent, RawItem};
pub use resolver::{resolve_root, RootResolver, DEFAULT_RESOLVERS};
pub use transformer::{DropReason, DroppedItem, TransformReport, TreeTransformer};
