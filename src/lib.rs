//! qtree: question-tree content transformer
//!
//! Turns flat question/branch collections (linked by `parent` ids or by the
//! root's `followUpIds`) into immutable hierarchical trees for rendering.
//!
//! Layers:
//! - `domain`: normalization, root resolution, the tree transform
//! - `application`: services over a content store
//! - `infrastructure`: filesystem/content-store implementations and wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{DomainError, NodeKind, TreeDocument, TreeNode, TreeTransformer};
