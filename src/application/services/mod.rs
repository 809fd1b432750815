//! Application services

pub mod tree;

pub use tree::{CheckOutcome, TreeService, TreeSummary};
