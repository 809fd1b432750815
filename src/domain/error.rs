//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent content that cannot become a tree.
/// These are independent of where the content came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no transformable content: {reason}")]
    ContentShape { reason: String },

    #[error("root not found (tried: {})", tried.join(", "))]
    RootNotFound { tried: Vec<String> },
}

impl DomainError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        Self::ContentShape {
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
