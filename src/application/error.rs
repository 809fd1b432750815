//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Why a content id produced no tree.
///
/// Callers show every cause as the same "not found" outcome; the cause is
/// kept for logs and diagnostics.
#[derive(Error, Debug)]
pub enum NotFoundCause {
    #[error("no content stored under this id")]
    Missing,

    #[error("content could not be read: {0}")]
    Unreadable(#[source] std::io::Error),

    #[error("{0}")]
    Untransformable(#[from] DomainError),
}

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("content not found: {id}")]
    NotFound {
        id: String,
        #[source]
        cause: NotFoundCause,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    pub fn not_found(id: impl Into<String>, cause: NotFoundCause) -> Self {
        Self::NotFound {
            id: id.into(),
            cause,
        }
    }

    /// The underlying cause of a not-found outcome, for diagnostics.
    pub fn not_found_cause(&self) -> Option<&NotFoundCause> {
        match self {
            Self::NotFound { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
