//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the taxonomy structure.
/// These are independent of how the document was loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed taxonomy at '{path}': expected an object, found {found}")]
    Malformed { path: String, found: String },

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("node is not part of this hierarchy")]
    UnknownNode,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
