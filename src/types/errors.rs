//! # Type Registry Errors

use thiserror::Error;

/// Result type for type registry operations
pub type TypeResult<T> = Result<T, TypeError>;

/// Type resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Struct not found: {0}")]
    StructNotFound(String),

    #[error("Predicate for '{0}' is fixed and cannot be overridden")]
    ReservedTag(String),
}

/// Result type for struct catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Struct catalog errors
///
/// All catalog errors happen while the catalog is being populated at
/// startup; none of them can occur during validation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Struct already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid struct descriptor '{name}': {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("Malformed struct file '{path}': {reason}")]
    MalformedFile { path: String, reason: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
