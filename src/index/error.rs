//! Errors returned by catalog queries.

use thiserror::Error;

/// Result type for index queries.
pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No catalog has been loaded yet.
    #[error("Semantic layer not loaded")]
    NotLoaded,

    /// The named cube does not exist. Lookups are exact and case-sensitive.
    #[error("Cube '{name}' not found")]
    NotFound { name: String },
}

impl QueryError {
    pub(crate) fn not_found(name: &str) -> Self {
        QueryError::NotFound {
            name: name.to_string(),
        }
    }
}
