//! Search index error types.
//!
//! This module defines the unified error type for all search index operations,
//! from input validation (bad dates, bad index names) to failed remote calls.

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchClient` trait and `SearchService`. A missing index during
/// a search is not an error: it is reported as `IndexSearchOutcome::IndexNotFound`.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., empty index name, empty document id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A date string could not be parsed as a calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Failed to reach the search backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to create an index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to write a document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// A create-only write hit an existing document id.
    #[error("Document already exists: index={index}, id={id}")]
    DocumentConflict { index: String, id: String },

    /// Failed to refresh an index.
    #[error("Refresh error: {0}")]
    RefreshError(String),

    /// The backend rejected or failed a search.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to parse a response from the search backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unknown error.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an invalid date error.
    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Self::InvalidDate(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a document conflict error.
    pub fn document_conflict(index: &str, id: &str) -> Self {
        Self::DocumentConflict {
            index: index.to_string(),
            id: id.to_string(),
        }
    }

    /// Create a refresh error.
    pub fn refresh(msg: impl Into<String>) -> Self {
        Self::RefreshError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unknown error.
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
