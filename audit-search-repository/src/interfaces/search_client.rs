//! Search client trait definition.
//!
//! This module defines the abstract interface for search backend operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, mocks).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{DocumentWrite, IndexSearchOutcome, SearchOptions};

/// Abstracts the underlying search backend.
///
/// One trait covers index existence checks, index creation, document writes,
/// refreshes and searches. Implementations are injected into `SearchService`,
/// which adds validation, id generation and the multi-index search on top.
///
/// All methods return `Result<T, SearchIndexError>`. Only a missing index
/// during `refresh_index` or `search` is reported as a value instead of an
/// error, because monthly indices are routinely absent.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Check that the backend answers.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the backend responded successfully
    /// * `Ok(false)` - If it responded with an error status
    /// * `Err(SearchIndexError)` - If it could not be reached
    async fn ping(&self) -> Result<bool, SearchIndexError>;

    /// Check whether an index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index, optionally with settings and mappings.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `body` - Optional `settings`/`mappings` body
    async fn create_index(&self, index: &str, body: Option<&Value>)
        -> Result<(), SearchIndexError>;

    /// Store a document under `id` only if no document has that id yet.
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentWrite)` - With `WriteResult::Created`
    /// * `Err(SearchIndexError::DocumentConflict)` - If the id is taken
    /// * `Err(SearchIndexError)` - If the write fails
    async fn create_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError>;

    /// Store a document under `id`, replacing any existing one.
    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError>;

    /// Refresh an index so recent writes are searchable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index was refreshed
    /// * `Ok(false)` - If the index does not exist
    /// * `Err(SearchIndexError)` - If the refresh fails
    async fn refresh_index(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Run a search body against a single index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `body` - The search DSL body (`query`, `sort`, `size`, ...)
    /// * `options` - URL-level options such as `_source` filtering
    ///
    /// # Returns
    ///
    /// * `Ok(IndexSearchOutcome::Hits)` - The hit sources, in ranking order
    /// * `Ok(IndexSearchOutcome::IndexNotFound)` - If the index does not exist
    /// * `Err(SearchIndexError)` - If the search fails
    async fn search(
        &self,
        index: &str,
        body: &Value,
        options: &SearchOptions,
    ) -> Result<IndexSearchOutcome, SearchIndexError>;
}
