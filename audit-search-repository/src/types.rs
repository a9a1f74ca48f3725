//! Request and response types for search index operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of searching a single index.
///
/// A missing index is a normal outcome for time-sharded data (a month with no
/// events never gets an index), so it is kept apart from errors.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexSearchOutcome {
    /// The index exists; these are the `_source` bodies of its hits, in order.
    Hits(Vec<Value>),
    /// The index does not exist.
    IndexNotFound,
}

impl IndexSearchOutcome {
    /// Documents returned, empty for a missing index.
    pub fn into_documents(self) -> Vec<Value> {
        match self {
            IndexSearchOutcome::Hits(documents) => documents,
            IndexSearchOutcome::IndexNotFound => Vec::new(),
        }
    }

    /// Number of documents returned.
    pub fn len(&self) -> usize {
        match self {
            IndexSearchOutcome::Hits(documents) => documents.len(),
            IndexSearchOutcome::IndexNotFound => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_index_not_found(&self) -> bool {
        matches!(self, IndexSearchOutcome::IndexNotFound)
    }
}

/// Per-request options that travel as URL parameters rather than in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Restrict `_source` to these fields. `None` returns whole documents.
    pub source_fields: Option<Vec<String>>,
}

impl SearchOptions {
    pub fn with_source_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }
}

/// How a document write ended on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteResult {
    Created,
    Updated,
}

/// Outcome of writing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentWrite {
    /// Index the document was written to.
    pub index: String,
    /// Id of the document, generated when the caller gave none.
    pub id: String,
    pub result: WriteResult,
}

/// Subset of a search response body that the repository reads.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub took: u64,
    pub hits: RawHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHits {
    #[serde(default)]
    pub hits: Vec<RawHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

impl RawSearchResponse {
    /// Source bodies of the hits, skipping hits returned without `_source`.
    pub fn into_sources(self) -> Vec<Value> {
        self.hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source)
            .collect()
    }
}
