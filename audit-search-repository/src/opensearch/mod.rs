//! OpenSearch implementation of the search client.
//!
//! This module provides a concrete implementation of `SearchClient`
//! using OpenSearch (or a compatible Elasticsearch cluster) as the backend.

mod provider;

pub use provider::OpenSearchClient;
