//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchClient`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
        StatusCode,
    },
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesRefreshParts},
    CreateParts, IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchClient;
use crate::types::{DocumentWrite, IndexSearchOutcome, RawSearchResponse, SearchOptions, WriteResult};

/// Error type reported by the backend for a missing index.
const INDEX_NOT_FOUND_EXCEPTION: &str = "index_not_found_exception";

/// OpenSearch client implementation.
///
/// Talks to a single OpenSearch or Elasticsearch node over HTTP.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200")?;
/// let exists = client.index_exists("audit-video.2022.06").await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    url: String,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the specified URL.
    ///
    /// No request is sent; use `ping` to check the connection.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// The URL this client was created for.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Read the status and body of a response that may be an error.
    async fn status_and_body(response: Response) -> (StatusCode, String) {
        let status = response.status_code();
        let body = response.text().await.unwrap_or_default();
        (status, body)
    }

    /// Whether an error response reports a missing index.
    fn is_index_not_found(status: StatusCode, body: &str) -> bool {
        status == StatusCode::NOT_FOUND && body.contains(INDEX_NOT_FOUND_EXCEPTION)
    }

    /// Map the `result` field of an index/create response.
    fn write_result(body: &Value) -> WriteResult {
        match body.get("result").and_then(Value::as_str) {
            Some("updated") => WriteResult::Updated,
            _ => WriteResult::Created,
        }
    }
}

#[async_trait]
impl SearchClient for OpenSearchClient {
    async fn ping(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            warn!(url = %self.url, status = %status, "Ping returned an error status");
        }
        Ok(status.is_success())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let indices = [index];
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&indices))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        match response.status_code() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                error!(index = %index, status = %status, "Index exists request failed");
                Err(SearchIndexError::unknown(format!(
                    "Index exists check for {} failed with status {}",
                    index, status
                )))
            }
        }
    }

    async fn create_index(
        &self,
        index: &str,
        body: Option<&Value>,
    ) -> Result<(), SearchIndexError> {
        let indices = self.client.indices();
        let request = indices.create(IndicesCreateParts::Index(index));
        let response = match body {
            Some(body) => request.body(body).send().await,
            None => request.send().await,
        }
        .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_body) = Self::status_and_body(response).await;
            error!(index = %index, status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create index {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        info!(index = %index, "Index created");
        Ok(())
    }

    async fn create_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError> {
        let response = self
            .client
            .create(CreateParts::IndexId(index, id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status_code();
        if status == StatusCode::CONFLICT {
            warn!(index = %index, id = %id, "Document already exists");
            return Err(SearchIndexError::document_conflict(index, id));
        }
        if !status.is_success() {
            let (status, error_body) = Self::status_and_body(response).await;
            error!(status = %status, body = %error_body, "Create document request failed");
            return Err(SearchIndexError::index(format!(
                "Create failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(index = %index, id = %id, "Document created");
        Ok(DocumentWrite {
            index: index.to_string(),
            id: id.to_string(),
            result: WriteResult::Created,
        })
    }

    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_body) = Self::status_and_body(response).await;
            error!(status = %status, body = %error_body, "Index document request failed");
            return Err(SearchIndexError::index(format!(
                "Index failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let result = Self::write_result(&body);

        debug!(index = %index, id = %id, result = ?result, "Document indexed");
        Ok(DocumentWrite {
            index: index.to_string(),
            id: id.to_string(),
            result,
        })
    }

    async fn refresh_index(&self, index: &str) -> Result<bool, SearchIndexError> {
        let indices = [index];
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&indices))
            .send()
            .await
            .map_err(|e| SearchIndexError::refresh(e.to_string()))?;

        if response.status_code().is_success() {
            return Ok(true);
        }

        let (status, error_body) = Self::status_and_body(response).await;
        if Self::is_index_not_found(status, &error_body) {
            debug!(index = %index, "Refresh skipped, index not found");
            return Ok(false);
        }

        error!(index = %index, status = %status, body = %error_body, "Refresh request failed");
        Err(SearchIndexError::refresh(format!(
            "Refresh of {} failed with status {}: {}",
            index, status, error_body
        )))
    }

    async fn search(
        &self,
        index: &str,
        body: &Value,
        options: &SearchOptions,
    ) -> Result<IndexSearchOutcome, SearchIndexError> {
        let indices = [index];
        let source_fields: Vec<&str> = options
            .source_fields
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();

        let mut request = self.client.search(SearchParts::Index(&indices)).body(body);
        if options.source_fields.is_some() {
            request = request._source(&source_fields);
        }

        debug!(index = %index, body = %body, source = ?source_fields, "Sending search request");
        let response = request
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        if !response.status_code().is_success() {
            let (status, error_body) = Self::status_and_body(response).await;
            if Self::is_index_not_found(status, &error_body) {
                return Ok(IndexSearchOutcome::IndexNotFound);
            }
            error!(index = %index, status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search on {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        let parsed: RawSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        debug!(index = %index, took_ms = parsed.took, hits = parsed.hits.hits.len(), "Search completed");
        Ok(IndexSearchOutcome::Hits(parsed.into_sources()))
    }
}
