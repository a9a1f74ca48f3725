//! Search service implementation.
//!
//! This module provides the main service for interacting with audit indices.
//! Application code uses it to check and create indices, write documents and
//! search either one index or a whole run of monthly indices.

use audit_search_shared::QueryModel;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::accumulator::BoundedAccumulator;
use crate::config::SearchServiceConfig;
use crate::errors::SearchIndexError;
use crate::index_settings::audit_index_settings;
use crate::index_suffix::{generate_index_suffixes, index_name};
use crate::interfaces::SearchClient;
use crate::query_builder::build_query_with;
use crate::types::{DocumentWrite, IndexSearchOutcome, SearchOptions};

/// Characters the backend refuses in index names.
const INVALID_INDEX_CHARS: [char; 10] = ['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#'];

/// The main service for interacting with audit indices.
///
/// This is the high-level API that application code should use. It validates
/// input, generates document ids, builds queries and delegates to a
/// `SearchClient` for the actual backend calls.
///
/// # Example
///
/// ```no_run
/// use audit_search_repository::{OpenSearchClient, SearchService};
/// use audit_search_shared::QueryModel;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Box::new(OpenSearchClient::new("http://localhost:9200")?);
/// let service = SearchService::new(client);
///
/// let model = QueryModel::new("2022-01-01", "2022-06-30")
///     .with_match("companyId", "lessonvugw")
///     .with_size(100);
///
/// // Searches audit-useraction.2022.06, then .2022.05, ... until 100 documents are found
/// let documents = service.search("audit-useraction", &model).await?;
/// # Ok(())
/// # }
/// ```
pub struct SearchService {
    client: Box<dyn SearchClient>,
    config: SearchServiceConfig,
}

impl SearchService {
    /// Create a new SearchService with default configuration.
    ///
    /// The default configuration returns up to 200 documents per multi-index
    /// search, joins prefix and suffix with `"."` and keeps only `@timestamp`
    /// in returned sources.
    pub fn new(client: Box<dyn SearchClient>) -> Self {
        Self {
            client,
            config: SearchServiceConfig::default(),
        }
    }

    /// Create a new SearchService with custom configuration.
    pub fn with_config(client: Box<dyn SearchClient>, config: SearchServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SearchServiceConfig {
        &self.config
    }

    /// Validate an index name against the backend's naming rules.
    fn validate_index_name(index: &str) -> Result<(), SearchIndexError> {
        if index.is_empty() {
            return Err(SearchIndexError::validation("index is required"));
        }
        if index.starts_with(['-', '_', '+']) {
            return Err(SearchIndexError::validation(format!(
                "index '{}' cannot start with '-', '_' or '+'",
                index
            )));
        }
        if index.chars().any(|c| c.is_uppercase()) {
            return Err(SearchIndexError::validation(format!(
                "index '{}' must be lowercase",
                index
            )));
        }
        if index
            .chars()
            .any(|c| c.is_whitespace() || INVALID_INDEX_CHARS.contains(&c))
        {
            return Err(SearchIndexError::validation(format!(
                "index '{}' contains invalid characters",
                index
            )));
        }
        Ok(())
    }

    /// Validate a caller-supplied document id.
    fn validate_document_id(id: &str) -> Result<(), SearchIndexError> {
        if id.trim().is_empty() {
            return Err(SearchIndexError::validation("document id cannot be empty"));
        }
        Ok(())
    }

    /// Check if an index exists.
    pub async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        Self::validate_index_name(index)?;
        self.client.index_exists(index).await
    }

    /// Create an index with the backend's default settings.
    pub async fn create_index(&self, index: &str) -> Result<(), SearchIndexError> {
        Self::validate_index_name(index)?;
        self.client.create_index(index, None).await
    }

    /// Create an index with the audit mappings unless it already exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index was created
    /// * `Ok(false)` - If it already existed
    pub async fn ensure_index(&self, index: &str) -> Result<bool, SearchIndexError> {
        Self::validate_index_name(index)?;
        if self.client.index_exists(index).await? {
            debug!(index = %index, "Index already exists");
            return Ok(false);
        }

        let settings = audit_index_settings(&self.config.query);
        self.client.create_index(index, Some(&settings)).await?;
        Ok(true)
    }

    /// Store a new document under a generated id.
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentWrite)` - Carrying the generated UUID v4 id
    /// * `Err(SearchIndexError)` - If validation or the write fails
    pub async fn create(
        &self,
        index: &str,
        document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError> {
        Self::validate_index_name(index)?;
        let id = Uuid::new_v4().to_string();
        self.client.create_document(index, &id, document).await
    }

    /// Store a document, replacing any document with the same id.
    ///
    /// A UUID v4 id is generated when `id` is `None`.
    pub async fn add_or_update(
        &self,
        index: &str,
        id: Option<&str>,
        document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError> {
        Self::validate_index_name(index)?;
        let id = match id {
            Some(id) => {
                Self::validate_document_id(id)?;
                id.to_string()
            }
            None => Uuid::new_v4().to_string(),
        };
        self.client.upsert_document(index, &id, document).await
    }

    /// Run a caller-supplied query against one index.
    ///
    /// `query` is the query DSL clause (e.g. `{"bool": {...}}`), not a whole
    /// request body. Sources are returned whole.
    pub async fn search_raw(
        &self,
        index: &str,
        query: &Value,
    ) -> Result<IndexSearchOutcome, SearchIndexError> {
        Self::validate_index_name(index)?;
        let body = json!({ "query": query });
        self.client
            .search(index, &body, &SearchOptions::default())
            .await
    }

    /// Search a single index with a query model.
    ///
    /// The index is refreshed first; hits are sorted newest first and their
    /// sources restricted to the configured fields.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexSearchOutcome::Hits)` - Matching sources, newest first
    /// * `Ok(IndexSearchOutcome::IndexNotFound)` - If the index does not exist
    /// * `Err(SearchIndexError::InvalidDate)` - If the model's dates do not parse
    /// * `Err(SearchIndexError)` - If the refresh or search fails
    #[instrument(skip(self, model), fields(start_date = %model.start_date, end_date = %model.end_date))]
    pub async fn search_one_index(
        &self,
        index: &str,
        model: &QueryModel,
    ) -> Result<IndexSearchOutcome, SearchIndexError> {
        Self::validate_index_name(index)?;
        let request = build_query_with(model, &self.config.query)?;
        self.search_built(index, &request.to_json()).await
    }

    /// Refresh and search one index with an already built body.
    async fn search_built(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<IndexSearchOutcome, SearchIndexError> {
        if !self.client.refresh_index(index).await? {
            warn!(index = %index, "Index not found");
            return Ok(IndexSearchOutcome::IndexNotFound);
        }

        let options = SearchOptions {
            source_fields: self.config.source_fields.clone(),
        };
        let outcome = self.client.search(index, body, &options).await?;
        if outcome.is_index_not_found() {
            warn!(index = %index, "Index not found");
        }
        Ok(outcome)
    }

    /// Search the monthly indices `<prefix><sep>YYYY.MM` covering the model's
    /// date range, newest month first, until `size` documents are collected.
    ///
    /// Months without an index are skipped. Each index is asked only for the
    /// number of documents still missing, and no further index is queried once
    /// the requested size is reached.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Value>)` - At most `size` sources (default 200), newest first
    /// * `Err(SearchIndexError::InvalidDate)` - If the model's dates do not parse
    /// * `Err(SearchIndexError)` - If any refresh or search fails
    #[instrument(skip(self, model), fields(start_date = %model.start_date, end_date = %model.end_date))]
    pub async fn search(
        &self,
        index_prefix: &str,
        model: &QueryModel,
    ) -> Result<Vec<Value>, SearchIndexError> {
        if index_prefix.is_empty() {
            return Err(SearchIndexError::validation("index prefix is required"));
        }

        let expected_size = model.size_or(self.config.default_size);
        let suffixes = generate_index_suffixes(&model.start_date, &model.end_date)?;
        let request = build_query_with(model, &self.config.query)?;
        let mut accumulator = BoundedAccumulator::new(expected_size);

        for suffix in &suffixes {
            let index = index_name(index_prefix, &self.config.index_separator, suffix);
            Self::validate_index_name(&index)?;

            let body = request.clone().with_size(accumulator.remaining()).to_json();
            let outcome = self.search_built(&index, &body).await?;

            debug!(index = %index, size = outcome.len(), "Search on index returned results");
            accumulator.extend(outcome.into_documents());

            if accumulator.is_full() {
                info!(
                    requested = expected_size,
                    fetched = accumulator.len(),
                    "Search completed with requested number of documents"
                );
                return Ok(accumulator.into_documents());
            }
        }

        warn!(
            index_prefix = %index_prefix,
            indices = suffixes.len(),
            fetched = accumulator.len(),
            requested = expected_size,
            "Date range exhausted before reaching requested number of documents"
        );
        Ok(accumulator.into_documents())
    }
}
