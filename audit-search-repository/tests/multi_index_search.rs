//! Integration tests for the multi-index search.
//!
//! These tests use the real SearchService but a mock SearchClient holding
//! documents per monthly index, so no cluster is needed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use audit_search_repository::{
    DocumentWrite, IndexSearchOutcome, SearchClient, SearchIndexError, SearchOptions,
    SearchService, SearchServiceConfig, WriteResult,
};
use audit_search_shared::QueryModel;
use serde_json::{json, Value};

// Mock search client backed by an in-memory map of index -> documents
struct MockSearchClient {
    indices: HashMap<String, Vec<Value>>,
    failing_index: Option<String>,
    searched: Arc<Mutex<Vec<(String, Value)>>>,
    refreshed: Arc<Mutex<Vec<String>>>,
}

impl MockSearchClient {
    fn new() -> Self {
        Self {
            indices: HashMap::new(),
            failing_index: None,
            searched: Arc::new(Mutex::new(Vec::new())),
            refreshed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add an index holding `count` documents for `month`, in hit order.
    fn with_index(mut self, index: &str, month: &str, count: usize) -> Self {
        let documents = (0..count)
            .map(|i| json!({ "@timestamp": format!("{}-28T00:00:00Z", month), "seq": i }))
            .collect();
        self.indices.insert(index.to_string(), documents);
        self
    }

    fn with_failing_index(mut self, index: &str) -> Self {
        self.indices.insert(index.to_string(), Vec::new());
        self.failing_index = Some(index.to_string());
        self
    }

    fn searched_indices(&self) -> Arc<Mutex<Vec<(String, Value)>>> {
        self.searched.clone()
    }

    fn refreshed_indices(&self) -> Arc<Mutex<Vec<String>>> {
        self.refreshed.clone()
    }
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn ping(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        Ok(self.indices.contains_key(index))
    }

    async fn create_index(
        &self,
        _index: &str,
        _body: Option<&Value>,
    ) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn create_document(
        &self,
        index: &str,
        id: &str,
        _document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError> {
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
        _document: &Value,
    ) -> Result<DocumentWrite, SearchIndexError> {
        Ok(DocumentWrite {
            index: index.to_string(),
            id: id.to_string(),
            result: WriteResult::Created,
        })
    }

    async fn refresh_index(&self, index: &str) -> Result<bool, SearchIndexError> {
        self.refreshed.lock().unwrap().push(index.to_string());
        Ok(self.indices.contains_key(index))
    }

    async fn search(
        &self,
        index: &str,
        body: &Value,
        _options: &SearchOptions,
    ) -> Result<IndexSearchOutcome, SearchIndexError> {
        self.searched
            .lock()
            .unwrap()
            .push((index.to_string(), body.clone()));

        if self.failing_index.as_deref() == Some(index) {
            return Err(SearchIndexError::query("Mock failure"));
        }

        match self.indices.get(index) {
            Some(documents) => {
                let size = body["size"].as_u64().map(|s| s as usize).unwrap_or(10);
                Ok(IndexSearchOutcome::Hits(
                    documents.iter().take(size).cloned().collect(),
                ))
            }
            None => Ok(IndexSearchOutcome::IndexNotFound),
        }
    }
}

fn searched_names(searched: &Arc<Mutex<Vec<(String, Value)>>>) -> Vec<String> {
    searched
        .lock()
        .unwrap()
        .iter()
        .map(|(index, _)| index.clone())
        .collect()
}

#[tokio::test]
async fn test_search_walks_months_newest_first() {
    let client = MockSearchClient::new()
        .with_index("audit.2022.06", "2022-06", 2)
        .with_index("audit.2022.05", "2022-05", 2)
        .with_index("audit.2022.04", "2022-04", 2);
    let searched = client.searched_indices();
    let service = SearchService::new(Box::new(client));

    let model = QueryModel::new("2022-04-01", "2022-06-30").with_size(100);
    let documents = service.search("audit", &model).await.unwrap();

    assert_eq!(documents.len(), 6);
    assert_eq!(
        searched_names(&searched),
        vec!["audit.2022.06", "audit.2022.05", "audit.2022.04"]
    );
    assert_eq!(documents[0]["@timestamp"], "2022-06-28T00:00:00Z");
    assert_eq!(documents[2]["@timestamp"], "2022-05-28T00:00:00Z");
    assert_eq!(documents[5]["@timestamp"], "2022-04-28T00:00:00Z");
    assert_eq!(documents[5]["seq"], 1);
}

#[tokio::test]
async fn test_search_stops_once_size_is_reached() {
    let client = MockSearchClient::new()
        .with_index("audit.2022.06", "2022-06", 3)
        .with_index("audit.2022.05", "2022-05", 5)
        .with_index("audit.2022.04", "2022-04", 5);
    let searched = client.searched_indices();
    let service = SearchService::new(Box::new(client));

    let model = QueryModel::new("2022-01-01", "2022-06-30").with_size(5);
    let documents = service.search("audit", &model).await.unwrap();

    assert_eq!(documents.len(), 5);
    assert_eq!(
        searched_names(&searched),
        vec!["audit.2022.06", "audit.2022.05"]
    );
    // the second index is only asked for what is still missing
    let searched = searched.lock().unwrap();
    assert_eq!(searched[0].1["size"], 5);
    assert_eq!(searched[1].1["size"], 2);
}

#[tokio::test]
async fn test_search_never_exceeds_requested_size() {
    for size in [1usize, 2, 3, 7, 10, 11] {
        let client = MockSearchClient::new()
            .with_index("audit.2022.06", "2022-06", 4)
            .with_index("audit.2022.05", "2022-05", 4);
        let service = SearchService::new(Box::new(client));

        let model = QueryModel::new("2022-05-01", "2022-06-30").with_size(size);
        let documents = service.search("audit", &model).await.unwrap();

        assert_eq!(documents.len(), size.min(8), "size {}", size);
    }
}

#[tokio::test]
async fn test_search_skips_missing_indices() {
    let client = MockSearchClient::new()
        .with_index("audit.2022.06", "2022-06", 1)
        .with_index("audit.2022.03", "2022-03", 2);
    let searched = client.searched_indices();
    let refreshed = client.refreshed_indices();
    let service = SearchService::new(Box::new(client));

    let model = QueryModel::new("2022-03-01", "2022-06-30");
    let documents = service.search("audit", &model).await.unwrap();

    assert_eq!(documents.len(), 3);
    // missing months are refreshed, found absent, and never searched
    assert_eq!(
        *refreshed.lock().unwrap(),
        vec!["audit.2022.06", "audit.2022.05", "audit.2022.04", "audit.2022.03"]
    );
    assert_eq!(
        searched_names(&searched),
        vec!["audit.2022.06", "audit.2022.03"]
    );
}

#[tokio::test]
async fn test_search_with_no_indices_returns_empty() {
    let client = MockSearchClient::new();
    let service = SearchService::new(Box::new(client));

    let model = QueryModel::new("2022-01-01", "2022-06-30");
    let documents = service.search("audit", &model).await.unwrap();

    assert!(documents.is_empty());
}

#[tokio::test]
async fn test_search_default_size_is_200() {
    let client = MockSearchClient::new()
        .with_index("audit.2022.06", "2022-06", 150)
        .with_index("audit.2022.05", "2022-05", 150);
    let searched = client.searched_indices();
    let service = SearchService::new(Box::new(client));

    let model = QueryModel::new("2022-05-01", "2022-06-30");
    let documents = service.search("audit", &model).await.unwrap();

    assert_eq!(documents.len(), 200);
    let searched = searched.lock().unwrap();
    assert_eq!(searched[0].1["size"], 200);
    assert_eq!(searched[1].1["size"], 50);
}

#[tokio::test]
async fn test_search_propagates_remote_failures() {
    let client = MockSearchClient::new()
        .with_index("audit.2022.06", "2022-06", 1)
        .with_failing_index("audit.2022.05");
    let service = SearchService::new(Box::new(client));

    let model = QueryModel::new("2022-04-01", "2022-06-30");
    let result = service.search("audit", &model).await;

    assert!(matches!(result, Err(SearchIndexError::QueryError(_))));
}

#[tokio::test]
async fn test_search_with_custom_separator_and_filters() {
    let client = MockSearchClient::new()
        .with_index("logstash_audit-useraction_2022.06", "2022-06", 2);
    let searched = client.searched_indices();
    let config = SearchServiceConfig::default().with_index_separator("");
    let service = SearchService::with_config(Box::new(client), config);

    let model = QueryModel::new("2022-06-01", "2022-06-30")
        .with_match("companyId", "lessonvugw")
        .with_not_match("action", "login")
        .with_size(100);
    let documents = service
        .search("logstash_audit-useraction_", &model)
        .await
        .unwrap();

    assert_eq!(documents.len(), 2);
    let searched = searched.lock().unwrap();
    let (index, body) = &searched[0];
    assert_eq!(index, "logstash_audit-useraction_2022.06");
    assert_eq!(
        body["query"]["bool"]["filter"][0],
        json!({ "term": { "companyId.keyword": "lessonvugw" } })
    );
    assert_eq!(
        body["query"]["bool"]["must_not"][0],
        json!({ "term": { "action.keyword": "login" } })
    );
    assert_eq!(
        body["query"]["bool"]["filter"][1],
        json!({ "range": { "@timestamp": { "gte": "2022-06-01", "lte": "2022-06-30" } } })
    );
}
