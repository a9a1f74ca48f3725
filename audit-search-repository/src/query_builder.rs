//! Boolean query construction for audit searches.
//!
//! A [`QueryModel`] becomes a `bool` query made of exact-match `term` filters,
//! `term` exclusions and one inclusive `range` filter on the timestamp field,
//! plus a descending timestamp sort and an optional size.

use audit_search_shared::QueryModel;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::errors::SearchIndexError;
use crate::index_suffix::parse_date;

/// Default timestamp field of audit documents.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "@timestamp";

/// Default exact-match sub-field for text fields.
pub const DEFAULT_KEYWORD_SUFFIX: &str = "keyword";

/// Field names used when building queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilderConfig {
    /// Field bounded by the date range and used for sorting.
    pub timestamp_field: String,
    /// Sub-field holding the unanalyzed value (`<field>.<keyword_suffix>`).
    pub keyword_suffix: String,
}

impl Default for QueryBuilderConfig {
    fn default() -> Self {
        Self {
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            keyword_suffix: DEFAULT_KEYWORD_SUFFIX.to_string(),
        }
    }
}

impl QueryBuilderConfig {
    /// Name of the exact-match sub-field for `field`.
    ///
    /// An empty suffix targets the field itself.
    pub fn exact_field(&self, field: &str) -> String {
        if self.keyword_suffix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", field, self.keyword_suffix)
        }
    }
}

/// One leaf condition of the bool query.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Exact value match.
    Term { field: String, value: Value },
    /// Inclusive range on both ends.
    Range {
        field: String,
        gte: String,
        lte: String,
    },
}

impl Clause {
    pub fn to_json(&self) -> Value {
        match self {
            Clause::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            Clause::Range { field, gte, lte } => {
                json!({ "range": { field.as_str(): { "gte": gte, "lte": lte } } })
            }
        }
    }
}

/// A `bool` query with non-scoring filters and exclusions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    pub filter: Vec<Clause>,
    pub must_not: Vec<Clause>,
}

impl BoolQuery {
    /// Number of range clauses among the filters.
    pub fn range_count(&self) -> usize {
        self.filter
            .iter()
            .filter(|clause| matches!(clause, Clause::Range { .. }))
            .count()
    }

    pub fn to_json(&self) -> Value {
        let mut bool_query = Map::new();
        bool_query.insert(
            "filter".to_string(),
            Value::Array(self.filter.iter().map(Clause::to_json).collect()),
        );
        if !self.must_not.is_empty() {
            bool_query.insert(
                "must_not".to_string(),
                Value::Array(self.must_not.iter().map(Clause::to_json).collect()),
            );
        }
        json!({ "bool": bool_query })
    }
}

/// Sort direction on a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// A built search: query, sort and optional size.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: BoolQuery,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub size: Option<usize>,
}

impl SearchRequest {
    /// Override the number of hits asked for.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Request body in the search DSL.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_json());
        body.insert(
            "sort".to_string(),
            json!([{ self.sort_field.as_str(): { "order": self.sort_order.as_str() } }]),
        );
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        Value::Object(body)
    }
}

/// Build a search from a query model with the default field names.
///
/// # Errors
///
/// `InvalidDate` when either bound does not parse, `ValidationError` when a
/// filter names an empty field.
///
/// # Example
///
/// ```
/// use audit_search_repository::query_builder::build_query;
/// use audit_search_shared::QueryModel;
///
/// let model = QueryModel::new("2022-01-01", "2022-06-30").with_match("companyId", "acme");
/// let request = build_query(&model).unwrap();
/// let body = request.to_json();
/// assert_eq!(body["query"]["bool"]["filter"][0]["term"]["companyId.keyword"], "acme");
/// assert_eq!(body["sort"][0]["@timestamp"]["order"], "desc");
/// ```
pub fn build_query(model: &QueryModel) -> Result<SearchRequest, SearchIndexError> {
    build_query_with(model, &QueryBuilderConfig::default())
}

/// Build a search from a query model with custom field names.
pub fn build_query_with(
    model: &QueryModel,
    config: &QueryBuilderConfig,
) -> Result<SearchRequest, SearchIndexError> {
    parse_date(&model.start_date).map_err(|_| {
        SearchIndexError::invalid_date(format!("Invalid startDate: {}", model.start_date))
    })?;
    parse_date(&model.end_date).map_err(|_| {
        SearchIndexError::invalid_date(format!("Invalid endDate: {}", model.end_date))
    })?;

    let mut query = BoolQuery::default();

    for (field, value) in model.matches() {
        query.filter.push(term_clause(config, field, value)?);
    }

    for (field, value) in model.not_matches() {
        query.must_not.push(term_clause(config, field, value)?);
    }

    query.filter.push(Clause::Range {
        field: config.timestamp_field.clone(),
        gte: model.start_date.trim().to_string(),
        lte: model.end_date.trim().to_string(),
    });

    let request = SearchRequest {
        query,
        sort_field: config.timestamp_field.clone(),
        sort_order: SortOrder::Desc,
        size: model.size.filter(|size| *size > 0),
    };

    debug!(query = %request.to_json(), "Generated search query");
    Ok(request)
}

fn term_clause(
    config: &QueryBuilderConfig,
    field: &str,
    value: &Value,
) -> Result<Clause, SearchIndexError> {
    if field.trim().is_empty() {
        return Err(SearchIndexError::validation(
            "Filter field names cannot be empty",
        ));
    }
    Ok(Clause::Term {
        field: config.exact_field(field),
        value: value.clone(),
    })
}
