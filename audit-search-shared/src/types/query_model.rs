//! Query model for audit searches.
//!
//! A `QueryModel` carries everything needed to build a search against one or
//! more monthly indices: the date range, exact-match filters, exclusion
//! filters and the number of documents wanted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of documents returned by a multi-index search when the model does
/// not set `size`.
pub const DEFAULT_RESULT_SIZE: usize = 200;

/// Search parameters for one invocation.
///
/// Field names serialize in camelCase (`startDate`, `matchMap`, ...) so JSON
/// produced by existing callers deserializes unchanged.
///
/// `match_map` and `not_match_map` are ordered by field name, which keeps the
/// generated clauses stable between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    /// Tenant the query runs for. Carried through, not used to build queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    /// Inclusive lower bound of the timestamp range, as text.
    pub start_date: String,

    /// Inclusive upper bound of the timestamp range, as text.
    pub end_date: String,

    /// Field name to exact value. Every entry becomes a filter clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_map: Option<BTreeMap<String, Value>>,

    /// Field name to exact value. Every entry becomes an exclusion clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_match_map: Option<BTreeMap<String, Value>>,

    /// Maximum number of documents wanted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    /// Caller-side cache key. Carried through, not used to build queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_id: Option<String>,
}

impl QueryModel {
    /// Create a model covering `start_date..=end_date` with no filters.
    ///
    /// # Example
    ///
    /// ```
    /// use audit_search_shared::QueryModel;
    ///
    /// let model = QueryModel::new("2022-01-01", "2022-06-30")
    ///     .with_match("companyId", "lessonvugw")
    ///     .with_size(100);
    /// assert_eq!(model.effective_size(), 100);
    /// ```
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            ..Default::default()
        }
    }

    /// Add an exact-match filter on `field`.
    pub fn with_match(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.match_map
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), value.into());
        self
    }

    /// Add an exclusion filter on `field`.
    pub fn with_not_match(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.not_match_map
            .get_or_insert_with(BTreeMap::new)
            .insert(field.into(), value.into());
        self
    }

    /// Set the number of documents wanted.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_company_id(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_cache_id(mut self, cache_id: impl Into<String>) -> Self {
        self.cache_id = Some(cache_id.into());
        self
    }

    /// The requested size, falling back to [`DEFAULT_RESULT_SIZE`].
    ///
    /// A size of 0 counts as unset.
    pub fn effective_size(&self) -> usize {
        self.size_or(DEFAULT_RESULT_SIZE)
    }

    /// The requested size, falling back to `default` when unset or 0.
    pub fn size_or(&self, default: usize) -> usize {
        match self.size {
            Some(size) if size > 0 => size,
            _ => default,
        }
    }

    /// Iterate over the exact-match filters in field order.
    pub fn matches(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.match_map.iter().flatten()
    }

    /// Iterate over the exclusion filters in field order.
    pub fn not_matches(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.not_match_map.iter().flatten()
    }
}
