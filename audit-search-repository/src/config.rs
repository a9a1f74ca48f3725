//! Configuration types for the SearchService.

use audit_search_shared::DEFAULT_RESULT_SIZE;

use crate::query_builder::{QueryBuilderConfig, DEFAULT_TIMESTAMP_FIELD};

/// Separator placed between an index prefix and its monthly suffix.
pub const DEFAULT_INDEX_SEPARATOR: &str = ".";

/// Configuration for the SearchService.
///
/// Controls how monthly index names are formed, how many documents a
/// multi-index search returns when the caller does not say, which source
/// fields come back and which field names the query builder targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchServiceConfig {
    /// Documents returned by a multi-index search when the model has no size.
    ///
    /// Defaults to 200.
    pub default_size: usize,

    /// Placed between prefix and `YYYY.MM`. Defaults to `"."`.
    pub index_separator: String,

    /// Fields kept in each hit's `_source`.
    ///
    /// Defaults to the timestamp field only. `None` returns whole documents.
    pub source_fields: Option<Vec<String>>,

    /// Field names used by the query builder.
    pub query: QueryBuilderConfig,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_RESULT_SIZE,
            index_separator: DEFAULT_INDEX_SEPARATOR.to_string(),
            source_fields: Some(vec![DEFAULT_TIMESTAMP_FIELD.to_string()]),
            query: QueryBuilderConfig::default(),
        }
    }
}

impl SearchServiceConfig {
    /// Set the fallback result size. Zero is ignored.
    pub fn with_default_size(mut self, default_size: usize) -> Self {
        if default_size > 0 {
            self.default_size = default_size;
        }
        self
    }

    pub fn with_index_separator(mut self, separator: impl Into<String>) -> Self {
        self.index_separator = separator.into();
        self
    }

    /// Restrict returned sources to `fields`.
    pub fn with_source_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Return whole documents.
    pub fn with_full_source(mut self) -> Self {
        self.source_fields = None;
        self
    }

    /// Use `field` as the range and sort field.
    ///
    /// When the source fields are still the default, they follow the new field.
    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        let default_sources = Some(vec![self.query.timestamp_field.clone()]);
        if self.source_fields == default_sources {
            self.source_fields = Some(vec![field.clone()]);
        }
        self.query.timestamp_field = field;
        self
    }

    pub fn with_keyword_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.query.keyword_suffix = suffix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchServiceConfig::default();
        assert_eq!(config.default_size, 200);
        assert_eq!(config.index_separator, ".");
        assert_eq!(config.source_fields, Some(vec!["@timestamp".to_string()]));
        assert_eq!(config.query.timestamp_field, "@timestamp");
        assert_eq!(config.query.keyword_suffix, "keyword");
    }

    #[test]
    fn test_zero_default_size_ignored() {
        let config = SearchServiceConfig::default().with_default_size(0);
        assert_eq!(config.default_size, 200);
        let config = config.with_default_size(25);
        assert_eq!(config.default_size, 25);
    }

    #[test]
    fn test_timestamp_field_moves_default_sources() {
        let config = SearchServiceConfig::default().with_timestamp_field("event_time");
        assert_eq!(config.query.timestamp_field, "event_time");
        assert_eq!(config.source_fields, Some(vec!["event_time".to_string()]));

        let config = SearchServiceConfig::default()
            .with_source_fields(["user", "action"])
            .with_timestamp_field("event_time");
        assert_eq!(
            config.source_fields,
            Some(vec!["user".to_string(), "action".to_string()])
        );
    }

    #[test]
    fn test_full_source() {
        let config = SearchServiceConfig::default().with_full_source();
        assert!(config.source_fields.is_none());
    }
}
