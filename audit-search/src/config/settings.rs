//! Settings read from environment variables.

use std::env;
use std::time::Duration;

use audit_search_repository::SearchServiceConfig;
use tracing::warn;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Value of `SEARCH_SOURCE_FIELDS` that returns whole documents.
const FULL_SOURCE: &str = "*";

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry the connection check until it succeeds.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            other => {
                warn!(value = %other, "Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Runtime settings for the command line client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub opensearch_url: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub search: SearchServiceConfig,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Seconds between connection checks (default: 15)
    /// - `SEARCH_DEFAULT_SIZE`: Documents returned when no size is given (default: 200)
    /// - `SEARCH_INDEX_SEPARATOR`: Text between index prefix and month (default: ".")
    /// - `SEARCH_TIMESTAMP_FIELD`: Field used for date ranges and sorting (default: @timestamp)
    /// - `SEARCH_KEYWORD_SUFFIX`: Exact-match sub-field for term filters (default: keyword)
    /// - `SEARCH_SOURCE_FIELDS`: Comma separated `_source` fields, `*` for whole documents
    ///   (default: the timestamp field)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let opensearch_url =
            lookup("OPENSEARCH_URL").unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string());
        let connection_mode = ConnectionMode::parse(lookup("OPENSEARCH_CONNECTION_MODE").as_deref());
        let retry_interval = lookup("OPENSEARCH_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        let mut search = SearchServiceConfig::default();
        if let Some(field) = lookup("SEARCH_TIMESTAMP_FIELD").filter(|f| !f.trim().is_empty()) {
            search = search.with_timestamp_field(field.trim());
        }
        if let Some(suffix) = lookup("SEARCH_KEYWORD_SUFFIX") {
            search = search.with_keyword_suffix(suffix.trim());
        }
        if let Some(separator) = lookup("SEARCH_INDEX_SEPARATOR") {
            search = search.with_index_separator(separator);
        }
        if let Some(size) = lookup("SEARCH_DEFAULT_SIZE") {
            match size.parse::<usize>() {
                Ok(size) => search = search.with_default_size(size),
                Err(_) => warn!(value = %size, "Invalid SEARCH_DEFAULT_SIZE, keeping default"),
            }
        }
        if let Some(fields) = lookup("SEARCH_SOURCE_FIELDS") {
            search = Self::apply_source_fields(search, &fields);
        }

        Self {
            opensearch_url,
            connection_mode,
            retry_interval: Duration::from_secs(retry_interval),
            search,
        }
    }

    fn apply_source_fields(search: SearchServiceConfig, fields: &str) -> SearchServiceConfig {
        if fields.trim() == FULL_SOURCE {
            return search.with_full_source();
        }

        let fields: Vec<&str> = fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if fields.is_empty() {
            search
        } else {
            search.with_source_fields(fields)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]);

        assert_eq!(settings.opensearch_url, "http://localhost:9200");
        assert_eq!(settings.connection_mode, ConnectionMode::Retry);
        assert_eq!(settings.retry_interval, Duration::from_secs(15));
        assert_eq!(settings.search, SearchServiceConfig::default());
    }

    #[test]
    fn test_connection_mode_parsing() {
        assert_eq!(ConnectionMode::parse(Some("fail-fast")), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse(Some("FAIL_FAST")), ConnectionMode::FailFast);
        assert_eq!(ConnectionMode::parse(Some("retry")), ConnectionMode::Retry);
        assert_eq!(ConnectionMode::parse(Some("sometimes")), ConnectionMode::Retry);
        assert_eq!(ConnectionMode::parse(None), ConnectionMode::Retry);
    }

    #[test]
    fn test_connection_settings() {
        let settings = settings_from(&[
            ("OPENSEARCH_URL", "http://search:9200"),
            ("OPENSEARCH_CONNECTION_MODE", "fail-fast"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "3"),
        ]);

        assert_eq!(settings.opensearch_url, "http://search:9200");
        assert_eq!(settings.connection_mode, ConnectionMode::FailFast);
        assert_eq!(settings.retry_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_search_settings() {
        let settings = settings_from(&[
            ("SEARCH_DEFAULT_SIZE", "50"),
            ("SEARCH_INDEX_SEPARATOR", ""),
            ("SEARCH_SOURCE_FIELDS", "@timestamp, action ,,companyId"),
        ]);

        assert_eq!(settings.search.default_size, 50);
        assert_eq!(settings.search.index_separator, "");
        assert_eq!(
            settings.search.source_fields,
            Some(vec![
                "@timestamp".to_string(),
                "action".to_string(),
                "companyId".to_string()
            ])
        );
    }

    #[test]
    fn test_invalid_default_size_is_ignored() {
        let settings = settings_from(&[("SEARCH_DEFAULT_SIZE", "many")]);
        assert_eq!(settings.search.default_size, 200);
    }

    #[test]
    fn test_full_source() {
        let settings = settings_from(&[("SEARCH_SOURCE_FIELDS", "*")]);
        assert_eq!(settings.search.source_fields, None);
    }

    #[test]
    fn test_timestamp_field_moves_default_source() {
        let settings = settings_from(&[("SEARCH_TIMESTAMP_FIELD", "event_time")]);

        assert_eq!(settings.search.query.timestamp_field, "event_time");
        assert_eq!(
            settings.search.source_fields,
            Some(vec!["event_time".to_string()])
        );
    }
}
