//! Default settings and mappings for monthly audit indices.
//!
//! Audit indices are normally created by the log shipper. When the library
//! creates one itself it uses the layout the queries expect: a `date` typed
//! timestamp and every string indexed as `text` with an exact-match keyword
//! sub-field.

use serde_json::{json, Value};

use crate::query_builder::QueryBuilderConfig;

/// Keyword sub-fields longer than this are not indexed.
pub const KEYWORD_IGNORE_ABOVE: u32 = 256;

/// Get the index settings and mappings for a monthly audit index.
///
/// The configuration includes:
/// - **date** mapping for the timestamp field, used by range filters and sorting
/// - **dynamic template** mapping strings to `text` plus a keyword sub-field
///   named after `config.keyword_suffix`, used by term filters
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn audit_index_settings(config: &QueryBuilderConfig) -> Value {
    let string_mapping = if config.keyword_suffix.is_empty() {
        json!({ "type": "keyword", "ignore_above": KEYWORD_IGNORE_ABOVE })
    } else {
        json!({
            "type": "text",
            "fields": {
                config.keyword_suffix.as_str(): {
                    "type": "keyword",
                    "ignore_above": KEYWORD_IGNORE_ABOVE
                }
            }
        })
    };

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "dynamic_templates": [
                {
                    "strings": {
                        "match_mapping_type": "string",
                        "mapping": string_mapping
                    }
                }
            ],
            "properties": {
                config.timestamp_field.as_str(): {
                    "type": "date"
                }
            }
        }
    })
}
