//! # Audit Search Repository
//!
//! This crate provides the search client interface, an OpenSearch
//! implementation of it, and the logic for searching audit data that is
//! sharded into monthly indices (`<prefix>.YYYY.MM`): index-suffix generation,
//! boolean query construction and a multi-index search that walks months from
//! newest to oldest until enough documents are found.

pub mod accumulator;
pub mod config;
pub mod errors;
pub mod index_settings;
pub mod index_suffix;
pub mod interfaces;
pub mod opensearch;
pub mod query_builder;
pub mod service;
pub mod types;

pub use accumulator::BoundedAccumulator;
pub use config::SearchServiceConfig;
pub use errors::SearchIndexError;
pub use index_suffix::{
    find_number_of_months, generate_index_suffixes, index_suffix_for_date, parse_date,
};
pub use interfaces::SearchClient;
pub use crate::opensearch::OpenSearchClient;
pub use query_builder::{build_query, build_query_with, QueryBuilderConfig, SearchRequest};
pub use service::SearchService;
pub use types::{DocumentWrite, IndexSearchOutcome, SearchOptions, WriteResult};
