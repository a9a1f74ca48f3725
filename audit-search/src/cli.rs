use audit_search_shared::QueryModel;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "audit-search")]
#[command(about = "Search and write audit events stored in monthly OpenSearch indices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the monthly index suffixes covering a date range, newest first
    Suffixes {
        /// Start date (ISO 8601 date or date-time)
        #[arg(long)]
        start: String,

        /// End date (ISO 8601 date or date-time)
        #[arg(long)]
        end: String,
    },

    /// Check whether an index exists
    Exists {
        #[arg(short, long)]
        index: String,
    },

    /// Create an index with the audit mappings unless it already exists
    CreateIndex {
        #[arg(short, long)]
        index: String,

        /// Create with the backend's default settings and fail if it exists
        #[arg(long)]
        plain: bool,
    },

    /// Store a document, replacing any document with the same id
    Put {
        #[arg(short, long)]
        index: String,

        /// Document id; generated when omitted
        #[arg(long)]
        id: Option<String>,

        /// Document as JSON
        #[arg(short, long, value_parser = parse_json)]
        document: Value,
    },

    /// Store a new document under a generated id
    Create {
        #[arg(short, long)]
        index: String,

        /// Document as JSON
        #[arg(short, long, value_parser = parse_json)]
        document: Value,
    },

    /// Search the monthly indices `<prefix><separator>YYYY.MM` of a date range
    Search {
        /// Index prefix, e.g. "audit-video"
        #[arg(short, long)]
        prefix: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Search a single index
    SearchIndex {
        #[arg(short, long)]
        index: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Run a query DSL clause against a single index
    Query {
        #[arg(short, long)]
        index: String,

        /// Query clause as JSON, e.g. '{"match_all": {}}'
        #[arg(short, long, value_parser = parse_json)]
        query: Value,
    },
}

/// Date range and field filters shared by the search commands.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Start date, inclusive
    #[arg(long)]
    pub start: String,

    /// End date, inclusive
    #[arg(long)]
    pub end: String,

    /// Exact match on a field, as FIELD=VALUE (repeatable)
    #[arg(long = "match", value_parser = parse_key_value)]
    pub matches: Vec<(String, String)>,

    /// Exclude an exact field value, as FIELD=VALUE (repeatable)
    #[arg(long = "not-match", value_parser = parse_key_value)]
    pub not_matches: Vec<(String, String)>,

    /// Maximum number of documents to return
    #[arg(long)]
    pub size: Option<usize>,

    /// Company the events belong to
    #[arg(long)]
    pub company_id: Option<String>,

    /// Caller's cache key, carried with the query
    #[arg(long)]
    pub cache_id: Option<String>,
}

impl FilterArgs {
    pub fn to_query_model(&self) -> QueryModel {
        let mut model = QueryModel::new(&self.start, &self.end);
        for (field, value) in &self.matches {
            model = model.with_match(field, value.as_str());
        }
        for (field, value) in &self.not_matches {
            model = model.with_not_match(field, value.as_str());
        }
        if let Some(size) = self.size {
            model = model.with_size(size);
        }
        if let Some(company_id) = &self.company_id {
            model = model.with_company_id(company_id);
        }
        if let Some(cache_id) = &self.cache_id {
            model = model.with_cache_id(cache_id);
        }
        model
    }
}

/// Parse a `FIELD=VALUE` pair. The value may itself contain `=`.
pub fn parse_key_value(text: &str) -> Result<(String, String), String> {
    let (field, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", text))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", text));
    }
    Ok((field.to_string(), value.to_string()))
}

pub fn parse_json(text: &str) -> Result<Value, String> {
    serde_json::from_str(text).map_err(|e| format!("invalid JSON: {}", e))
}
