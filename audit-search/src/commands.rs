//! Runs parsed commands and renders their results as JSON.

use audit_search_repository::{generate_index_suffixes, IndexSearchOutcome, SearchService};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::Commands;
use crate::AppError;

/// Monthly suffixes for a date range. Needs no connection.
pub fn suffixes(start: &str, end: &str) -> Result<Value, AppError> {
    let suffixes = generate_index_suffixes(start, end)?;
    Ok(json!(suffixes))
}

/// Execute `command` against `service` and return the JSON to print.
pub async fn execute(command: &Commands, service: &SearchService) -> Result<Value, AppError> {
    match command {
        Commands::Suffixes { start, end } => suffixes(start, end),

        Commands::Exists { index } => {
            let exists = service.index_exists(index).await?;
            Ok(json!({ "index": index, "exists": exists }))
        }

        Commands::CreateIndex { index, plain } => {
            let created = if *plain {
                service.create_index(index).await?;
                true
            } else {
                service.ensure_index(index).await?
            };
            info!(index = %index, created, "Create index finished");
            Ok(json!({ "index": index, "created": created }))
        }

        Commands::Put {
            index,
            id,
            document,
        } => {
            let write = service
                .add_or_update(index, id.as_deref(), document)
                .await?;
            Ok(serde_json::to_value(write)?)
        }

        Commands::Create { index, document } => {
            let write = service.create(index, document).await?;
            Ok(serde_json::to_value(write)?)
        }

        Commands::Search { prefix, filter } => {
            let documents = service.search(prefix, &filter.to_query_model()).await?;
            info!(prefix = %prefix, count = documents.len(), "Search finished");
            Ok(Value::Array(documents))
        }

        Commands::SearchIndex { index, filter } => {
            let outcome = service
                .search_one_index(index, &filter.to_query_model())
                .await?;
            Ok(outcome_to_json(index, outcome))
        }

        Commands::Query { index, query } => {
            let outcome = service.search_raw(index, query).await?;
            Ok(outcome_to_json(index, outcome))
        }
    }
}

/// Hits become an array; a missing index is reported as an object.
fn outcome_to_json(index: &str, outcome: IndexSearchOutcome) -> Value {
    match outcome {
        IndexSearchOutcome::Hits(documents) => Value::Array(documents),
        IndexSearchOutcome::IndexNotFound => json!({ "index": index, "found": false }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        let value = suffixes("2022-04-15", "2022-06-01").unwrap();
        assert_eq!(value, json!(["2022.06", "2022.05", "2022.04"]));
    }

    #[test]
    fn test_suffixes_invalid_date() {
        let result = suffixes("yesterday", "2022-06-01");
        assert!(matches!(result, Err(AppError::SearchError(_))));
    }

    #[test]
    fn test_outcome_to_json() {
        let hits = IndexSearchOutcome::Hits(vec![json!({ "a": 1 })]);
        assert_eq!(outcome_to_json("audit", hits), json!([{ "a": 1 }]));
        assert_eq!(
            outcome_to_json("audit", IndexSearchOutcome::IndexNotFound),
            json!({ "index": "audit", "found": false })
        );
    }
}
