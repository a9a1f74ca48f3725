//! Dependency initialization and wiring for the command line client.

use tokio::time::sleep;
use tracing::{info, warn};

use audit_search_repository::{OpenSearchClient, SearchClient, SearchService};

use super::settings::{ConnectionMode, Settings};
use crate::AppError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Search service backed by a reachable OpenSearch node.
    pub service: SearchService,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`Settings::from_env`] for the variables read.
    pub async fn new() -> Result<Self, AppError> {
        Self::from_settings(Settings::from_env()).await
    }

    /// Initialize dependencies from already loaded settings.
    ///
    /// Waits for OpenSearch to answer a ping according to the connection mode.
    pub async fn from_settings(settings: Settings) -> Result<Self, AppError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            default_size = settings.search.default_size,
            index_separator = %settings.search.index_separator,
            "Initializing dependencies"
        );

        let client = OpenSearchClient::new(&settings.opensearch_url)
            .map_err(|e| AppError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        Self::wait_for_opensearch(&client, &settings).await?;
        info!("OpenSearch connection established");

        let service = SearchService::with_config(Box::new(client), settings.search);
        Ok(Self { service })
    }

    /// Ping OpenSearch, retrying based on the connection mode.
    async fn wait_for_opensearch(
        client: &dyn SearchClient,
        settings: &Settings,
    ) -> Result<(), AppError> {
        loop {
            let failure = match client.ping().await {
                Ok(true) => return Ok(()),
                Ok(false) => "ping returned an error status".to_string(),
                Err(e) => e.to_string(),
            };

            match settings.connection_mode {
                ConnectionMode::FailFast => {
                    return Err(AppError::config(format!(
                        "Failed to connect to OpenSearch: {}",
                        failure
                    )));
                }
                ConnectionMode::Retry => {
                    warn!(
                        opensearch_url = %settings.opensearch_url,
                        error = %failure,
                        retry_interval_secs = settings.retry_interval.as_secs(),
                        "Failed to connect to OpenSearch, retrying..."
                    );
                    sleep(settings.retry_interval).await;
                }
            }
        }
    }
}
