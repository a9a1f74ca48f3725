//! # Audit Search
//!
//! Command line client for audit events stored in monthly OpenSearch indices.
//!
//! ## Modules
//!
//! - [`cli`]: Command line arguments
//! - [`commands`]: Runs a parsed command against the search service
//! - [`config`]: Settings from the environment and dependency initialization

pub mod cli;
pub mod commands;
pub mod config;

pub use config::{Dependencies, Settings};

use audit_search_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur while running the command line client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from the search repository.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    OutputError(#[from] serde_json::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
