//! Audit Search Main Entry Point
//!
//! Parses the command line, connects to OpenSearch when the command needs it
//! and prints the result as JSON on stdout. Logs go to stderr.

use audit_search::cli::{Cli, Commands};
use audit_search::{commands, AppError, Dependencies};
use clap::Parser;
use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("audit_search=info,audit_search_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .pretty(),
            )
            .init();
    }

    info!(
        service_name = "audit-search",
        service_version = env!("CARGO_PKG_VERSION"),
        json_logs,
        "Tracing initialized"
    );
}

async fn run(command: &Commands) -> Result<(), AppError> {
    let output = match command {
        Commands::Suffixes { start, end } => commands::suffixes(start, end)?,
        command => {
            let deps = Dependencies::new().await?;
            commands::execute(command, &deps.service).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    match run(&cli.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!(error = %e, "Command failed");
            Err(e)
        }
    }
}
