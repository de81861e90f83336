//! Startup helpers for the quote server.
//!
//! Loads configuration and quotes, picks the generation provider, then serves
//! until Ctrl+C.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::llm;
use crate::quotes::QuoteStore;
use crate::server::{self, AppState};

/// Filter used when `RUST_LOG` is unset, blank or unparsable.
const DEFAULT_LOG_FILTER: &str = "info";

/// Run the server (used by the `quote-chat` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            // Logging is not up yet.
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .init();

    tracing::info!("Starting quote server v{}", env!("CARGO_PKG_VERSION"));

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(serve()) {
        tracing::error!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Load configuration and state, then serve until Ctrl+C.
///
/// # Errors
/// Returns an error if configuration or the quote file is invalid, or if the
/// server fails.
pub async fn serve() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;
    let state = initialize(&config)?;

    server::run_server_with_shutdown(state, config.port, shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Initialize application state without starting the server.
///
/// # Errors
/// Returns an error if the quote file cannot be loaded. There is no degraded
/// mode without quotes.
pub fn initialize(config: &AppConfig) -> anyhow::Result<Arc<AppState>> {
    let store = QuoteStore::load(&config.quotes_file).with_context(|| {
        format!(
            "Failed to load quotes from {}",
            config.quotes_file.display()
        )
    })?;

    let provider = llm::build_provider(&config.llm);

    Ok(AppState::new(Arc::new(store), provider, config.pagination)
        .with_static_dir(config.static_dir.clone())
        .shared())
}

/// Build the log filter from `RUST_LOG` directives, defaulting to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
