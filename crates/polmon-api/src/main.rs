//! # polmon: Binary Entry Point
//!
//! Loads the dataset, then serves the dashboard. Binds to `0.0.0.0` on the
//! configured port (default 8080).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use polmon_api::bootstrap;
use polmon_api::state::{AppConfig, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_SECS};
use polmon_core::{Language, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Policy Monitor dashboard server.
#[derive(Parser, Debug)]
#[command(name = "polmon", version, about, long_about = None)]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Dataset and label language: CN or EN.
    #[arg(long, env = "language", default_value = "CN")]
    language: Language,

    /// Rows per table page.
    #[arg(long, env = "POLMON_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Idle seconds before a session may be evicted.
    #[arg(long, env = "POLMON_SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL_SECS)]
    session_ttl_secs: u64,

    /// Live sessions kept before the least recently seen is evicted.
    #[arg(long, env = "POLMON_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
    max_sessions: usize,

    /// JSON file overriding the built-in English labels.
    #[arg(long, env = "POLMON_TRANSLATION_FILE")]
    translation_file: Option<PathBuf>,

    /// Log output format.
    #[arg(long, env = "POLMON_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match cli.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let config = AppConfig {
        page_size: cli.page_size,
        session_ttl: Duration::from_secs(cli.session_ttl_secs),
        max_sessions: cli.max_sessions,
    };

    let translator = bootstrap::translator(cli.language, cli.translation_file.as_deref())
        .context("loading labels")?;
    let (source, relay) = bootstrap::clients(cli.language).context("configuring clients")?;

    let state = bootstrap::bootstrap(config, translator, &source, relay)
        .await
        .map_err(|e| {
            tracing::error!("Bootstrap failed: {e}");
            e
        })?;

    let app = polmon_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!(language = %cli.language, "Policy Monitor listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
