//! Server entry point for parley

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use parley_core::config::ConfigLoader;
use parley_core::logging;
use parley_core::session::{HistoryStore, SessionRegistry};
use parley_providers::CompatibleClient;
use parley_server::{run_server, AppState, ChatOrchestrator};

#[derive(Parser)]
#[command(name = "parley-server")]
#[command(about = "Session-scoped conversational HTTP service")]
#[command(version)]
struct Cli {
    /// Configuration directory
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("failed to load configuration")?;

    // The provider credential is the one startup requirement: without it
    // every chat call would fail, so refuse to serve at all.
    if config.provider.api_key.trim().is_empty() {
        bail!(
            "Provider API key not set. Set PARLEY_API_KEY (or provider.api_key \
             in {}/config.json) and restart.",
            loader.config_dir().display()
        );
    }

    let _log_guard = logging::init_logging(&config.logging);
    info!("API key loaded from configuration");

    let provider = CompatibleClient::new(
        Some(config.provider.api_key.clone()),
        config.provider.api_base.clone(),
        config.chat.model.clone(),
        Duration::from_secs(config.provider.timeout_secs),
    )
    .context("failed to construct provider client")?;

    let history = HistoryStore::new(&config.history.file);
    let registry = Arc::new(SessionRegistry::new(
        history,
        config.history.default_session.clone(),
    ));
    let orchestrator = Arc::new(ChatOrchestrator::new(
        Arc::new(provider),
        registry.clone(),
        &config.chat,
    ));

    let state = AppState {
        registry,
        orchestrator,
        log_file: logging::log_file_path(&config.logging),
    };

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);

    info!("{}", "=".repeat(50));
    info!("PARLEY CHAT SERVER STARTING");
    info!("{}", "=".repeat(50));
    info!("Bind address:   {}:{}", host, port);
    info!("Health check:   http://{}:{}/health", host, port);
    info!("Chat endpoint:  http://{}:{}/api/chat", host, port);
    info!("Model:          {}", config.chat.model);
    info!("History file:   {}", config.history.file);
    info!("Log file:       {}", state.log_file.display());
    info!("{}", "=".repeat(50));

    run_server(state, &host, port).await
}
